use glam::Vec3;

/// Surface material: ambient/diffuse/specular reflectance plus a scalar
/// shininess exponent. Immutable for a demo run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

/// Directional light: a direction toward the light and per-term colors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirLight {
    pub light_dir: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// Point light with constant/linear/quadratic distance attenuation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub light_pos: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}
