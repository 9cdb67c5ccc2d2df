//! Plain scene data handed to the render-path constructors.

use glam::Mat4;

use crate::lighting::{DirLight, Material, PointLight};
use crate::shader::LightCounts;

/// Everything a render path needs to know about the world: one material,
/// fixed light sets, and one transform per model instance.
///
/// Immutable after construction; the light-array lengths become the
/// compile-time array sizes injected into the fragment shader.
#[derive(Debug, Clone)]
pub struct Scene {
    pub material: Material,
    pub dir_lights: Vec<DirLight>,
    pub point_lights: Vec<PointLight>,
    pub instances: Vec<Mat4>,
}

impl Scene {
    /// Light-array sizes for shader injection and layout resolution.
    pub fn light_counts(&self) -> LightCounts {
        LightCounts::new(self.dir_lights.len() as u32, self.point_lights.len() as u32)
    }
}
