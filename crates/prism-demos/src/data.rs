//! Scene data for the lit-cube demos: the 400-instance transform grid,
//! the light sets, and the polished-silver material.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use prism_engine::lighting::{DirLight, Material, PointLight};
use prism_engine::scene::Scene;

pub const NR_DIR_LIGHTS: u32 = 2;
pub const NR_POINT_LIGHTS: u32 = 100;

// Fixed seed: the multi-light sets look random but stay reproducible
// across runs, which keeps the two render paths comparable frame to
// frame.
const LIGHT_SEED: u64 = 0x9e3779b97f4a7c15;

const PALETTE: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// 10 x 10 grid x 4 stacked heights of small cubes, each rotated by
/// `(i * j)` degrees about Y and scaled to a tenth.
pub fn model_mats() -> Vec<Mat4> {
    let mut mats = Vec::with_capacity(400);
    for i in 0..10 {
        for j in 0..10 {
            for k in 0..4 {
                let translate = Vec3::new(5.0 - i as f32, k as f32, 5.0 - j as f32);
                let mat = Mat4::from_translation(translate)
                    * Mat4::from_rotation_y(((i * j) as f32).to_radians())
                    * Mat4::from_scale(Vec3::splat(0.1));
                mats.push(mat);
            }
        }
    }
    mats
}

/// Directional lights; a count of one returns a fixed light so the
/// single-light scenes stay deterministic, anything larger is random.
pub fn dir_lights(count: u32) -> Vec<DirLight> {
    if count == 1 {
        return vec![DirLight {
            light_dir: Vec3::new(0.0, 0.5, 0.0),
            ambient: Vec3::splat(0.01),
            diffuse: Vec3::Z,
            specular: Vec3::Z,
        }];
    }

    let mut rng = StdRng::seed_from_u64(LIGHT_SEED);
    (0..count)
        .map(|i| {
            let color = PALETTE[i as usize % PALETTE.len()];
            DirLight {
                light_dir: Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                ),
                ambient: Vec3::splat(0.01),
                diffuse: color * 4.0 / 50.0,
                specular: color / 10.0,
            }
        })
        .collect()
}

/// Point lights; same fixed-at-one / random-otherwise split.
pub fn point_lights(count: u32) -> Vec<PointLight> {
    if count == 1 {
        return vec![PointLight {
            light_pos: Vec3::new(0.0, 3.0, 5.5),
            constant: 1.0,
            linear: 2.0,
            quadratic: 1.0,
            ambient: Vec3::splat(0.01),
            diffuse: Vec3::new(0.5, 0.0, 0.0),
            specular: Vec3::new(0.5, 0.0, 0.0),
        }];
    }

    let mut rng = StdRng::seed_from_u64(LIGHT_SEED.wrapping_add(1));
    (0..count)
        .map(|i| {
            let color = PALETTE[i as usize % PALETTE.len()];
            PointLight {
                light_pos: Vec3::new(
                    rng.gen_range(-1.0..1.0) * 5.0,
                    rng.gen_range(-1.0..1.0) * 2.0 + 2.0,
                    rng.gen_range(-1.0..1.0) * 5.0,
                ),
                constant: 1.0,
                linear: 2.0,
                quadratic: 1.0,
                ambient: Vec3::splat(0.01),
                diffuse: color * 4.0 / 5.0,
                specular: color,
            }
        })
        .collect()
}

/// Polished-silver material shared by every lit demo.
pub fn material() -> Material {
    Material {
        ambient: Vec3::splat(0.19225),
        diffuse: Vec3::splat(0.50754),
        specular: Vec3::splat(0.508273),
        shininess: 0.4,
    }
}

/// Full demo-4 scene: 400 instances lit by 2 directional + 100 point
/// lights.
pub fn scene() -> Scene {
    Scene {
        material: material(),
        dir_lights: dir_lights(NR_DIR_LIGHTS),
        point_lights: point_lights(NR_POINT_LIGHTS),
        instances: model_mats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_400_instances() {
        assert_eq!(model_mats().len(), 400);
    }

    #[test]
    fn first_instance_sits_at_grid_corner() {
        let mats = model_mats();
        // i = j = k = 0: translation (5, 0, 5), no rotation, 0.1 scale.
        let origin = mats[0].transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(5.0, 0.0, 5.0)).length() < 1e-6);
        let unit = mats[0].transform_vector3(Vec3::X);
        assert!((unit.length() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn light_generation_is_deterministic() {
        assert_eq!(dir_lights(1), dir_lights(1));
        assert_eq!(point_lights(1), point_lights(1));
        assert_eq!(dir_lights(NR_DIR_LIGHTS), dir_lights(NR_DIR_LIGHTS));
        assert_eq!(point_lights(NR_POINT_LIGHTS), point_lights(NR_POINT_LIGHTS));
    }

    #[test]
    fn light_counts_match_requests() {
        assert_eq!(dir_lights(NR_DIR_LIGHTS).len(), NR_DIR_LIGHTS as usize);
        assert_eq!(point_lights(NR_POINT_LIGHTS).len(), NR_POINT_LIGHTS as usize);
    }

    #[test]
    fn scene_counts_flow_into_shader_injection() {
        let scene = scene();
        let counts = scene.light_counts();
        assert_eq!(counts.dir, NR_DIR_LIGHTS);
        assert_eq!(counts.point, NR_POINT_LIGHTS);
        assert_eq!(scene.instances.len(), 400);
    }
}
