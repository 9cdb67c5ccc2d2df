use anyhow::Result;
use glam::Vec3;

use super::layout::{LightingLayout, EYE_POS_OFFSET};
use super::types::{DirLight, Material, PointLight};

/// Owns the lighting uniform buffer and pushes values into it.
///
/// Static fields (material + both light arrays) are written exactly once
/// at setup; only the eye position is rewritten per frame.
pub struct LightingBinder {
    layout: LightingLayout,
    buffer: wgpu::Buffer,
}

impl LightingBinder {
    pub fn new(device: &wgpu::Device, layout: LightingLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: layout.buffer_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { layout, buffer }
    }

    pub fn layout(&self) -> &LightingLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Packs and uploads the static portion of the block in one write.
    ///
    /// The slice lengths must match the counts compiled into the shader;
    /// a mismatch would silently light the scene wrong, so it errors here.
    pub fn upload_static(
        &self,
        queue: &wgpu::Queue,
        material: &Material,
        dir_lights: &[DirLight],
        point_lights: &[PointLight],
    ) -> Result<()> {
        let bytes = pack_block(&self.layout, material, dir_lights, point_lights)?;
        queue.write_buffer(&self.buffer, 0, &bytes);
        Ok(())
    }

    /// Rewrites the per-frame eye position at the head of the block.
    pub fn set_eye(&self, queue: &wgpu::Queue, eye: Vec3) {
        let slot: [f32; 4] = [eye.x, eye.y, eye.z, 0.0];
        queue.write_buffer(&self.buffer, EYE_POS_OFFSET, bytemuck::cast_slice(&slot));
    }
}

/// Packs material + lights into a CPU-side image of the uniform block,
/// placing every field at its resolved offset.
pub fn pack_block(
    layout: &LightingLayout,
    material: &Material,
    dir_lights: &[DirLight],
    point_lights: &[PointLight],
) -> Result<Vec<u8>> {
    let counts = layout.counts();
    anyhow::ensure!(
        dir_lights.len() == counts.dir as usize,
        "{} dir lights supplied but shader was compiled for {}",
        dir_lights.len(),
        counts.dir
    );
    anyhow::ensure!(
        point_lights.len() == counts.point as usize,
        "{} point lights supplied but shader was compiled for {}",
        point_lights.len(),
        counts.point
    );

    let mut bytes = vec![0u8; layout.buffer_size() as usize];

    write_vec3(&mut bytes, layout.offset_of("material.ambient")?, material.ambient);
    write_f32(&mut bytes, layout.offset_of("material.shininess")?, material.shininess);
    write_vec3(&mut bytes, layout.offset_of("material.diffuse")?, material.diffuse);
    write_vec3(&mut bytes, layout.offset_of("material.specular")?, material.specular);

    for (i, light) in dir_lights.iter().enumerate() {
        write_vec3(&mut bytes, layout.offset_of(&format!("dirLights[{i}].lightDir"))?, light.light_dir);
        write_vec3(&mut bytes, layout.offset_of(&format!("dirLights[{i}].ambient"))?, light.ambient);
        write_vec3(&mut bytes, layout.offset_of(&format!("dirLights[{i}].diffuse"))?, light.diffuse);
        write_vec3(&mut bytes, layout.offset_of(&format!("dirLights[{i}].specular"))?, light.specular);
    }

    for (j, light) in point_lights.iter().enumerate() {
        write_vec3(&mut bytes, layout.offset_of(&format!("pointLights[{j}].lightPos"))?, light.light_pos);
        write_f32(&mut bytes, layout.offset_of(&format!("pointLights[{j}].constant"))?, light.constant);
        write_vec3(&mut bytes, layout.offset_of(&format!("pointLights[{j}].ambient"))?, light.ambient);
        write_f32(&mut bytes, layout.offset_of(&format!("pointLights[{j}].linear"))?, light.linear);
        write_vec3(&mut bytes, layout.offset_of(&format!("pointLights[{j}].diffuse"))?, light.diffuse);
        write_f32(&mut bytes, layout.offset_of(&format!("pointLights[{j}].quadratic"))?, light.quadratic);
        write_vec3(&mut bytes, layout.offset_of(&format!("pointLights[{j}].specular"))?, light.specular);
    }

    Ok(bytes)
}

fn write_vec3(bytes: &mut [u8], offset: u64, v: Vec3) {
    let offset = offset as usize;
    bytes[offset..offset + 12].copy_from_slice(bytemuck::cast_slice(&[v.x, v.y, v.z]));
}

fn write_f32(bytes: &mut [u8], offset: u64, v: f32) {
    let offset = offset as usize;
    bytes[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::LightCounts;

    fn read_f32(bytes: &[u8], offset: u64) -> f32 {
        let offset = offset as usize;
        f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn sample_material() -> Material {
        Material {
            ambient: Vec3::splat(0.19225),
            diffuse: Vec3::splat(0.50754),
            specular: Vec3::splat(0.508273),
            shininess: 0.4,
        }
    }

    fn sample_dir() -> DirLight {
        DirLight {
            light_dir: Vec3::new(0.0, 0.5, 0.0),
            ambient: Vec3::splat(0.01),
            diffuse: Vec3::Z,
            specular: Vec3::Z,
        }
    }

    fn sample_point() -> PointLight {
        PointLight {
            light_pos: Vec3::new(0.0, 3.0, 5.5),
            constant: 1.0,
            linear: 2.0,
            quadratic: 1.0,
            ambient: Vec3::splat(0.01),
            diffuse: Vec3::new(0.5, 0.0, 0.0),
            specular: Vec3::new(0.5, 0.0, 0.0),
        }
    }

    #[test]
    fn packs_fields_at_resolved_offsets() {
        let layout = LightingLayout::resolve(LightCounts::ONE);
        let bytes =
            pack_block(&layout, &sample_material(), &[sample_dir()], &[sample_point()]).unwrap();

        assert_eq!(bytes.len() as u64, layout.buffer_size());
        assert_eq!(read_f32(&bytes, 16), 0.19225); // material.ambient.x
        assert_eq!(read_f32(&bytes, 28), 0.4); // material.shininess
        assert_eq!(read_f32(&bytes, 64 + 4), 0.5); // dirLights[0].lightDir.y
        assert_eq!(read_f32(&bytes, 128 + 4), 3.0); // pointLights[0].lightPos.y
        assert_eq!(read_f32(&bytes, 128 + 28), 2.0); // pointLights[0].linear
        assert_eq!(read_f32(&bytes, 128 + 44), 1.0); // pointLights[0].quadratic
    }

    #[test]
    fn eye_slot_stays_untouched_by_static_pack() {
        let layout = LightingLayout::resolve(LightCounts::ONE);
        let bytes =
            pack_block(&layout, &sample_material(), &[sample_dir()], &[sample_point()]).unwrap();
        assert!(bytes[..16].iter().all(|&b| b == 0));
    }

    #[test]
    fn light_count_mismatch_is_rejected() {
        let layout = LightingLayout::resolve(LightCounts::new(2, 1));
        let res = pack_block(&layout, &sample_material(), &[sample_dir()], &[sample_point()]);
        assert!(res.is_err());
    }
}
