use anyhow::Result;
use wgpu::util::DeviceExt;

use super::Geometry;

/// Unit cube: 24 vertices (4 per face, duplicated at edges so each face
/// keeps a flat normal) and 36 indices forming 12 triangles.
///
/// Winding is counter-clockwise for front faces in a right-handed
/// coordinate system, so back-face culling works unchanged.
#[rustfmt::skip]
pub const CUBE_POSITIONS: [f32; 72] = [
     1.0,  1.0, -1.0,   1.0,  1.0,  1.0,   1.0, -1.0,  1.0,   1.0, -1.0, -1.0, // +X
    -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0, // -X
    -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0, // +Y
    -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0, // -Y
    -1.0,  1.0,  1.0,  -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0, // +Z
    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,  -1.0, -1.0, -1.0, // -Z
];

#[rustfmt::skip]
pub const CUBE_NORMALS: [f32; 72] = [
     1.0,  0.0,  0.0,   1.0,  0.0,  0.0,   1.0,  0.0,  0.0,   1.0,  0.0,  0.0,
    -1.0,  0.0,  0.0,  -1.0,  0.0,  0.0,  -1.0,  0.0,  0.0,  -1.0,  0.0,  0.0,
     0.0,  1.0,  0.0,   0.0,  1.0,  0.0,   0.0,  1.0,  0.0,   0.0,  1.0,  0.0,
     0.0, -1.0,  0.0,   0.0, -1.0,  0.0,   0.0, -1.0,  0.0,   0.0, -1.0,  0.0,
     0.0,  0.0,  1.0,   0.0,  0.0,  1.0,   0.0,  0.0,  1.0,   0.0,  0.0,  1.0,
     0.0,  0.0, -1.0,   0.0,  0.0, -1.0,   0.0,  0.0, -1.0,   0.0,  0.0, -1.0,
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
     0,  1,  2,   0,  2,  3,
     4,  5,  6,   4,  6,  7,
     8,  9, 10,   8, 10, 11,
    12, 13, 14,  12, 14, 15,
    16, 17, 18,  16, 18, 19,
    20, 21, 22,  20, 22, 23,
];

/// Cube model with position/normal/index buffers and the two attribute
/// slots they feed.
pub struct CubeGeometry {
    position_buf: Option<wgpu::Buffer>,
    normal_buf: Option<wgpu::Buffer>,
    index_buf: Option<wgpu::Buffer>,

    attrs_position: [wgpu::VertexAttribute; 1],
    attrs_normal: [wgpu::VertexAttribute; 1],

    is_loaded: bool,
}

impl CubeGeometry {
    pub fn new() -> Self {
        Self {
            position_buf: None,
            normal_buf: None,
            index_buf: None,
            attrs_position: [wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
            attrs_normal: [wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 1,
            }],
            is_loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Vertex buffer layouts for pipeline creation: two tightly packed
    /// three-float buffers on the slots recorded by `load`.
    pub fn vertex_buffer_layouts(&self) -> [wgpu::VertexBufferLayout<'_>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.attrs_position,
            },
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.attrs_normal,
            },
        ]
    }
}

impl Default for CubeGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry for CubeGeometry {
    fn load(&mut self, device: &wgpu::Device, position_slot: u32, normal_slot: u32) -> Result<()> {
        if self.is_loaded {
            return Ok(());
        }

        self.attrs_position[0].shader_location = position_slot;
        self.attrs_normal[0].shader_location = normal_slot;

        self.position_buf = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube position vbo"),
            contents: bytemuck::cast_slice(&CUBE_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.normal_buf = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube normal vbo"),
            contents: bytemuck::cast_slice(&CUBE_NORMALS),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.index_buf = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube ibo"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));

        self.is_loaded = true;
        Ok(())
    }

    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) -> Result<()> {
        let (Some(positions), Some(normals), Some(indices)) =
            (&self.position_buf, &self.normal_buf, &self.index_buf)
        else {
            anyhow::bail!("cube drawn before load()");
        };

        rpass.set_vertex_buffer(0, positions.slice(..));
        rpass.set_vertex_buffer(1, normals.slice(..));
        rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..CUBE_INDICES.len() as u32, 0, 0..1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn position(i: u16) -> Vec3 {
        let i = i as usize * 3;
        Vec3::new(CUBE_POSITIONS[i], CUBE_POSITIONS[i + 1], CUBE_POSITIONS[i + 2])
    }

    fn normal(i: u16) -> Vec3 {
        let i = i as usize * 3;
        Vec3::new(CUBE_NORMALS[i], CUBE_NORMALS[i + 1], CUBE_NORMALS[i + 2])
    }

    #[test]
    fn data_shape() {
        assert_eq!(CUBE_POSITIONS.len(), 24 * 3);
        assert_eq!(CUBE_NORMALS.len(), 24 * 3);
        assert_eq!(CUBE_INDICES.len(), 36);
    }

    #[test]
    fn indices_are_in_bounds() {
        assert!(CUBE_INDICES.iter().all(|&i| i < 24));
    }

    #[test]
    fn normals_are_axis_aligned_unit_vectors() {
        for v in 0..24u16 {
            let n = normal(v);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert_eq!(n.abs().max_element(), 1.0);
        }
    }

    #[test]
    fn faces_share_one_flat_normal() {
        for face in 0..6u16 {
            let base = face * 4;
            let n = normal(base);
            for v in 1..4 {
                assert_eq!(normal(base + v), n);
            }
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_facing_out() {
        for tri in CUBE_INDICES.chunks(3) {
            let (a, b, c) = (position(tri[0]), position(tri[1]), position(tri[2]));
            let face_normal = (b - a).cross(c - a);
            // Cross product of CCW edges points along the stored normal.
            assert!(face_normal.dot(normal(tri[0])) > 0.0, "triangle {tri:?} winds backwards");
        }
    }

    #[test]
    fn new_cube_is_not_loaded() {
        let cube = CubeGeometry::new();
        assert!(!cube.is_loaded());
    }
}
