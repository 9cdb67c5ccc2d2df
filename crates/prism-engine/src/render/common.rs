//! Shared GPU types used by the scene render paths.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use winit::dpi::PhysicalSize;

use super::ctx::RenderCtx;

pub(super) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Projection + view matrices; projection is written at setup, view per
/// frame at offset [`CameraUniform::VIEW_OFFSET`].
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub projection: [f32; 16],
    pub view: [f32; 16],
}

impl CameraUniform {
    pub const VIEW_OFFSET: u64 = 64;

    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array(),
            view: view.to_cols_array(),
        }
    }
}

/// Material block for the G-buffer geometry program (the forward program
/// reads its material from the lighting block instead).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct MaterialUniform {
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub diffuse: [f32; 3],
    pub _pad0: f32,
    pub specular: [f32; 3],
    pub _pad1: f32,
}

impl MaterialUniform {
    pub fn new(m: &crate::lighting::Material) -> Self {
        Self {
            ambient: m.ambient.to_array(),
            shininess: m.shininess,
            diffuse: m.diffuse.to_array(),
            _pad0: 0.0,
            specular: m.specular.to_array(),
            _pad1: 0.0,
        }
    }
}

/// One 4x4 model transform per instance, each in its own dynamic-offset
/// slot so the instance loop stays one draw call per instance.
pub(super) struct ModelTable {
    buffer: wgpu::Buffer,
    stride: u64,
    len: u32,
}

impl ModelTable {
    /// Matrix size visible to the shader within each slot.
    pub const BINDING_SIZE: u64 = 64;

    pub fn new(ctx: &RenderCtx<'_>, instances: &[Mat4], label: &str) -> Self {
        let stride = u64::from(ctx.device.limits().min_uniform_buffer_offset_alignment)
            .max(Self::BINDING_SIZE);

        let len = instances.len() as u32;
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * u64::from(len.max(1)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let table = Self { buffer, stride, len };
        for (i, mat) in instances.iter().enumerate() {
            table.write(ctx.queue, i as u32, *mat);
        }
        table
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn dynamic_offset(&self, index: u32) -> u32 {
        (u64::from(index) * self.stride) as u32
    }

    /// Rewrites one instance transform (demo 3 spins its single cube).
    pub fn write(&self, queue: &wgpu::Queue, index: u32, mat: Mat4) {
        debug_assert!(index < self.len.max(1));
        queue.write_buffer(
            &self.buffer,
            u64::from(index) * self.stride,
            bytemuck::cast_slice(&mat.to_cols_array()),
        );
    }
}

/// Depth attachment sized to the drawable; recreated when the size changes.
pub(super) struct DepthTarget {
    pub view: wgpu::TextureView,
    pub size: PhysicalSize<u32>,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view, size }
    }

    pub fn attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }
}

pub(super) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// `NonZeroU64` binding size for a uniform whose size is known non-zero.
pub(super) fn binding_size(size: u64) -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(size).expect("uniform binding size must be non-zero")
}
