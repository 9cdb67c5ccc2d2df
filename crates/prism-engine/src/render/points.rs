//! Clicked-point renderer: draws a small quad per recorded point, with
//! the instance list rewritten whenever the set of points changes.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::shader::{link_scope, ShaderProgram};

use super::common::binding_size;
use super::ctx::{RenderCtx, RenderTarget};
use super::SCREEN_CLEAR;

const POINT_VERT: &str = include_str!("shaders/point.vert.wgsl");
const POINT_FRAG: &str = include_str!("shaders/point.frag.wgsl");

/// One recorded click: clip-space center plus a blue-channel opacity.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub pos: [f32; 2],
    pub opacity: f32,
}

pub struct PointsRenderer {
    pipeline: wgpu::RenderPipeline,
    viewport_buf: wgpu::Buffer,
    viewport_group: wgpu::BindGroup,

    instances: wgpu::Buffer,
    capacity: u32,
    len: u32,
}

impl PointsRenderer {
    const INITIAL_CAPACITY: u32 = 64;
    const INSTANCE_STRIDE: u64 = std::mem::size_of::<PointInstance>() as u64;

    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let program = ShaderProgram::compile(ctx.device, POINT_VERT, POINT_FRAG, "point program")?;

        let viewport_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point viewport ubo"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("point viewport bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(binding_size(16)),
                    },
                    count: None,
                }],
            });

        let viewport_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("point viewport bg"),
            layout: &viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buf.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("point pipeline layout"),
                bind_group_layouts: &[&viewport_layout],
                immediate_size: 0,
            });

        let instance_attrs = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 8,
                shader_location: 1,
            },
        ];

        let surface_format = ctx.surface_format;
        let pipeline = link_scope(ctx.device, "point pipeline", || {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("point pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &program.vertex,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[wgpu::VertexBufferLayout {
                            array_stride: Self::INSTANCE_STRIDE,
                            step_mode: wgpu::VertexStepMode::Instance,
                            attributes: &instance_attrs,
                        }],
                    },
                    primitive: wgpu::PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    fragment: Some(wgpu::FragmentState {
                        module: &program.fragment,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface_format,
                            blend: None,
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    multiview_mask: None,
                    cache: None,
                })
        })?;

        let capacity = Self::INITIAL_CAPACITY;
        let instances = Self::create_instance_buffer(ctx.device, capacity);

        Ok(Self {
            pipeline,
            viewport_buf,
            viewport_group,
            instances,
            capacity,
            len: 0,
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point instance vbo"),
            size: Self::INSTANCE_STRIDE * u64::from(capacity),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Replaces the instance list, growing the buffer when it no longer
    /// fits.
    pub fn set_points(&mut self, ctx: &RenderCtx<'_>, points: &[PointInstance]) {
        let needed = points.len() as u32;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.instances = Self::create_instance_buffer(ctx.device, self.capacity);
        }
        if !points.is_empty() {
            ctx.queue
                .write_buffer(&self.instances, 0, bytemuck::cast_slice(points));
        }
        self.len = needed;
    }

    pub fn render_frame(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let size: [f32; 4] = [ctx.size.width as f32, ctx.size.height as f32, 0.0, 0.0];
        ctx.queue
            .write_buffer(&self.viewport_buf, 0, bytemuck::cast_slice(&size));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("points pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(SCREEN_CLEAR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if self.len > 0 {
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.viewport_group, &[]);
            rpass.set_vertex_buffer(0, self.instances.slice(..));
            rpass.draw(0..6, 0..self.len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_stride_matches_attribute_layout() {
        assert_eq!(PointsRenderer::INSTANCE_STRIDE, 12);
    }
}
