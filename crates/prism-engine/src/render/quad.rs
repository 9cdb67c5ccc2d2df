//! Colored-quad renderer: four interleaved position+color vertices drawn
//! as a triangle strip through a fixed projection * view matrix.

use anyhow::Result;
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::shader::{link_scope, ShaderProgram};

use super::common::binding_size;
use super::ctx::{RenderCtx, RenderTarget};
use super::SCREEN_CLEAR;

const QUAD_VERT: &str = include_str!("shaders/quad.vert.wgsl");
const QUAD_FRAG: &str = include_str!("shaders/quad.frag.wgsl");

/// x, y, r, g, b per vertex; strip order top-left, top-right,
/// bottom-left, bottom-right.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 20] = [
    -0.5,  0.5,   1.0, 1.0, 0.0,
     0.5,  0.5,   0.0, 1.0, 1.0,
    -0.5, -0.5,   1.0, 1.0, 1.0,
     0.5, -0.5,   1.0, 0.0, 1.0,
];

const VERTEX_STRIDE: u64 = 20;

pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    mvp_group: wgpu::BindGroup,
    vertices: wgpu::Buffer,
}

impl QuadRenderer {
    /// Builds the pipeline and writes the matrix once; the quad is fully
    /// static after this.
    pub fn new(ctx: &RenderCtx<'_>, mvp: Mat4) -> Result<Self> {
        let program = ShaderProgram::compile(ctx.device, QUAD_VERT, QUAD_FRAG, "quad program")?;

        let mvp_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad mvp ubo"),
                contents: bytemuck::cast_slice(&mvp.to_cols_array()),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let mvp_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quad mvp bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(binding_size(64)),
                    },
                    count: None,
                }],
            });

        let mvp_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad mvp bg"),
            layout: &mvp_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mvp_buf.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("quad pipeline layout"),
                bind_group_layouts: &[&mvp_layout],
                immediate_size: 0,
            });

        let attrs = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 8,
                shader_location: 1,
            },
        ];

        let surface_format = ctx.surface_format;
        let pipeline = link_scope(ctx.device, "quad pipeline", || {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("quad pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &program.vertex,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[wgpu::VertexBufferLayout {
                            array_stride: VERTEX_STRIDE,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &attrs,
                        }],
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleStrip,
                        ..Default::default()
                    },
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

        let vertices = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Ok(Self {
            pipeline,
            mvp_group,
            vertices,
        })
    }

    pub fn render_frame(&self, target: &mut RenderTarget<'_>) {
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quad pass"),
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

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.mvp_group, &[]);
        rpass.set_vertex_buffer(0, self.vertices.slice(..));
        rpass.draw(0..4, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_data_matches_stride() {
        assert_eq!(QUAD_VERTICES.len() as u64 * 4, 4 * VERTEX_STRIDE);
    }
}
