//! Two-pass deferred path: a geometry pass rasterizes the scene into the
//! G-buffer, then a full-screen resolve pass evaluates lighting once per
//! visible pixel.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::geometry::{CubeGeometry, Geometry};
use crate::lighting::{LightingBinder, LightingLayout};
use crate::scene::Scene;
use crate::shader::{inject_light_counts, link_scope, ShaderProgram};

use super::common::{
    binding_size, depth_stencil_state, CameraUniform, MaterialUniform, ModelTable,
};
use super::ctx::{RenderCtx, RenderTarget};
use super::gbuffer::{gbuffer_color_formats, GBuffer, GBUFFER_TARGETS};
use super::SCREEN_CLEAR;

const SCENE_VERT: &str = include_str!("shaders/scene.vert.wgsl");
const LIGHTING_INC: &str = include_str!("shaders/lighting.inc.wgsl");
const GBUFFER_FRAG: &str = include_str!("shaders/gbuffer.frag.wgsl");
const RESOLVE_VERT: &str = include_str!("shaders/resolve.vert.wgsl");
const RESOLVE_FRAG: &str = include_str!("shaders/resolve.frag.wgsl");

/// Full-screen quad as two CCW triangles in clip space.
#[rustfmt::skip]
const QUAD_POSITIONS: [f32; 12] = [
    -1.0, -1.0,   1.0, -1.0,  -1.0,  1.0,
    -1.0,  1.0,   1.0, -1.0,   1.0,  1.0,
];

#[rustfmt::skip]
const QUAD_TEXCOORDS: [f32; 12] = [
     0.0,  0.0,   1.0,  0.0,   0.0,  1.0,
     0.0,  1.0,   1.0,  0.0,   1.0,  1.0,
];

pub struct DeferredPath {
    geometry_pipeline: wgpu::RenderPipeline,
    resolve_pipeline: wgpu::RenderPipeline,

    camera_buf: wgpu::Buffer,
    lighting: LightingBinder,
    scene_group: wgpu::BindGroup,
    models: ModelTable,
    model_group: wgpu::BindGroup,

    resolve_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_positions: wgpu::Buffer,
    quad_texcoords: wgpu::Buffer,

    // Recreated together whenever the drawable size changes.
    gbuffer: Option<GBuffer>,
    resolve_group: Option<wgpu::BindGroup>,

    geometry: Rc<RefCell<CubeGeometry>>,
}

impl DeferredPath {
    pub fn new(
        ctx: &RenderCtx<'_>,
        scene: &Scene,
        geometry: Rc<RefCell<CubeGeometry>>,
        projection: Mat4,
    ) -> Result<Self> {
        let counts = scene.light_counts();
        let resolve_fs = inject_light_counts(&format!("{LIGHTING_INC}\n{RESOLVE_FRAG}"), counts)?;

        let geometry_program =
            ShaderProgram::compile(ctx.device, SCENE_VERT, GBUFFER_FRAG, "gbuffer program")?;
        let resolve_program =
            ShaderProgram::compile(ctx.device, RESOLVE_VERT, &resolve_fs, "resolve program")?;

        geometry.borrow_mut().load(ctx.device, 0, 1)?;

        let camera_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("deferred camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue.write_buffer(
            &camera_buf,
            0,
            bytemuck::bytes_of(&CameraUniform::new(projection, Mat4::IDENTITY)),
        );

        let material_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("deferred material ubo"),
                contents: bytemuck::bytes_of(&MaterialUniform::new(&scene.material)),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let lighting = LightingBinder::new(
            ctx.device,
            LightingLayout::resolve(counts),
            "deferred lighting ubo",
        );
        lighting.upload_static(ctx.queue, &scene.material, &scene.dir_lights, &scene.point_lights)?;

        let scene_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gbuffer scene bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(binding_size(
                                std::mem::size_of::<CameraUniform>() as u64,
                            )),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(binding_size(
                                std::mem::size_of::<MaterialUniform>() as u64,
                            )),
                        },
                        count: None,
                    },
                ],
            });

        let scene_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gbuffer scene bg"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material_buf.as_entire_binding(),
                },
            ],
        });

        let model_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gbuffer model bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(binding_size(ModelTable::BINDING_SIZE)),
                    },
                    count: None,
                }],
            });

        let models = ModelTable::new(ctx, &scene.instances, "deferred model table");

        let model_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gbuffer model bg"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: models.buffer(),
                    offset: 0,
                    size: Some(binding_size(ModelTable::BINDING_SIZE)),
                }),
            }],
        });

        let geometry_pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("gbuffer pipeline layout"),
                bind_group_layouts: &[&scene_layout, &model_layout],
                immediate_size: 0,
            });

        let gbuffer_targets: Vec<_> = gbuffer_color_formats()
            .into_iter()
            .map(|format| {
                Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })
            })
            .collect();

        let geo = geometry.borrow();
        let vertex_buffers = geo.vertex_buffer_layouts();
        let geometry_pipeline = link_scope(ctx.device, "gbuffer pipeline", || {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("gbuffer pipeline"),
                    layout: Some(&geometry_pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &geometry_program.vertex,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &vertex_buffers,
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: Some(wgpu::Face::Back),
                        ..Default::default()
                    },
                    depth_stencil: Some(depth_stencil_state()),
                    multisample: wgpu::MultisampleState::default(),
                    fragment: Some(wgpu::FragmentState {
                        module: &geometry_program.fragment,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &gbuffer_targets,
                    }),
                    multiview_mask: None,
                    cache: None,
                })
        })?;
        drop(geo);

        let mut resolve_entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(binding_size(lighting.layout().buffer_size())),
            },
            count: None,
        }];
        for i in 0..GBUFFER_TARGETS as u32 {
            resolve_entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 + i,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
        }
        resolve_entries.push(wgpu::BindGroupLayoutEntry {
            binding: 2 + GBUFFER_TARGETS as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });

        let resolve_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("resolve bgl"),
                entries: &resolve_entries,
            });

        let resolve_pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("resolve pipeline layout"),
                bind_group_layouts: &[&resolve_layout],
                immediate_size: 0,
            });

        let quad_attrs_position = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }];
        let quad_attrs_texcoord = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 1,
        }];

        let surface_format = ctx.surface_format;
        let resolve_pipeline = link_scope(ctx.device, "resolve pipeline", || {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("resolve pipeline"),
                    layout: Some(&resolve_pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &resolve_program.vertex,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[
                            wgpu::VertexBufferLayout {
                                array_stride: 8,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &quad_attrs_position,
                            },
                            wgpu::VertexBufferLayout {
                                array_stride: 8,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &quad_attrs_texcoord,
                            },
                        ],
                    },
                    primitive: wgpu::PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    fragment: Some(wgpu::FragmentState {
                        module: &resolve_program.fragment,
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

        let quad_positions = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("resolve quad position vbo"),
                contents: bytemuck::cast_slice(&QUAD_POSITIONS),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let quad_texcoords = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("resolve quad texcoord vbo"),
                contents: bytemuck::cast_slice(&QUAD_TEXCOORDS),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gbuffer sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            geometry_pipeline,
            resolve_pipeline,
            camera_buf,
            lighting,
            scene_group,
            models,
            model_group,
            resolve_layout,
            sampler,
            quad_positions,
            quad_texcoords,
            gbuffer: None,
            resolve_group: None,
            geometry,
        })
    }

    pub fn render_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: Mat4,
        eye: Vec3,
    ) -> Result<()> {
        self.ensure_targets(ctx);

        ctx.queue.write_buffer(
            &self.camera_buf,
            CameraUniform::VIEW_OFFSET,
            bytemuck::cast_slice(&view.to_cols_array()),
        );
        self.lighting.set_eye(ctx.queue, eye);

        let gbuffer = self.gbuffer.as_ref().ok_or_else(|| anyhow::anyhow!("gbuffer missing"))?;
        let resolve_group = self
            .resolve_group
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("resolve bind group missing"))?;
        let geometry = self.geometry.borrow();

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gbuffer pass"),
                color_attachments: &gbuffer.color_attachments(),
                depth_stencil_attachment: Some(gbuffer.depth_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.geometry_pipeline);
            rpass.set_bind_group(0, &self.scene_group, &[]);

            for i in 0..self.models.len() {
                rpass.set_bind_group(1, &self.model_group, &[self.models.dynamic_offset(i)]);
                geometry.draw(&mut rpass)?;
            }
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("resolve pass"),
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

        rpass.set_pipeline(&self.resolve_pipeline);
        rpass.set_bind_group(0, resolve_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_positions.slice(..));
        rpass.set_vertex_buffer(1, self.quad_texcoords.slice(..));
        rpass.draw(0..6, 0..1);

        Ok(())
    }

    /// Recreates the G-buffer and its resolve bind group when the
    /// drawable size changes; both have the same lifetime.
    fn ensure_targets(&mut self, ctx: &RenderCtx<'_>) {
        let stale = self.gbuffer.as_ref().is_none_or(|g| g.size() != ctx.size);
        if !stale {
            return;
        }

        let gbuffer = GBuffer::new(ctx.device, ctx.size);

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 1,
            resource: self.lighting.buffer().as_entire_binding(),
        }];
        for (i, view) in gbuffer.views().iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: 2 + i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        entries.push(wgpu::BindGroupEntry {
            binding: 2 + GBUFFER_TARGETS as u32,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });

        self.resolve_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("resolve bg"),
            layout: &self.resolve_layout,
            entries: &entries,
        }));
        self.gbuffer = Some(gbuffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_quad_is_six_vertices() {
        assert_eq!(QUAD_POSITIONS.len(), 6 * 2);
        assert_eq!(QUAD_TEXCOORDS.len(), 6 * 2);
    }

    #[test]
    fn quad_texcoords_stay_in_unit_range() {
        assert!(QUAD_TEXCOORDS.iter().all(|&t| (0.0..=1.0).contains(&t)));
    }

    #[test]
    fn both_paths_share_one_lighting_source() {
        // The resolve and forward fragment stages prepend the same
        // include, so the accumulated color is identical by construction.
        let forward = include_str!("shaders/forward.frag.wgsl");
        assert!(!LIGHTING_INC.is_empty());
        assert!(RESOLVE_FRAG.contains("shade("));
        assert!(forward.contains("shade("));
    }
}
