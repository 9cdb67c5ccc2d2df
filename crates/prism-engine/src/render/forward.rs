//! Single-pass forward path: every fragment evaluates the full light
//! accumulation while the scene geometry rasterizes.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use glam::{Mat4, Vec3};

use crate::geometry::{CubeGeometry, Geometry};
use crate::lighting::{LightingBinder, LightingLayout};
use crate::scene::Scene;
use crate::shader::{inject_light_counts, link_scope, ShaderProgram};

use super::common::{binding_size, depth_stencil_state, CameraUniform, DepthTarget, ModelTable};
use super::ctx::{RenderCtx, RenderTarget};
use super::SCREEN_CLEAR;

const SCENE_VERT: &str = include_str!("shaders/scene.vert.wgsl");
const LIGHTING_INC: &str = include_str!("shaders/lighting.inc.wgsl");
const FORWARD_FRAG: &str = include_str!("shaders/forward.frag.wgsl");

pub struct ForwardPath {
    pipeline: wgpu::RenderPipeline,
    camera_buf: wgpu::Buffer,
    lighting: LightingBinder,
    scene_group: wgpu::BindGroup,
    models: ModelTable,
    model_group: wgpu::BindGroup,
    depth: Option<DepthTarget>,
    geometry: Rc<RefCell<CubeGeometry>>,
}

impl ForwardPath {
    pub fn new(
        ctx: &RenderCtx<'_>,
        scene: &Scene,
        geometry: Rc<RefCell<CubeGeometry>>,
        projection: Mat4,
    ) -> Result<Self> {
        let counts = scene.light_counts();
        let fs_src = inject_light_counts(&format!("{LIGHTING_INC}\n{FORWARD_FRAG}"), counts)?;
        let program = ShaderProgram::compile(ctx.device, SCENE_VERT, &fs_src, "forward program")?;

        geometry.borrow_mut().load(ctx.device, 0, 1)?;

        let camera_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("forward camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        ctx.queue.write_buffer(
            &camera_buf,
            0,
            bytemuck::bytes_of(&CameraUniform::new(projection, Mat4::IDENTITY)),
        );

        let lighting = LightingBinder::new(
            ctx.device,
            LightingLayout::resolve(counts),
            "forward lighting ubo",
        );
        lighting.upload_static(ctx.queue, &scene.material, &scene.dir_lights, &scene.point_lights)?;

        let scene_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("forward scene bgl"),
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
                            min_binding_size: Some(binding_size(lighting.layout().buffer_size())),
                        },
                        count: None,
                    },
                ],
            });

        let scene_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("forward scene bg"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting.buffer().as_entire_binding(),
                },
            ],
        });

        let model_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("forward model bgl"),
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

        let models = ModelTable::new(ctx, &scene.instances, "forward model table");

        let model_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("forward model bg"),
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

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("forward pipeline layout"),
                bind_group_layouts: &[&scene_layout, &model_layout],
                immediate_size: 0,
            });

        let geo = geometry.borrow();
        let vertex_buffers = geo.vertex_buffer_layouts();
        let surface_format = ctx.surface_format;
        let pipeline = link_scope(ctx.device, "forward pipeline", || {
            ctx.device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("forward pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &program.vertex,
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
        drop(geo);

        Ok(Self {
            pipeline,
            camera_buf,
            lighting,
            scene_group,
            models,
            model_group,
            depth: None,
            geometry,
        })
    }

    /// Rewrites one instance transform (demo 3 spins its single cube).
    pub fn write_instance(&self, queue: &wgpu::Queue, index: u32, model: Mat4) {
        self.models.write(queue, index, model);
    }

    pub fn render_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: Mat4,
        eye: Vec3,
    ) -> Result<()> {
        self.ensure_depth(ctx);

        ctx.queue.write_buffer(
            &self.camera_buf,
            CameraUniform::VIEW_OFFSET,
            bytemuck::cast_slice(&view.to_cols_array()),
        );
        self.lighting.set_eye(ctx.queue, eye);

        let depth = self.depth.as_ref().ok_or_else(|| anyhow::anyhow!("depth target missing"))?;
        let geometry = self.geometry.borrow();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("forward pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(SCREEN_CLEAR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(depth.attachment()),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.scene_group, &[]);

        // One draw per instance, each pointed at its own transform slot.
        for i in 0..self.models.len() {
            rpass.set_bind_group(1, &self.model_group, &[self.models.dynamic_offset(i)]);
            geometry.draw(&mut rpass)?;
        }

        Ok(())
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>) {
        let stale = self.depth.as_ref().is_none_or(|d| d.size != ctx.size);
        if stale {
            self.depth = Some(DepthTarget::new(ctx.device, ctx.size, "forward depth"));
        }
    }
}
