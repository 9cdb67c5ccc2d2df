//! Demo 4: 400 cubes under 2 directional + 100 point lights, rendered by
//! either the forward path or the two-pass deferred path. F selects
//! forward, D selects deferred; both paths stay alive once built so
//! switching back is instant.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use glam::Mat4;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::Key;

use prism_engine::camera::{perspective, Orbit};
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::geometry::CubeGeometry;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{DeferredPath, ForwardPath, RenderCtx};
use prism_engine::scene::Scene;
use prism_engine::window::{Runtime, RuntimeConfig};

use prism_demos::data;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PathKind {
    Forward,
    Deferred,
}

struct DeferredApp {
    scene: Scene,
    geometry: Rc<RefCell<CubeGeometry>>,
    orbit: Orbit,

    active: PathKind,
    forward: Option<ForwardPath>,
    deferred: Option<DeferredPath>,
}

impl DeferredApp {
    fn new() -> Self {
        Self {
            scene: data::scene(),
            geometry: Rc::new(RefCell::new(CubeGeometry::new())),
            orbit: Orbit::new(15.0),
            active: PathKind::Forward,
            forward: None,
            deferred: None,
        }
    }

    fn projection(rctx: &RenderCtx<'_>) -> Mat4 {
        let aspect = rctx.size.width as f32 / rctx.size.height.max(1) as f32;
        perspective(aspect, 0.1, 100.0)
    }
}

impl App for DeferredApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed {
                if let Key::Character(c) = &event.logical_key {
                    match c.as_str() {
                        "f" | "F" => {
                            if self.active != PathKind::Forward {
                                log::info!("switching to forward shading");
                                self.active = PathKind::Forward;
                            }
                        }
                        "d" | "D" => {
                            if self.active != PathKind::Deferred {
                                log::info!("switching to deferred shading");
                                self.active = PathKind::Deferred;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.orbit.advance(ctx.time.dt);
        let (view, eye) = (self.orbit.view(), self.orbit.eye());

        let active = self.active;
        let (scene, geometry) = (&self.scene, &self.geometry);
        let (forward, deferred) = (&mut self.forward, &mut self.deferred);

        ctx.render(|rctx, target| match active {
            PathKind::Forward => {
                if forward.is_none() {
                    *forward = Some(ForwardPath::new(
                        rctx,
                        scene,
                        Rc::clone(geometry),
                        Self::projection(rctx),
                    )?);
                }
                let Some(path) = forward.as_mut() else {
                    return Ok(());
                };
                path.render_frame(rctx, target, view, eye)
            }
            PathKind::Deferred => {
                if deferred.is_none() {
                    *deferred = Some(DeferredPath::new(
                        rctx,
                        scene,
                        Rc::clone(geometry),
                        Self::projection(rctx),
                    )?);
                }
                let Some(path) = deferred.as_mut() else {
                    return Ok(());
                };
                path.render_frame(rctx, target, view, eye)
            }
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "demo4 - deferred shading".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        DeferredApp::new(),
    )
}
