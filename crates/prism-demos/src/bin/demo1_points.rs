//! Demo 1: paints a 10px point wherever the user clicks or drags, and
//! clears the canvas on Delete.

use anyhow::Result;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{PointInstance, PointsRenderer};
use prism_engine::window::{Runtime, RuntimeConfig};

struct PointsApp {
    renderer: Option<PointsRenderer>,

    // Clicks recorded in window pixels; converted to clip space each time
    // the instance list is rebuilt, so a resize keeps them anchored.
    clicks: Vec<PhysicalPosition<f64>>,
    cursor: PhysicalPosition<f64>,
    dragging: bool,
    dirty: bool,
}

impl PointsApp {
    fn new() -> Self {
        Self {
            renderer: None,
            clicks: Vec::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            dragging: false,
            dirty: false,
        }
    }

    fn record_click(&mut self) {
        self.clicks.push(self.cursor);
        self.dirty = true;
    }

    fn instances(&self, size: winit::dpi::PhysicalSize<u32>) -> Vec<PointInstance> {
        let (w, h) = (size.width.max(1) as f64, size.height.max(1) as f64);
        self.clicks
            .iter()
            .enumerate()
            .map(|(index, p)| PointInstance {
                pos: [
                    (2.0 * p.x / w - 1.0) as f32,
                    (1.0 - 2.0 * p.y / h) as f32,
                ],
                opacity: ((index % 40) + 1) as f32 / 40.0,
            })
            .collect()
    }
}

impl App for PointsApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = *position;
                if self.dragging {
                    self.record_click();
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.dragging = true;
                    self.record_click();
                }
                ElementState::Released => self.dragging = false,
            },

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Delete)
                {
                    self.clicks.clear();
                    self.dirty = true;
                }
            }

            WindowEvent::Resized(_) => self.dirty = true,

            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let instances = if self.dirty {
            Some(self.instances(ctx.window.physical_size()))
        } else {
            None
        };
        self.dirty = false;
        let renderer = &mut self.renderer;

        ctx.render(|rctx, target| {
            if renderer.is_none() {
                *renderer = Some(PointsRenderer::new(rctx)?);
            }
            let Some(renderer) = renderer.as_mut() else {
                return Ok(());
            };

            if let Some(instances) = &instances {
                renderer.set_points(rctx, instances);
            }

            renderer.render_frame(rctx, target);
            Ok(())
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "demo1 - clicked points".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        PointsApp::new(),
    )
}
