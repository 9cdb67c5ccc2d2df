//! Demo 2: a static colored quad viewed through a fixed perspective
//! camera with a tilted up vector.

use std::f32::consts::FRAC_PI_2;

use anyhow::Result;
use glam::{Mat4, Vec3};

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::QuadRenderer;
use prism_engine::window::{Runtime, RuntimeConfig};

/// 90 degree fov with square aspect; eye at (1, 0, -4) looking at
/// (0, 0, -6) with the up vector tilted to (1, 1, 0).
fn mvp() -> Mat4 {
    let projection = Mat4::perspective_rh(FRAC_PI_2, 1.0, 2.0, 100.0);
    let view = Mat4::look_at_rh(
        Vec3::new(1.0, 0.0, -4.0),
        Vec3::new(0.0, 0.0, -6.0),
        Vec3::new(1.0, 1.0, 0.0),
    );
    projection * view
}

#[derive(Default)]
struct QuadApp {
    renderer: Option<QuadRenderer>,
}

impl App for QuadApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let renderer = &mut self.renderer;

        ctx.render(|rctx, target| {
            if renderer.is_none() {
                *renderer = Some(QuadRenderer::new(rctx, mvp())?);
            }
            let Some(renderer) = renderer.as_mut() else {
                return Ok(());
            };

            renderer.render_frame(target);
            Ok(())
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "demo2 - colored quad".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        QuadApp::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mvp_keeps_the_quad_in_front_of_the_camera() {
        // Quad vertices sit at z = -6 in the vertex stage; the view target
        // is (0, 0, -6), so the quad center projects inside clip space.
        let clip = mvp() * glam::Vec4::new(0.0, 0.0, -6.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
