//! Demo 3: one forward-lit cube spinning about Y under a fixed camera,
//! lit by a single directional + single point light.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use glam::{Mat4, Vec3};

use prism_engine::camera::perspective;
use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::geometry::CubeGeometry;
use prism_engine::lighting::{DirLight, PointLight};
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::ForwardPath;
use prism_engine::scene::Scene;
use prism_engine::window::{Runtime, RuntimeConfig};

use prism_demos::data;

const EYE: Vec3 = Vec3::new(0.0, 4.0, 4.0);
const RATE_DEG_PER_SEC: f32 = 30.0;

/// Warm key light + red fill from below-left, one of each kind.
fn scene() -> Scene {
    let key_color = Vec3::new(1.0, 1.0, 0.85);
    Scene {
        material: data::material(),
        dir_lights: vec![DirLight {
            light_dir: Vec3::new(2.0, 1.0, 0.0),
            ambient: key_color * 0.1,
            diffuse: key_color,
            specular: key_color,
        }],
        point_lights: vec![PointLight {
            light_pos: Vec3::new(-2.0, -2.0, 1.0),
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
            ambient: Vec3::ZERO,
            diffuse: Vec3::X,
            specular: Vec3::X,
        }],
        instances: vec![Mat4::IDENTITY],
    }
}

struct CubeApp {
    path: Option<ForwardPath>,
    geometry: Rc<RefCell<CubeGeometry>>,
    angle_deg: f32,
}

impl App for CubeApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.angle_deg += RATE_DEG_PER_SEC * ctx.time.dt;

        let (path, geometry, angle_deg) = (&mut self.path, &self.geometry, self.angle_deg);
        let view = Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y);

        ctx.render(|rctx, target| {
            if path.is_none() {
                let aspect = rctx.size.width as f32 / rctx.size.height.max(1) as f32;
                *path = Some(ForwardPath::new(
                    rctx,
                    &scene(),
                    Rc::clone(geometry),
                    perspective(aspect, 0.1, 10.0),
                )?);
            }
            let Some(path) = path.as_mut() else {
                return Ok(());
            };

            path.write_instance(rctx.queue, 0, Mat4::from_rotation_y(angle_deg.to_radians()));
            path.render_frame(rctx, target, view, EYE)
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "demo3 - rotating cube".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        CubeApp {
            path: None,
            geometry: Rc::new(RefCell::new(CubeGeometry::new())),
            angle_deg: 0.0,
        },
    )
}
