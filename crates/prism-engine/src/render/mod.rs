//! GPU rendering subsystem.
//!
//! Each render path owns its GPU resources (pipelines, buffers, targets)
//! and exposes one `render_frame` entry point. Binding order is carried by
//! explicit context/target values instead of ambient state.

mod common;
mod ctx;
mod deferred;
mod forward;
mod gbuffer;
mod points;
mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use deferred::DeferredPath;
pub use forward::ForwardPath;
pub use gbuffer::{gbuffer_color_formats, GBuffer, GBUFFER_TARGETS};
pub use points::{PointInstance, PointsRenderer};
pub use quad::QuadRenderer;

/// Clear color of the visible framebuffer (matches the demos' grey).
pub(crate) const SCREEN_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};
