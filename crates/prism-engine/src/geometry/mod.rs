//! Static geometry owned by the render paths.
//!
//! Geometry is a capability interface rather than a base class: concrete
//! models implement `load` + `draw` over their own GPU buffers.

mod cube;

pub use cube::CubeGeometry;

use anyhow::Result;

/// A drawable model with GPU-resident vertex state.
pub trait Geometry {
    /// Uploads vertex data and wires the given attribute slots.
    ///
    /// Idempotent: a second call is a no-op, so multiple render paths may
    /// share one geometry instance without redundant uploads.
    fn load(&mut self, device: &wgpu::Device, position_slot: u32, normal_slot: u32) -> Result<()>;

    /// Issues the indexed draw for this model.
    ///
    /// Drawing before `load` is a programming error and fails immediately.
    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) -> Result<()>;
}
