//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single demo window, and wires them
//! to the GPU layer. The redraw-requested callback is the frame pump:
//! exactly one frame is in flight at a time, and stopping the pump is the
//! only form of cancellation.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
