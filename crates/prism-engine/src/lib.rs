//! Prism engine crate.
//!
//! Shared runtime for the demo binaries: GPU device/surface management,
//! a single-window frame pump, and the forward/deferred render paths.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod shader;
pub mod geometry;
pub mod lighting;
pub mod scene;
pub mod render;
