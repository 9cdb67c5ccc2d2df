//! Camera math for the demos.

mod orbit;

pub use orbit::{perspective, Orbit};
