//! Shader program construction.
//!
//! Vertex and fragment sources are opaque WGSL strings compiled as separate
//! stages; light-count array sizes are injected into fragment source by
//! literal-text substitution before compilation.

mod inject;
mod program;

pub use inject::{inject_light_counts, LightCounts, DIR_COUNT_TOKEN, POINT_COUNT_TOKEN};
pub use program::{link_scope, ShaderProgram};
