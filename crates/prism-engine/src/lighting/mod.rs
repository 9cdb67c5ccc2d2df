//! Light/material data and the uniform block that carries it.
//!
//! Field offsets inside the GPU-side block are resolved once per program
//! setup from semantic names (`material.ambient`, `dirLights[2].diffuse`)
//! and then used to pack the block; an unknown name is a loud setup error,
//! never a silent no-op.

mod binder;
mod layout;
mod types;

pub use binder::{pack_block, LightingBinder};
pub use layout::{LightingLayout, EYE_POS_OFFSET};
pub use types::{DirLight, Material, PointLight};
