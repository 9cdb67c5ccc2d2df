//! Shared scene data for the demo binaries.

pub mod data;
