//! Shared helpers for the release pipeline.

pub mod fs;
pub mod process;
