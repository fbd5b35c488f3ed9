//! Command implementations for seedconf-cli

pub mod matrix;
pub mod resolve;

pub use matrix::run_matrix;
pub use resolve::{OutputFormat, run_resolve};
