//! Filesystem layer for seedconf
//!
//! Provides normalized path handling, locked atomic writes, format-agnostic
//! structured file loading, and project-root discovery.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod project;

pub use config::ConfigStore;
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use project::find_project_root;
