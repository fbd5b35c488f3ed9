//! Shared test fixtures for the seedconf workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`project`]: [`TestProject`](project::TestProject) builder writing a
//!   project root with team settings, secrets caches and a resolution matrix

pub mod project;

pub use project::TestProject;
