//! Layered configuration resolution for data-pipeline QA
//!
//! Resolves the settings for one team and environment by merging, in order:
//!
//! - the team's layered settings file (common section, then environment section)
//! - prefixed process environment variables, when requested
//! - secrets from a remote store (Vault, AWS Secrets Manager, SSM Parameter
//!   Store), synchronized through a local cache file
//!
//! The result is a [`SettingsStore`], a mutex-guarded mapping that
//! collaborators read from. Every input is a [`Source`]; the store knows
//! nothing else about where settings come from.
//!
//! # Example
//!
//! ```ignore
//! use seedconf_core::{ConfigRequest, SourceKind, initialize_config};
//!
//! let request = ConfigRequest::new("org_team", "dev")
//!     .detect_env_vars(true)
//!     .remote(SourceKind::Vault);
//! let store = initialize_config(std::path::Path::new("."), &request)?;
//! let host = store.get_str("db_host");
//! ```

pub mod error;
pub mod init;
pub mod layering;
pub mod layout;
pub mod lazy;
pub mod matrix;
pub mod remote;
pub mod source;
pub mod store;
pub mod sync;
pub mod team;

pub use error::{Error, Result};
pub use init::{ConfigRequest, Initializer, initialize_config};
pub use layering::{LayeredSource, resolve_layers};
pub use layout::{FrameworkConfig, ProjectLayout};
pub use lazy::LazySettings;
pub use matrix::Matrix;
pub use remote::{RemoteParams, RemoteSource, SecretBackend, SourceKind};
pub use source::{EnvSource, FileSource, Source};
pub use store::SettingsStore;
pub use sync::{SecretSync, SyncDirection, SyncOutcome, read_cached};
pub use team::{Environment, TeamKey};

/// Resolved settings: string keys to arbitrary JSON-compatible values.
pub type Settings = std::collections::BTreeMap<String, serde_json::Value>;
