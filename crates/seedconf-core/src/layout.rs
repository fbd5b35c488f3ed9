//! Project layout and framework configuration
//!
//! Every path the engine touches derives from the project root, the nearest
//! ancestor directory holding `seedconf.toml`. That marker file doubles as
//! the framework configuration; all of its fields are optional.

use crate::source::DEFAULT_ENV_PREFIX;
use crate::team::TeamKey;
use crate::Result;
use seedconf_fs::{ConfigStore, NormalizedPath, ProjectPath, find_project_root};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default name of the section shared by every environment.
pub const DEFAULT_COMMON_SECTION: &str = "team_commons";

/// Contents of `seedconf.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Root of the per-team directories, relative to the project root
    pub teams_dir: String,
    /// Layered settings file name inside a team directory
    pub settings_file: String,
    /// Secrets cache file name inside a team directory
    pub secrets_file: String,
    pub common_section: String,
    /// Prefix of environment variables imported when detection is on
    pub env_prefix: String,
    /// Resolution matrix, relative to the project root
    pub matrix_file: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            teams_dir: ProjectPath::TeamsDir.as_str().to_string(),
            settings_file: ProjectPath::SettingsFile.as_str().to_string(),
            secrets_file: ProjectPath::SecretsFile.as_str().to_string(),
            common_section: DEFAULT_COMMON_SECTION.to_string(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            matrix_file: ProjectPath::MatrixFile.as_str().to_string(),
        }
    }
}

impl FrameworkConfig {
    /// Load the framework configuration from a marker file.
    ///
    /// An empty marker file yields the defaults.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }
}

/// Resolved locations of a seedconf project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: NormalizedPath,
    config: FrameworkConfig,
}

impl ProjectLayout {
    pub fn new(root: impl Into<NormalizedPath>, config: FrameworkConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Walk up from `start` to the project root and read its marker file.
    pub fn discover(start: &Path) -> Result<Self> {
        let root = find_project_root(start)?;
        let config = FrameworkConfig::load(&root.join(ProjectPath::Marker.as_str()))?;
        tracing::debug!(root = %root, teams_dir = %config.teams_dir, "Discovered project layout");
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    pub fn teams_dir(&self) -> NormalizedPath {
        self.root.join(&self.config.teams_dir)
    }

    pub fn team_dir(&self, team: &TeamKey) -> NormalizedPath {
        team.dir_under(&self.teams_dir())
    }

    pub fn settings_file(&self, team: &TeamKey) -> NormalizedPath {
        self.team_dir(team).join(&self.config.settings_file)
    }

    pub fn secrets_file(&self, team: &TeamKey) -> NormalizedPath {
        self.team_dir(team).join(&self.config.secrets_file)
    }

    pub fn matrix_file(&self) -> NormalizedPath {
        self.root.join(&self.config.matrix_file)
    }
}
