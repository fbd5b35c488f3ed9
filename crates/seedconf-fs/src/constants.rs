//! Well-known project paths.

/// Standard locations inside a seedconf project, relative to the project root
/// unless noted otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// `seedconf.toml`, the marker file identifying the project root
    Marker,
    /// `custom_conf/teams`, the default root of the per-team directories
    TeamsDir,
    /// `settings.toml`, the layered settings file inside a team directory
    SettingsFile,
    /// `.secrets.toml`, the secrets cache file inside a team directory
    SecretsFile,
    /// `input_params/main_conf.json`, the resolution matrix
    MatrixFile,
}

impl ProjectPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marker => "seedconf.toml",
            Self::TeamsDir => "custom_conf/teams",
            Self::SettingsFile => "settings.toml",
            Self::SecretsFile => ".secrets.toml",
            Self::MatrixFile => "input_params/main_conf.json",
        }
    }
}

