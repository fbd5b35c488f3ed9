//! Team and environment identity
//!
//! A team key such as `org_sub_team` or `org.sub.team` names a directory
//! under the teams root (`org/sub/team`) and the prefix of the remote secret
//! path for each of its environments (`org/sub/team/<env>/secrets`).

use crate::{Error, Result};
use seedconf_fs::NormalizedPath;
use std::fmt;
use std::str::FromStr;

const SEPARATORS: [char; 2] = ['_', '.'];
const SECRETS_SEGMENT: &str = "secrets";

/// Hierarchical team identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamKey {
    raw: String,
    segments: Vec<String>,
}

impl TeamKey {
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidTeamKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if key.trim().is_empty() {
            return Err(invalid("key is empty"));
        }

        let segments: Vec<String> = key.split(SEPARATORS).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(invalid("key contains an empty segment"));
        }
        if segments
            .iter()
            .any(|s| s == ".." || s.contains(['/', '\\']) || s.trim() != s)
        {
            return Err(invalid("segments must be plain directory names"));
        }

        Ok(Self {
            raw: key.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Team directory under `teams_dir`.
    pub fn dir_under(&self, teams_dir: &NormalizedPath) -> NormalizedPath {
        teams_dir.join_all(&self.segments)
    }

    /// Remote secret path for `environment`.
    pub fn remote_path(&self, environment: &Environment) -> String {
        format!("{}/{}/{}", self.path(), environment, SECRETS_SEGMENT)
    }
}

impl FromStr for TeamKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Name of a deployment environment (`dev`, `stg`, ...).
///
/// Selects a section of the team settings file and a segment of the remote
/// secret path, so it must be non-empty and free of path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Environment(String);

impl Environment {
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed == ".." {
            return Err(Error::InvalidEnvironment {
                name: name.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Environment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
