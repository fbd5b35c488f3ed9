//! Layered settings files
//!
//! A team settings file holds one section shared by every environment plus
//! one section per environment:
//!
//! ```toml
//! [team_commons]
//! db_host = "db.internal"
//! timeout = 30
//!
//! [dev]
//! timeout = 5
//! ```
//!
//! Resolving `dev` yields the common section overlaid by the `dev` section.
//! The overlay is shallow: a top-level key from the environment section
//! replaces the common value whole, nested tables included.

use crate::source::Source;
use crate::{Error, Result, Settings};
use seedconf_fs::{ConfigStore, NormalizedPath};
use serde_json::Value;

/// Resolve the settings for `environment` from a layered file.
///
/// A missing file is a fatal error. Missing sections count as empty; a
/// section that is present but not a table is a configuration error.
pub fn resolve_layers(path: &NormalizedPath, environment: &str, common: &str) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::SettingsNotFound {
            path: path.to_native(),
        });
    }

    let document: Value = ConfigStore::new().load(path)?;
    let Value::Object(sections) = document else {
        return Err(Error::NotATable {
            path: path.to_native(),
        });
    };

    let section = |name: &str| -> Result<Settings> {
        match sections.get(name) {
            None => Ok(Settings::new()),
            Some(Value::Object(map)) => Ok(map.clone().into_iter().collect()),
            Some(_) => Err(Error::InvalidSection {
                path: path.to_native(),
                section: name.to_string(),
            }),
        }
    };

    let mut settings = section(common)?;
    let overrides = section(environment)?;
    tracing::debug!(
        path = %path,
        environment,
        common_keys = settings.len(),
        environment_keys = overrides.len(),
        "Resolved settings layers"
    );
    settings.extend(overrides);
    Ok(settings)
}

/// A layered settings file viewed through one environment.
#[derive(Debug, Clone)]
pub struct LayeredSource {
    path: NormalizedPath,
    environment: String,
    common: String,
}

impl LayeredSource {
    pub fn new(
        path: impl Into<NormalizedPath>,
        environment: impl Into<String>,
        common: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            environment: environment.into(),
            common: common.into(),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }
}

impl Source for LayeredSource {
    fn load(&self) -> Result<Settings> {
        resolve_layers(&self.path, &self.environment, &self.common)
    }

    fn describe(&self) -> &'static str {
        "layered"
    }
}
