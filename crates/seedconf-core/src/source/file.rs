//! Local structured file source

use super::{Source, into_settings};
use crate::{Result, Settings};
use seedconf_fs::{ConfigStore, NormalizedPath};
use serde_json::Value;

/// Loads a whole TOML, JSON or YAML file as settings.
///
/// Missing files, permission failures and parse errors are returned with the
/// file path attached.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: NormalizedPath,
}

impl FileSource {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }
}

impl Source for FileSource {
    fn load(&self) -> Result<Settings> {
        let value: Value = ConfigStore::new().load(&self.path)?;
        into_settings(value, &self.path.to_native())
    }

    fn describe(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "key = \"value\"\nport = 5439\n").unwrap();

        let loaded = FileSource::new(path.as_path()).load().unwrap();

        assert_eq!(loaded.get("key"), Some(&json!("value")));
        assert_eq!(loaded.get("port"), Some(&json!(5439)));
    }

    #[test]
    fn loads_yaml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.yaml");
        fs::write(&path, "db:\n  host: localhost\n").unwrap();

        let loaded = FileSource::new(path.as_path()).load().unwrap();

        assert_eq!(loaded.get("db"), Some(&json!({"host": "localhost"})));
    }

    #[test]
    fn missing_file_is_not_found_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("invalid_settings.toml");

        let err = FileSource::new(path.as_path()).load().unwrap_err();

        match err {
            Error::Fs(fs_err) => {
                assert!(fs_err.is_not_found());
                assert!(fs_err.to_string().contains("invalid_settings.toml"));
            }
            other => panic!("expected filesystem error, got {other:?}"),
        }
    }

    #[test]
    fn json_array_is_not_a_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileSource::new(path.as_path()).load().unwrap_err();

        assert!(matches!(err, Error::NotATable { .. }));
    }
}
