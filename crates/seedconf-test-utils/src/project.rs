//! [`TestProject`] builder for seedconf test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEAMS_DIR: &str = "custom_conf/teams";

/// A temporary project root holding a `seedconf.toml` marker.
///
/// Team directories are addressed by their slash-separated path relative to
/// the teams directory, e.g. `"org/team"` for the team key `org_team`.
///
/// # Example
///
/// ```rust,no_run
/// use seedconf_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_team_settings("org/team", "[team_commons]\na = 1\n");
/// project.assert_file_exists("custom_conf/teams/org/team/settings.toml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create a project with an empty marker file, so every framework
    /// setting takes its default.
    pub fn new() -> Self {
        Self::with_marker("")
    }

    /// Create a project whose marker file has the given contents.
    pub fn with_marker(content: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("seedconf.toml"), content).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn team_dir(&self, team_path: &str) -> PathBuf {
        self.root().join(TEAMS_DIR).join(team_path)
    }

    /// Write `content` to `path` relative to the root, creating parents.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write the team's layered `settings.toml`.
    pub fn write_team_settings(&self, team_path: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{TEAMS_DIR}/{team_path}/settings.toml"), content)
    }

    /// Write the team's `.secrets.toml` cache.
    pub fn write_secrets(&self, team_path: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{TEAMS_DIR}/{team_path}/.secrets.toml"), content)
    }

    /// Read the team's `.secrets.toml` cache.
    ///
    /// # Panics
    /// Panics if the cache file does not exist.
    pub fn read_secrets(&self, team_path: &str) -> String {
        let path = self.team_dir(team_path).join(".secrets.toml");
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read secrets cache: {}", path.display()))
    }

    /// Write `input_params/main_conf.json`.
    pub fn write_matrix(&self, content: &str) -> PathBuf {
        self.write_file("input_params/main_conf.json", content)
    }

    /// Assert that `path` (relative to the root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
