//! Tests for error handling under adverse filesystem conditions
//!
//! Missing-file and permission errors from local files must surface with the
//! offending path attached, never be swallowed.

use seedconf_fs::{ConfigStore, NormalizedPath, io};
use tempfile::tempdir;

#[test]
fn read_text_nonexistent_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("does_not_exist.txt"));

    let result = io::read_text(&path);

    assert!(result.is_err(), "Reading non-existent file should fail");
}

#[test]
fn write_text_to_nonexistent_parent_creates_directories() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("org").join("sub").join("team").join(".secrets.toml"));

    io::write_text(&path, "[dev]\n").expect("write_text should create parent directories");

    let content = io::read_text(&path).unwrap();
    assert_eq!(content, "[dev]\n");
}

#[test]
fn write_atomic_cleans_up_temp_file_on_success() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("target.txt"));

    io::write_text(&path, "content").unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();

    assert!(
        leftovers.is_empty(),
        "No temp files should remain after successful write, found: {:?}",
        leftovers.iter().map(|e| e.file_name()).collect::<Vec<_>>()
    );
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn load_permission_denied_keeps_path() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("settings.toml");
        fs::write(&file_path, "[team_commons]\nkey = \"value\"\n").unwrap();
        fs::set_permissions(&file_path, Permissions::from_mode(0o000)).unwrap();

        let result = ConfigStore::new().load::<toml::Value>(&NormalizedPath::new(&file_path));

        let _ = fs::set_permissions(&file_path, Permissions::from_mode(0o644));

        let err = result.unwrap_err();
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("settings.toml"));
    }

    #[test]
    fn write_atomic_unwritable_parent_preserves_original() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("team");
        fs::create_dir(&parent).unwrap();

        let file_path = parent.join(".secrets.toml");
        fs::write(&file_path, "original").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = io::write_text(&NormalizedPath::new(&file_path), "new content");

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));

        assert!(result.is_err(), "Writing when parent is read-only should fail");
        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "original", "Original content must survive a failed write");
    }
}
