//! Project root discovery
//!
//! Walks up from a start directory until the marker file is found, the same
//! way git locates its repository from any subdirectory.

use crate::{Error, NormalizedPath, ProjectPath, Result};
use std::path::Path;

/// Find the nearest ancestor of `start` (inclusive) containing the
/// `seedconf.toml` marker.
pub fn find_project_root(start: &Path) -> Result<NormalizedPath> {
    find_root_with_marker(start, ProjectPath::Marker.as_str())
}

/// Find the nearest ancestor of `start` (inclusive) containing `marker`.
pub fn find_root_with_marker(start: &Path, marker: &str) -> Result<NormalizedPath> {
    let canonical = dunce::canonicalize(start).map_err(|e| Error::io(start, e))?;

    for dir in canonical.ancestors() {
        if dir.join(marker).is_file() {
            tracing::debug!(root = %dir.display(), marker, "Found project root");
            return Ok(NormalizedPath::new(dir));
        }
    }

    Err(Error::ProjectRootNotFound {
        start: start.to_path_buf(),
        marker: marker.to_string(),
    })
}
