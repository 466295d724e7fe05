//! Tarball discovery
//!
//! Equivalent of the glob `<root>/**/*.tgz`: every regular file whose name
//! ends in `.tgz`, at any depth below the root. Symbolic links are followed;
//! broken links and links back to an ancestor directory are skipped with a
//! warning. Entries of each directory are visited in file-name order.

use crate::core::error::{PublishError, Result};
use crate::validation::TARBALL_SUFFIX;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find candidate tarballs under `root`
///
/// A missing root yields no candidates.
pub async fn find_tarballs(root: &Path) -> Result<Vec<PathBuf>> {
    let owned = root.to_path_buf();

    tokio::task::spawn_blocking(move || walk(&owned))
        .await
        .map_err(|e| PublishError::Discovery {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?
}

fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        tracing::warn!("Search path {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut tarballs = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_skippable(&e) => {
                tracing::warn!("Skipping {}", e);
                continue;
            }
            Err(e) => {
                return Err(PublishError::Discovery {
                    root: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        if entry.file_type().is_file() && is_tarball(entry.path()) {
            tarballs.push(entry.into_path());
        }
    }

    Ok(tarballs)
}

/// Dangling links and filesystem loops below the root
fn is_skippable(error: &walkdir::Error) -> bool {
    if error.depth() == 0 {
        return false;
    }

    error.loop_ancestor().is_some()
        || error
            .io_error()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

fn is_tarball(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(TARBALL_SUFFIX))
}
