use crate::error::DistributeError;
use crate::utils::copy_with_metadata;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    Copied(PathBuf),
    /// The target already is the resized artifact.
    Skipped,
}

/// Copies `resized` into `target_dir`, unless both names resolve to the
/// same file.
pub fn distribute(resized: &Path, target_dir: &Path) -> Result<Distribution, DistributeError> {
    let file_name = resized
        .file_name()
        .ok_or_else(|| DistributeError::InvalidPath(resized.to_path_buf()))?;
    let dest = target_dir.join(file_name);

    if resolve_path(resized)? == resolve_path(&dest)? {
        debug!("{} is already in {}", resized.display(), target_dir.display());
        return Ok(Distribution::Skipped);
    }

    copy_with_metadata(resized, &dest).map_err(|source| DistributeError::Copy {
        from: resized.to_path_buf(),
        to: dest.clone(),
        source,
    })?;
    debug!("Copied {} to {}", resized.display(), target_dir.display());

    Ok(Distribution::Copied(dest))
}

/// Canonical form of `path`, resolving symlinks. A path that does not exist
/// yet is resolved through its parent directory.
fn resolve_path(path: &Path) -> Result<PathBuf, DistributeError> {
    let resolve_error = |source| DistributeError::Resolve {
        path: path.to_path_buf(),
        source,
    };

    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) => match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => {
                let parent = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
                Ok(fs::canonicalize(parent).map_err(resolve_error)?.join(name))
            }
            _ => Err(resolve_error(e)),
        },
    }
}
