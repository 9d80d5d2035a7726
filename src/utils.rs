//! Utility functions for common operations
//!
//! Helpers shared by the fetch, distribute and config modules.

use crate::constants::{PROGRESS_SPINNER_TEMPLATE, SPINNER_TICK_MILLIS};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Create a progress spinner with consistent styling
///
/// The spinner draws to stderr and stays hidden when stderr is not a terminal.
///
/// # Arguments
/// * `message` - Initial message to display
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MILLIS));
    pb
}

/// Copy a file, carrying over its permissions and modification time.
///
/// The copy is staged next to `to` and renamed over it, so an existing file
/// at `to` is replaced even when it is read-only, and a read-only source
/// never needs to be reopened for writing.
///
/// # Returns
/// * Number of bytes copied
pub fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<u64> {
    let modified = fs::metadata(from)?.modified()?;

    let staged = NamedTempFile::new_in(parent_or_current(to))?;
    let bytes = fs::copy(from, staged.path())?;
    staged.as_file().set_modified(modified)?;
    staged.persist(to).map_err(|e| e.error)?;

    Ok(bytes)
}

/// Directory containing `path`; `.` for a bare file name.
pub(crate) fn parent_or_current(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Expand a leading `~` component to the current user's home directory.
///
/// Paths without a leading `~`, or systems without a home directory, are
/// returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
