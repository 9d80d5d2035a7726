use crate::constants::ORIGINAL_PREFIX;
use reqwest::Url;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The two files a location can produce.
///
/// `original` holds the bytes as fetched; `resized` is the final output.
/// Both live in the same directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub original: PathBuf,
    pub resized: PathBuf,
}

impl ArtifactPaths {
    /// Derives the artifact paths for `basename` (output dir joined with the
    /// location name) and the extension of `url`.
    ///
    /// The extension comes from the source's name only; it is not checked
    /// against the actual content type.
    pub fn resolve(basename: &Path, url: &str) -> Self {
        let ext = source_extension(url);

        let mut resized = basename.as_os_str().to_os_string();
        resized.push(&ext);

        let mut original_name = OsString::from(ORIGINAL_PREFIX);
        if let Some(name) = basename.file_name() {
            original_name.push(name);
        }
        original_name.push(&ext);
        let original = match basename.parent() {
            Some(dir) => dir.join(original_name),
            None => PathBuf::from(original_name),
        };

        Self {
            original,
            resized: PathBuf::from(resized),
        }
    }
}

/// Lower-cased extension of the final path segment of a URL or filesystem
/// path, including the leading dot, or an empty string when there is none.
///
/// Query strings and fragments of http(s) URLs are not part of the segment.
pub fn source_extension(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string)
            .unwrap_or_default(),
        _ => url.to_string(),
    };

    Path::new(&segment)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
