use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {0}: must be a positive integer")]
    ZeroDimension(&'static str),
}

/// Failures that abort a run before any location is processed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to open success log {path}: {source}")]
    OpenLog { path: PathBuf, source: io::Error },

    #[error("Failed to write success log header: {0}")]
    WriteHeader(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Malformed location on line {line}: {content:?} (expected `name = url`)")]
    Malformed { line: usize, content: String },

    #[error("Failed to open image locations {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to read image locations: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Could not get {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Could not get {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to create HTTP runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("Could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Could not save {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to remove stale {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DistributeError {
    #[error("Invalid artifact path: {0}")]
    InvalidPath(PathBuf),

    #[error("Failed to resolve {path}: {source}")]
    Resolve { path: PathBuf, source: io::Error },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// A failure confined to a single location; the run carries on.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Distribute(#[from] DistributeError),
}

#[derive(Debug, Error)]
pub enum BeandregsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Locations(#[from] LocationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, BeandregsError>;
