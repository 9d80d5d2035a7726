use crate::constants::FETCH_TIMEOUT_SECS;
use crate::error::FetchError;
use crate::utils::{copy_with_metadata, create_progress_spinner, format_file_size, parent_or_current};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::Builder;
use tracing::debug;

/// Where fetched bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Local { bytes: u64 },
    Remote { bytes: u64 },
}

impl FetchSource {
    pub fn bytes(&self) -> u64 {
        match self {
            FetchSource::Local { bytes } | FetchSource::Remote { bytes } => *bytes,
        }
    }
}

/// Obtains image bytes from local paths or over HTTP.
///
/// Requests run on a single-threaded tokio runtime owned by the fetcher, so
/// callers stay synchronous.
pub struct Fetcher {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("beandregs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Self::with_client(client)
    }

    /// Uses a preconfigured HTTP client (proxy, TLS or timeout settings).
    pub fn with_client(client: reqwest::Client) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(FetchError::Runtime)?;

        Ok(Self { client, runtime })
    }

    /// Fetches `source` into `dest`.
    ///
    /// An existing filesystem entry named by `source` is copied with its
    /// metadata; anything else is requested over HTTP. A file already at
    /// `dest` is overwritten. On HTTP failure nothing is written to `dest`.
    pub fn fetch(&self, source: &str, dest: &Path) -> Result<FetchSource, FetchError> {
        if dest.exists() {
            debug!("{} already exists, clobbering", dest.display());
        }

        let local = Path::new(source);
        if local.exists() {
            debug!("Copying local file {} to {}", source, dest.display());
            let bytes = copy_with_metadata(local, dest).map_err(|e| FetchError::Copy {
                from: local.to_path_buf(),
                to: dest.to_path_buf(),
                source: e,
            })?;
            return Ok(FetchSource::Local { bytes });
        }

        let spinner = create_progress_spinner(&format!("Fetching {}...", source));
        let body = self.runtime.block_on(self.get_async(source));
        spinner.finish_and_clear();
        let body = body?;

        write_atomically(dest, &body)?;
        debug!(
            "Fetched {} ({}) to {}",
            source,
            format_file_size(body.len() as u64),
            dest.display()
        );

        Ok(FetchSource::Remote {
            bytes: body.len() as u64,
        })
    }

    /// Performs a single GET and returns the full body of a successful
    /// response.
    pub async fn get_async(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}

/// Writes `contents` next to `dest` and renames it into place, so `dest` is
/// either untouched or complete.
fn write_atomically(dest: &Path, contents: &[u8]) -> Result<(), FetchError> {
    let write_error = |source| FetchError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let mut builder = Builder::new();
    // Same mode as a plain create: 0666 less the umask
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut temp = builder
        .tempfile_in(parent_or_current(dest))
        .map_err(write_error)?;
    temp.write_all(contents).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.persist(dest).map_err(|e| write_error(e.error))?;

    Ok(())
}
