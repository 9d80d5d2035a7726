//! Per-run orchestration: directory setup, the fetch -> resize -> distribute
//! pipeline for each location, and the success log.

use crate::artifacts::ArtifactPaths;
use crate::config::Config;
use crate::constants::{ERROR_PREFIX, ITEM_PREFIX, SUCCESS_PREFIX, SUMMARY_PREFIX, WARNING_PREFIX};
use crate::distribute::{distribute, Distribution};
use crate::error::{FetchError, ItemError, LocationError, SetupError};
use crate::fetch::{FetchSource, Fetcher};
use crate::locations::Location;
use crate::processing::{process_artifact, ResizeOutcome};
use crate::success_log::{run_started, SuccessLog};
use crate::utils::format_file_size;
use std::fmt;
use std::fs;
use std::io::Write;
use tracing::{debug, error, info, warn};

/// Everything the pipeline needs, passed explicitly to each step.
pub struct RunContext {
    config: Config,
    fetcher: Fetcher,
}

impl RunContext {
    pub fn new(config: Config) -> Result<Self, FetchError> {
        Ok(Self::with_fetcher(config, Fetcher::new()?))
    }

    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the full pipeline for one location.
    pub fn process_location(&self, location: &Location) -> Result<ItemReport, ItemError> {
        let basename = self.config.output_dir.join(&location.name);
        let paths = ArtifactPaths::resolve(&basename, &location.url);

        let fetched = self.fetcher.fetch(&location.url, &paths.original)?;
        let resize = process_artifact(&paths, self.config.width, self.config.height)?;
        let distribution = distribute(&paths.resized, &self.config.resize_dir)?;

        Ok(ItemReport {
            paths,
            fetched,
            resize,
            distribution,
        })
    }
}

/// Result of a location that went through every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub paths: ArtifactPaths,
    pub fetched: FetchSource,
    pub resize: ResizeOutcome,
    pub distribution: Distribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Resize,
    Distribute,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Resize => "resize",
            Stage::Distribute => "distribute",
        };
        write!(f, "{}", name)
    }
}

impl ItemError {
    pub fn stage(&self) -> Stage {
        match self {
            ItemError::Fetch(_) => Stage::Fetch,
            ItemError::Process(_) => Stage::Resize,
            ItemError::Distribute(_) => Stage::Distribute,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Input lines that could not be read as a location.
    pub malformed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} locations attempted: {} succeeded, {} failed, {} malformed lines skipped",
            self.attempted, self.succeeded, self.failed, self.malformed
        )
    }
}

/// Creates the output and resize directories (with parents) if missing.
pub fn prepare_directories(config: &Config) -> Result<(), SetupError> {
    for dir in [&config.output_dir, &config.resize_dir] {
        if !dir.exists() {
            debug!("Creating directory: {}", dir.display());
        }
        fs::create_dir_all(dir).map_err(|source| SetupError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Processes every location, appending successes to the configured success
/// log.
///
/// Only setup problems are returned as errors: missing directories that
/// cannot be created, or a success log that cannot be opened. Failures of
/// individual locations are logged and counted in the summary.
pub fn run<I>(ctx: &RunContext, locations: I) -> Result<RunSummary, SetupError>
where
    I: IntoIterator<Item = Result<Location, LocationError>>,
{
    prepare_directories(ctx.config())?;
    let mut log = SuccessLog::open(ctx.config().log_file.as_deref())?;
    run_with_log(ctx, locations, &mut log)
}

/// Same as [`run`], writing successes to an already-open log. The output
/// directories must exist.
pub fn run_with_log<I, W>(
    ctx: &RunContext,
    locations: I,
    log: &mut SuccessLog<W>,
) -> Result<RunSummary, SetupError>
where
    I: IntoIterator<Item = Result<Location, LocationError>>,
    W: Write,
{
    log.write_header(&run_started())
        .map_err(SetupError::WriteHeader)?;

    let mut summary = RunSummary::default();

    for entry in locations {
        let location = match entry {
            Ok(location) => location,
            Err(e @ LocationError::Malformed { .. }) => {
                warn!("{}  Skipping: {}", WARNING_PREFIX, e);
                summary.malformed += 1;
                continue;
            }
            Err(e) => {
                error!("{} {}", ERROR_PREFIX, e);
                break;
            }
        };

        summary.attempted += 1;
        info!("{} {} <-- {}", ITEM_PREFIX, location.name, location.url);

        match ctx.process_location(&location) {
            Ok(report) => {
                log_report(&report);
                if let Err(e) = log.record(&location) {
                    error!(
                        "{} {} succeeded but could not be written to the success log: {}",
                        ERROR_PREFIX, location.name, e
                    );
                    summary.failed += 1;
                    continue;
                }
                summary.succeeded += 1;
            }
            Err(e) => {
                error!(
                    "{} {} failed during {}: {}",
                    ERROR_PREFIX,
                    location.name,
                    e.stage(),
                    e
                );
                debug!("{} <-- {}: {:?}", location.name, location.url, e);
                summary.failed += 1;
            }
        }
    }

    info!("{} {}", SUMMARY_PREFIX, summary);
    Ok(summary)
}

fn log_report(report: &ItemReport) {
    let (width, height) = report.resize.final_dimensions();
    let action = match report.resize {
        ResizeOutcome::Renamed { .. } => format!("kept at {}x{}", width, height),
        ResizeOutcome::Resized { from, .. } => {
            format!("resized {}x{} -> {}x{}", from.0, from.1, width, height)
        }
    };
    let origin = match report.fetched {
        FetchSource::Local { .. } => "copied",
        FetchSource::Remote { .. } => "downloaded",
    };
    debug!(
        "{} {} {} ({} {})",
        SUCCESS_PREFIX,
        report.paths.resized.display(),
        action,
        format_file_size(report.fetched.bytes()),
        origin
    );
}
