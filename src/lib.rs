pub mod artifacts;
pub mod cli;
pub mod config;
pub mod constants;
pub mod distribute;
pub mod error;
pub mod fetch;
pub mod locations;
pub mod logger;
pub mod processing;
pub mod run;
pub mod success_log;
pub mod utils;

pub use artifacts::{source_extension, ArtifactPaths};
pub use config::{Config, ConfigOverrides};
pub use distribute::{distribute, Distribution};
pub use error::{
    BeandregsError, ConfigError, DistributeError, FetchError, ItemError, LocationError,
    ProcessError, Result, SetupError,
};
pub use fetch::{FetchSource, Fetcher};
pub use locations::{Location, Locations};
pub use processing::{process_artifact, thumbnail_dimensions, ResizeOutcome};
pub use run::{run, ItemReport, RunContext, RunSummary, Stage};
pub use success_log::SuccessLog;
