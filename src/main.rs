use beandregs::cli::Args;
use beandregs::constants::{APP_NAME, ERROR_PREFIX};
use beandregs::{logger, run, Config, Locations, Result, RunContext, RunSummary};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logger::init_logging(args.debug) {
        logger::init_console_logging(args.debug);
        error!("{} Diagnostic log unavailable, logging to console only: {}", ERROR_PREFIX, e);
    }
    debug!("** Start {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let code = match run_images(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} {}", ERROR_PREFIX, e);
            ExitCode::FAILURE
        }
    };

    debug!("** Stop {}", APP_NAME);
    code
}

/// Per-location failures are logged inside the run and never reach here;
/// only configuration and setup problems do.
fn run_images(args: &Args) -> Result<RunSummary> {
    let config = Config::load(args.config.as_deref(), args.overrides())?;
    debug!("Effective configuration:\n{}", config);

    let locations = Locations::open(args.images.as_deref())?;
    let ctx = RunContext::new(config)?;

    Ok(run(&ctx, locations)?)
}
