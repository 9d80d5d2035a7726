//! Logging init: message-only console output plus a debug-level diagnostic
//! file in the current directory.

use crate::constants::DIAGNOSTIC_LOG_FILE;
use anyhow::Result;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Console verbosity: info by default, everything with `--debug`.
pub fn console_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Writer that is either the diagnostic file or stderr (used when the file
/// handle cannot be cloned).
enum FileOrStderr {
    File(File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// Initialize console logging and the diagnostic log file
/// (`beandregs.log` in the current directory).
///
/// `RUST_LOG` overrides the diagnostic file's debug filter. On failure
/// (e.g. the file cannot be opened) returns Err so the caller can fall back
/// to [`init_console_logging`].
pub fn init_logging(debug: bool) -> Result<()> {
    init_logging_to(Path::new(DIAGNOSTIC_LOG_FILE), debug)
}

pub fn init_logging_to(diagnostic_log: &Path, debug: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diagnostic_log)?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let file_layer = fmt::layer()
        .with_writer(FileMakeWriter(file))
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);

    Registry::default()
        .with(console_layer(debug))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging to stderr only (no file). Use when [`init_logging`]
/// fails so the run can still proceed.
pub fn init_console_logging(debug: bool) {
    let _ = Registry::default().with(console_layer(debug)).try_init();
}

fn console_layer<S>(debug: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_filter(console_level(debug))
}
