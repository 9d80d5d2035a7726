//! Append-only record of locations that made it through the whole pipeline.
//!
//! Each run adds a `# <timestamp>` header followed by one `name = url` line
//! per successful location. The file is never read back.

use crate::error::SetupError;
use crate::locations::Location;
use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub struct SuccessLog<W> {
    writer: W,
}

impl<W: Write> SuccessLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header<Tz: TimeZone>(&mut self, started: &DateTime<Tz>) -> io::Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        writeln!(self.writer, "# {}", iso8601_timestamp(started))?;
        self.writer.flush()
    }

    /// Appends `location` and flushes, so a crash later in the run keeps it.
    pub fn record(&mut self, location: &Location) -> io::Result<()> {
        writeln!(self.writer, "{}", location)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl SuccessLog<Box<dyn Write>> {
    /// Opens `path` for appending, creating it and its parent directories as
    /// needed. With no path the log discards everything.
    pub fn open(path: Option<&Path>) -> Result<Self, SetupError> {
        let Some(path) = path else {
            return Ok(Self::new(Box::new(io::sink())));
        };

        let open_error = |source| SetupError::OpenLog {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_error)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_error)?;

        Ok(Self::new(Box::new(file)))
    }
}

/// ISO-8601 timestamp with microseconds and the local UTC offset,
/// e.g. `2019-05-04T13:14:15.123456-05:00`.
pub fn iso8601_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn run_started() -> DateTime<Local> {
    Local::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use tempfile::TempDir;

    fn stamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2019-05-04T13:14:15.123456-05:00").unwrap()
    }

    #[test]
    fn test_iso8601_timestamp_keeps_offset() {
        assert_eq!(
            iso8601_timestamp(&stamp()),
            "2019-05-04T13:14:15.123456-05:00"
        );
    }

    #[test]
    fn test_header_and_records() {
        let mut log = SuccessLog::new(Vec::new());
        log.write_header(&stamp()).unwrap();
        log.record(&Location::new("cat", "http://example.test/cat.png"))
            .unwrap();

        let text = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(
            text,
            "# 2019-05-04T13:14:15.123456-05:00\ncat = http://example.test/cat.png\n"
        );
    }

    #[test]
    fn test_open_appends_across_runs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("images.log");

        for name in ["first", "second"] {
            let mut log = SuccessLog::open(Some(&path)).unwrap();
            log.write_header(&stamp()).unwrap();
            log.record(&Location::new(name, "x.png")).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "first = x.png");
        assert_eq!(lines[3], "second = x.png");
    }

    #[test]
    fn test_open_without_path_discards() {
        let mut log = SuccessLog::open(None).unwrap();
        log.write_header(&run_started()).unwrap();
        log.record(&Location::new("a", "b")).unwrap();
    }

    #[test]
    fn test_open_failure_is_setup_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let result = SuccessLog::open(Some(temp_dir.path()));
        assert!(matches!(result, Err(SetupError::OpenLog { .. })));
    }
}
