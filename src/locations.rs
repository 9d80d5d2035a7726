//! Parsing of image-location lists.
//!
//! A list holds one `name = url-or-path` entry per line. Everything from the
//! first `#` to the end of a line is a comment, and blank lines are ignored.
//! The `#` check is purely lexical, so a `#` inside a URL also starts a comment.

use crate::constants::{COMMENT_MARKER, FIELD_SEPARATOR};
use crate::error::LocationError;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

/// A named reference to a single image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub url: String,
}

impl Location {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Parses one raw input line.
    ///
    /// # Returns
    /// * `None` for comment-only and blank lines
    /// * `Some(Err(LocationError::Malformed))` when the line has no `=` or an
    ///   empty name or url
    pub fn parse_line(raw: &str, line: usize) -> Option<Result<Self, LocationError>> {
        let content = match raw.find(COMMENT_MARKER) {
            Some(idx) => &raw[..idx],
            None => raw,
        };
        if content.trim().is_empty() {
            return None;
        }

        let malformed = || LocationError::Malformed {
            line,
            content: content.trim().to_string(),
        };

        let parsed = content
            .split_once(FIELD_SEPARATOR)
            .map(|(name, url)| (name.trim(), url.trim()))
            .filter(|(name, url)| !name.is_empty() && !url.is_empty())
            .map(|(name, url)| Location::new(name, url))
            .ok_or_else(malformed);

        Some(parsed)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.url)
    }
}

/// Lazy, single-pass sequence of locations read from a text source.
///
/// The sequence owns its reader and cannot be restarted. Malformed lines are
/// yielded as errors without ending iteration; a read failure is yielded once
/// and ends it.
pub struct Locations<R> {
    lines: Lines<R>,
    line: usize,
    finished: bool,
}

impl<R: BufRead> Locations<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            finished: false,
        }
    }
}

impl Locations<Box<dyn BufRead>> {
    /// Opens a named location file, or standard input when `path` is `None`.
    pub fn open(path: Option<&Path>) -> Result<Self, LocationError> {
        let reader: Box<dyn BufRead> = match path {
            Some(path) => {
                let file = File::open(path).map_err(|source| LocationError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(io::stdin().lock()),
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> Iterator for Locations<R> {
    type Item = Result<Location, LocationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(LocationError::Io(e)));
                }
            };
            self.line += 1;

            if let Some(parsed) = Location::parse_line(&raw, self.line) {
                return Some(parsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &str) -> Vec<Result<Location, LocationError>> {
        Locations::new(Cursor::new(input.to_string())).collect()
    }

    #[test]
    fn test_parse_simple_entries_in_order() {
        let parsed = collect("cat = http://example.test/cat.png\ndog=/tmp/dog.jpg\n");
        let locations: Vec<Location> = parsed.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            locations,
            vec![
                Location::new("cat", "http://example.test/cat.png"),
                Location::new("dog", "/tmp/dog.jpg"),
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let input = "# header comment\n\n   \t\ncat = a.png # trailing note\n  # indented\n";
        let parsed = collect(input);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].as_ref().unwrap(), &Location::new("cat", "a.png"));
    }

    #[test]
    fn test_hash_in_url_starts_comment() {
        let parsed = collect("pic = http://example.test/a.png?x=1#frag\n");
        assert_eq!(
            parsed[0].as_ref().unwrap(),
            &Location::new("pic", "http://example.test/a.png?x=1")
        );
    }

    #[test]
    fn test_split_on_first_equals_only() {
        let parsed = collect("q = http://example.test/img.png?w=10&h=20\n");
        assert_eq!(
            parsed[0].as_ref().unwrap(),
            &Location::new("q", "http://example.test/img.png?w=10&h=20")
        );
    }

    #[test]
    fn test_malformed_line_does_not_stop_iteration() {
        let parsed = collect("first = a.png\nno separator here\nsecond = b.png\n");
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_ok());
        match &parsed[1] {
            Err(LocationError::Malformed { line, content }) => {
                assert_eq!(*line, 2);
                assert_eq!(content, "no separator here");
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
        assert_eq!(parsed[2].as_ref().unwrap().name, "second");
    }

    #[test]
    fn test_empty_fields_are_malformed() {
        assert!(matches!(
            Location::parse_line(" = a.png", 7),
            Some(Err(LocationError::Malformed { line: 7, .. }))
        ));
        assert!(matches!(
            Location::parse_line("name =   ", 1),
            Some(Err(LocationError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_line_numbers_count_skipped_lines() {
        let parsed = collect("# c\n\nbad\n");
        assert!(matches!(
            parsed[0],
            Err(LocationError::Malformed { line: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_ends_iteration() {
        let bytes: Vec<u8> = b"a = a.png\n\xff\xfe = b.png\nc = c.png\n".to_vec();
        let parsed: Vec<_> = Locations::new(Cursor::new(bytes)).collect();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].is_ok());
        assert!(matches!(parsed[1], Err(LocationError::Io(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = Locations::open(Some(Path::new("/nonexistent/locations.txt")));
        assert!(matches!(result, Err(LocationError::Open { .. })));
    }

    #[test]
    fn test_display_matches_success_log_format() {
        let location = Location::new("cat", "http://example.test/cat.png");
        assert_eq!(location.to_string(), "cat = http://example.test/cat.png");
    }
}
