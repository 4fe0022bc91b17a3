//! Keep-a-Changelog reader
//!
//! Turns changelog text into a [`Changelog`]: a title plus releases in file
//! order (newest first by convention).
//!
//! # Examples
//!
//! ```
//! use release_builder::changelog;
//!
//! let text = "# Changelog\n\n## [Unreleased]\n\n## [v1.2.3] - 2021-06-01\n- example\n";
//! let parsed = changelog::parse(text).unwrap();
//! assert_eq!(parsed.releases.len(), 2);
//! assert_eq!(parsed.releases[1].version, "v1.2.3");
//! assert_eq!(parsed.releases[1].date.as_deref(), Some("2021-06-01"));
//! ```

use std::io::Read;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::models::{Changelog, Release};

/// `## [v1.2.3] - 2021-06-01` or `## v1.2.3`
static RELEASE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+(?:\[(?P<bracketed>[^\]]*)\]|(?P<bare>\S+))(?:\s+-\s+(?P<date>\S+))?")
        .expect("release heading regex is valid")
});

/// `[v1.2.3]: https://example.com/compare/v1.2.2...v1.2.3`
static LINK_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[[^\]]+\]:\s*\S").expect("link reference regex is valid"));

/// Errors that can occur when parsing a changelog
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file does not start with a `# Title` heading
    #[error("missing '# ' title heading")]
    MissingTitle,

    /// A release heading has no version
    #[error("release heading on line {line} has no version")]
    EmptyVersion {
        /// 1-based line number
        line: usize,
    },

    /// The reader failed or the text is not UTF-8
    #[error("unable to read changelog")]
    Io(#[from] std::io::Error),
}

/// Parse changelog text
pub fn parse(text: &str) -> Result<Changelog, ParseError> {
    let mut lines = text.lines().enumerate().skip_while(|(_, l)| l.trim().is_empty());

    let title = lines
        .next()
        .and_then(|(_, l)| l.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .ok_or(ParseError::MissingTitle)?;

    let mut releases = Vec::new();
    let mut current: Option<Release> = None;

    for (idx, line) in lines {
        if line.starts_with("## ") || line == "##" {
            if let Some(done) = current.take() {
                releases.push(finish(done));
            }
            current = Some(parse_heading(line, idx + 1)?);
            continue;
        }

        // Preamble text before the first release is ignored
        if let Some(release) = current.as_mut() {
            if !LINK_REFERENCE.is_match(line) {
                release.body.push(line.to_string());
            }
        }
    }

    if let Some(done) = current {
        releases.push(finish(done));
    }

    Ok(Changelog { title, releases })
}

/// Read and parse a changelog from any reader
pub fn from_reader(mut reader: impl Read) -> Result<Changelog, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text)
}

fn parse_heading(line: &str, line_no: usize) -> Result<Release, ParseError> {
    let caps = RELEASE_HEADING
        .captures(line)
        .ok_or(ParseError::EmptyVersion { line: line_no })?;

    let version = caps
        .name("bracketed")
        .or_else(|| caps.name("bare"))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .ok_or(ParseError::EmptyVersion { line: line_no })?;

    Ok(Release {
        version: version.to_string(),
        date: caps.name("date").map(|m| m.as_str().to_string()),
        body: vec![line.to_string()],
    })
}

fn finish(mut release: Release) -> Release {
    while release.body.len() > 1 && release.body.last().is_some_and(|l| l.trim().is_empty()) {
        release.body.pop();
    }
    release
}
