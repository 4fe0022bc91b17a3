//! GitHub Actions outputs
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` when the runner
//! provides one. Older runners read `::set-output` workflow commands from
//! stdout instead.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::core::ports::OutputSink;

/// Environment variable naming the runner's output file
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Output sink for GitHub Actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutputs {
    /// Append `name=value` lines to this file
    File(PathBuf),
    /// Print `::set-output` commands to stdout
    Stdout,
}

impl ActionOutputs {
    /// Pick the file from `GITHUB_OUTPUT`, falling back to stdout
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var_os(GITHUB_OUTPUT)
            .filter(|v| !v.is_empty())
            .map_or(Self::Stdout, |path| Self::File(PathBuf::from(path)))
    }
}

impl OutputSink for ActionOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        match self {
            Self::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{name}={value}")
            },
            Self::Stdout => {
                println!("::set-output name={name}::{value}");
                Ok(())
            },
        }
    }
}
