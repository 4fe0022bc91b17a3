//! Error taxonomy for a release run
//!
//! Every variant names the operation and the path or identifier that failed.
//! Nothing in the pipeline recovers locally; errors travel unchanged to the
//! binary, which prints the whole source chain and exits non-zero.

use std::path::PathBuf;

use thiserror::Error;

use crate::changelog::ParseError;
use crate::config::ConfigError;
use crate::core::ports::{ToolError, VcsError};

/// Errors produced by the release pipeline
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Missing or malformed input, raised before any side effect
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    /// The working copy could not be opened, queried or mutated
    #[error("unable to {action}")]
    Repository {
        /// What the pipeline was doing
        action: String,
        /// Gateway failure
        #[source]
        source: VcsError,
    },

    /// The changelog was read but is not a valid Keep-a-Changelog file
    #[error("unable to parse the changelog file found here: '{}'", path.display())]
    Changelog {
        /// Changelog location
        path: PathBuf,
        /// Parser failure
        #[source]
        source: ParseError,
    },

    /// Filesystem read, write or create failure
    #[error("unable to {action} '{}'", path.display())]
    Io {
        /// What the pipeline was doing
        action: &'static str,
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A named output could not be published
    #[error("unable to set the '{name}' output")]
    Output {
        /// Output name
        name: String,
        /// Sink failure
        #[source]
        source: std::io::Error,
    },

    /// A path that must be a directory exists as something else
    #[error("path is not a directory: '{}'", .0.display())]
    NotADirectory(PathBuf),

    /// Archive creation failed; the message carries the tool's diagnostics
    #[error("unable to generate the {format} archive")]
    Archive {
        /// Archive format being produced
        format: String,
        /// Gateway failure with stderr text
        #[source]
        source: VcsError,
    },

    /// The packaging tool ran but failed
    #[error("packaging tool failed")]
    Packaging(#[from] ToolError),

    /// Changelog and build system disagree about the version
    #[error(
        "{} declared '{expected}' but meson.build declared '{declared}'. They must match.",
        changelog.display()
    )]
    VersionMismatch {
        /// Changelog file name
        changelog: PathBuf,
        /// Version from the changelog
        expected: String,
        /// Prefixed version reported by the build system
        declared: String,
    },

    /// A pipeline step was called before the step it depends on
    #[error("cannot run {step} before {requires}")]
    StepOrder {
        /// Step that was called
        step: &'static str,
        /// Step that has to run first
        requires: &'static str,
    },
}

impl ReleaseError {
    /// Wrap an I/O failure with the action and path involved
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Wrap a gateway failure with the action involved
    pub fn repository(action: impl Into<String>, source: VcsError) -> Self {
        Self::Repository {
            action: action.into(),
            source,
        }
    }
}

/// Result alias for pipeline operations
pub type Result<T, E = ReleaseError> = std::result::Result<T, E>;
