//! Packaging tool port
//!
//! Lets the pipeline ask the build system which version it declares.

use std::path::Path;

use thiserror::Error;

/// Failures reported by a [`PackagingTool`]
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool ran and exited unsuccessfully
    #[error("{command} failed: {stderr}")]
    Failed {
        /// Command line that was run
        command: String,
        /// Captured diagnostic output
        stderr: String,
    },

    /// The tool's output could not be understood
    #[error("unexpected output from {command}: {message}")]
    BadOutput {
        /// Command line that was run
        command: String,
        /// What was wrong with the output
        message: String,
    },

    /// Any other I/O failure while driving the tool
    #[error("failed to run {command}")]
    Io {
        /// Command line that was attempted
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Build system introspection
pub trait PackagingTool {
    /// Version declared by the project rooted at `source_dir`
    ///
    /// Returns `Ok(None)` when the tool is not installed, so callers can skip
    /// the check instead of failing the run.
    fn declared_version(&self, source_dir: &Path) -> Result<Option<String>, ToolError>;
}

/// Packaging tool that is never installed
///
/// The pipeline's default: the Meson version check is always skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotInstalled;

impl PackagingTool for NotInstalled {
    fn declared_version(&self, _source_dir: &Path) -> Result<Option<String>, ToolError> {
        Ok(None)
    }
}
