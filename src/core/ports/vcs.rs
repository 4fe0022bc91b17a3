//! Version control gateway port
//!
//! The four repository operations a release needs. Implementations are thin
//! bindings over a version control tool.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::models::ArchiveFormat;

/// Failures reported by a [`ReleaseVcs`] implementation
#[derive(Debug, Error)]
pub enum VcsError {
    /// The path is not a usable working copy
    #[error("unable to open the git path: '{}': {message}", path.display())]
    Open {
        /// Path that was opened
        path: PathBuf,
        /// Reason reported by the backend
        message: String,
    },

    /// A repository read or write failed
    #[error("{context}: {message}")]
    Backend {
        /// Operation that failed
        context: String,
        /// Reason reported by the backend
        message: String,
    },

    /// An external command could not be started
    #[error("failed to run {command}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Spawn failure
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully
    #[error("{command} exited with {status}: {stderr}")]
    Command {
        /// Command line that was run
        command: String,
        /// Exit status description
        status: String,
        /// Captured diagnostic output
        stderr: String,
    },

    /// The remote refused a ref update during push
    #[error("remote rejected {refname}: {message}")]
    Rejected {
        /// Ref that was refused
        refname: String,
        /// Reason given by the remote
        message: String,
    },
}

impl VcsError {
    /// Build a backend error from any displayable cause
    pub fn backend(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Backend {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Version control operations consumed by the release pipeline
pub trait ReleaseVcs {
    /// Whether a tag with exactly this name exists
    ///
    /// A missing tag is `Ok(false)`; only genuine repository failures are errors.
    fn tag_exists(&self, tag: &str) -> Result<bool, VcsError>;

    /// Create an annotated tag at HEAD, tagged by HEAD's committer
    fn tag_head(&self, tag: &str, message: &str) -> Result<(), VcsError>;

    /// Write `<out_dir>/<slug>.<ext>` from the tree at `rev`
    ///
    /// Every entry in the archive is prefixed with `<slug>/`.
    fn create_archive(
        &self,
        slug: &str,
        rev: &str,
        format: ArchiveFormat,
        out_dir: &Path,
    ) -> Result<PathBuf, VcsError>;

    /// Push every local `refs/tags/*` to `origin`
    ///
    /// The token is sent as the password of an HTTP basic credential whose
    /// username is ignored by the server.
    fn push_tags(&self, token: &str) -> Result<(), VcsError>;
}
