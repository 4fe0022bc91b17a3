//! Port traits (interfaces) for external collaborators
//!
//! The pipeline depends only on these traits. Implementations that do real
//! I/O live in the `adapters` module; tests substitute in-memory doubles.

mod output;
mod packaging;
mod reporter;
mod vcs;

pub use output::OutputSink;
pub use packaging::{NotInstalled, PackagingTool, ToolError};
pub use reporter::{Reporter, Silent};
pub use vcs::{ReleaseVcs, VcsError};
