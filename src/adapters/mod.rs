//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `git/` - Version control gateway over `git2` and the `git` CLI
//! - `meson` - Meson introspection through the `meson` CLI
//! - `logging` - Progress reporting through the `log` crate

pub mod git;
pub mod logging;
pub mod meson;

pub use git::GitRepository;
pub use logging::LogReporter;
pub use meson::MesonCli;
