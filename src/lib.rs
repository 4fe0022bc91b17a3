//! release-builder - cut releases from a Keep-a-Changelog file inside CI
//!
//! The pipeline reads the changelog, finds the newest entry that has no git tag
//! yet, tags HEAD, builds zip and tar.gz archives, writes a checksum manifest
//! (plus an optional Meson wrap file) and pushes the tag upstream.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod changelog;
pub mod config;
pub mod core;
pub mod error;
pub mod output;

pub use config::ProjectConfig;
pub use crate::core::services::Project;
pub use error::ReleaseError;
