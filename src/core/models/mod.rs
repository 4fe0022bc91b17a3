//! Domain models for a release run
//!
//! - Release / Changelog: what the changelog says was shipped
//! - `NextRelease`: whether a release is due
//! - `ArtifactSet`: files produced by a release

mod artifact;
mod release;

pub use artifact::{ArchiveFormat, ArtifactSet, release_slug};
pub use release::{Changelog, NextRelease, Release, UNRELEASED};
