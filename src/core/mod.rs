//! Core release logic
//!
//! Pure decision logic and orchestration. Everything that touches git, the
//! packaging tool, the log or the CI environment goes through a port trait.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Release, Changelog, `NextRelease`, `ArtifactSet`)
//! - `services/` - The release pipeline, checksums and Meson wrap generation
//! - `ports/` - Trait definitions for external collaborators

pub mod models;
pub mod ports;
pub mod services;
