//! Release services
//!
//! - [`pipeline`] - The examine → release → output pipeline
//! - [`checksum`] - SHA-256 digests and the checksum manifest
//! - [`meson`] - Meson wrap files and version validation

pub mod checksum;
pub mod meson;
pub mod pipeline;

pub use pipeline::{Project, Stage, next_release};
