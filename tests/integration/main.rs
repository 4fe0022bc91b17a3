//! Integration tests for release-builder
//!
//! These tests run against real git repositories in temp directories:
//! the git adapter directly, then the binary end to end with a bare
//! repository standing in for the upstream remote.

// Common test utilities
#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;
