//! Common test utilities shared across test types
//!
//! - `git_repo.rs` - Temporary git repository helper and a sample changelog
//! - `mocks.rs` - In-memory port implementations
