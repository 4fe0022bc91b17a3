//! Progress reporting port

/// Sink for human-readable progress messages
pub trait Reporter {
    /// Report one step of progress
    fn info(&self, message: &str);
}

/// Reporter that discards everything (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Reporter for Silent {
    fn info(&self, _message: &str) {}
}
