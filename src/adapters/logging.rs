//! Reporter backed by the `log` crate

use crate::core::ports::Reporter;

/// Forwards progress messages to `log::info!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }
}
