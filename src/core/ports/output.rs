//! Named outputs for the invoking automation

/// Receiver for `name=value` outputs
pub trait OutputSink {
    /// Publish one named output
    fn set_output(&mut self, name: &str, value: &str) -> std::io::Result<()>;
}
