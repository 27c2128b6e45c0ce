//! Report and indicator outputs

/// Errors a report sink may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// Transmitter busy or buffer full
    Busy,
    /// Transport fault
    Transport,
}

/// Text line output
///
/// Lines are passed without a terminator; the sink appends its own.
pub trait ReportSink {
    /// Send one line; failures are not retried by the caller
    fn send_line(&mut self, line: &str) -> Result<(), SinkError>;
}

/// Heartbeat indicator (typically an LED)
pub trait StatusIndicator {
    fn toggle(&mut self);
}
