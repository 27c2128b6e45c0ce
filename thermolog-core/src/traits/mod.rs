//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor logic and the
//! board: one analog channel, a text line sink, a status indicator and a
//! start/stop control.

pub mod analog;
pub mod control;
pub mod output;

pub use analog::{AnalogError, AnalogInput};
pub use control::ControlInput;
pub use output::{ReportSink, SinkError, StatusIndicator};

/// Everything the monitor needs from the board on each poll
pub trait MonitorIo: AnalogInput + ReportSink + StatusIndicator + ControlInput {}

// Blanket implementation
impl<T: AnalogInput + ReportSink + StatusIndicator + ControlInput> MonitorIo for T {}
