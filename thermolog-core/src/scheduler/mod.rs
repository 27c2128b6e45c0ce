//! Monitor scheduler
//!
//! Drives analog sampling, report emission and the heartbeat from a single
//! cooperative poll, using accumulated deadlines on a wrapping millisecond
//! tick.

pub mod deadline;
pub mod monitor;

pub use deadline::{elapsed, reached, Deadline};
pub use monitor::{Monitor, PollEvents, READY_BANNER, START_LINE, STOP_LINE};
