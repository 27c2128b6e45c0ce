//! Configuration types
//!
//! Board-agnostic configuration. The firmware builds its `MonitorConfig`
//! as a constant from `monitor.toml` at compile time.

pub mod types;

pub use types::*;
