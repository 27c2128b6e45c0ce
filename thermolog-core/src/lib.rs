//! Board-agnostic core logic for the temperature monitor firmware
//!
//! This crate contains everything that does not touch hardware:
//!
//! - Hardware abstraction traits (analog input, report sink, LED, button)
//! - The shared temperature register and the decode-side intake
//! - Median sample window
//! - Start/stop control debounce
//! - Run state machine and the deadline-driven monitor scheduler
//! - Report line formatting
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod filter;
pub mod intake;
pub mod register;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use config::MonitorConfig;
pub use intake::{Admission, Intake};
pub use register::{Reading, TemperatureRegister};
pub use scheduler::{Monitor, PollEvents};
