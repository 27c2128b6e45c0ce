//! Inter-task communication
//!
//! Temperature readings go through the lock-free [`TemperatureRegister`];
//! report lines and diagnostics use embassy-sync primitives.
//!
//! [`TemperatureRegister`]: thermolog_core::TemperatureRegister

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use thermolog_core::intake::IntakeStats;
use thermolog_core::report::Line;

/// Lines queued ahead of the UART writer
const REPORT_CHANNEL_SIZE: usize = 8;

/// Outgoing text lines (monitor task -> TX task)
pub static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, Line, REPORT_CHANNEL_SIZE> =
    Channel::new();

/// Latest intake counters (RX task -> monitor task)
pub static INTAKE_STATS: Signal<CriticalSectionRawMutex, IntakeStats> = Signal::new();
