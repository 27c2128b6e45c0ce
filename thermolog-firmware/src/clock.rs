//! Millisecond tick shared by all tasks

use embassy_time::Instant;

/// Milliseconds since boot, wrapping after ~49.7 days
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
