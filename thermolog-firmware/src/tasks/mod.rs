//! Embassy async tasks
//!
//! The RX task is the only writer of the temperature register; the monitor
//! task is its only reader. Report lines reach the UART through the TX task.

pub mod monitor;
pub mod rx;
pub mod tx;

pub use monitor::monitor_task;
pub use rx::rx_task;
pub use tx::tx_task;
