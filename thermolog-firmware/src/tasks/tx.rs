//! Report UART transmit task
//!
//! Drains queued lines to UART0 so the monitor task never waits on the link.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::REPORT_CHANNEL;

/// Line terminator appended to every queued line
const LINE_END: &[u8] = b"\r\n";

/// TX task - writes report lines
#[embassy_executor::task]
pub async fn tx_task(mut tx: BufferedUartTx) {
    info!("TX task started");

    loop {
        let line = REPORT_CHANNEL.receive().await;

        let result = match tx.write_all(line.as_bytes()).await {
            Ok(()) => tx.write_all(LINE_END).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => trace!("TX: {}", line.as_str()),
            Err(e) => warn!("Failed to send line: {:?}", e),
        }
    }
}
