//! Transmitter UART receive task
//!
//! Decodes temperature frames and publishes accepted readings.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use thermolog_core::{Admission, Intake, TemperatureRegister};

use crate::channels::INTAKE_STATS;
use crate::clock;
use crate::config::MONITOR_CONFIG;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// RX task - feeds received bytes to the intake
#[embassy_executor::task]
pub async fn rx_task(mut rx: BufferedUartRx, register: &'static TemperatureRegister) {
    info!("RX task started (framing: {:?})", MONITOR_CONFIG.framing);

    let mut intake = Intake::from_config(&MONITOR_CONFIG, register);
    let mut buf = [0u8; RX_BUF_SIZE];
    let mut decode_errors = 0u32;

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                // Bytes of one read share the tick at which it completed
                let now = clock::now_ms();
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match intake.on_byte(byte, now) {
                        Some(Admission::Accepted(reading)) => {
                            trace!("Temperature raw={} seq={}", reading.sample.raw, reading.seq);
                        }
                        Some(Admission::OutOfRange(sample)) => {
                            warn!("Temperature out of range, dropped: raw={}", sample.raw);
                        }
                        None => {}
                    }
                }

                let stats = intake.stats();
                if stats.decode.errors() != decode_errors {
                    decode_errors = stats.decode.errors();
                    warn!(
                        "Frames rejected: {} checksum, {} length, {} lead mismatch",
                        stats.decode.checksum_errors,
                        stats.decode.length_errors,
                        stats.decode.lead_mismatches
                    );
                }
                INTAKE_STATS.signal(stats);
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                intake.on_transport_error();
                INTAKE_STATS.signal(intake.stats());
            }
        }
    }
}
