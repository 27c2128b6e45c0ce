//! Monitor polling task
//!
//! Polls the core monitor on a short fixed ticker. Sampling and reporting
//! cadence comes from the monitor's own deadlines, not from this ticker.

use defmt::*;
use embassy_time::{Duration, Ticker};

use thermolog_core::{Monitor, PollEvents, TemperatureRegister};

use crate::board::Board;
use crate::channels::INTAKE_STATS;
use crate::clock;
use crate::config::{MONITOR_CONFIG, WINDOW_LEN};

/// Poll interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 5;

/// Monitor task - sampling, reporting, heartbeat and start/stop control
#[embassy_executor::task]
pub async fn monitor_task(mut board: Board, register: &'static TemperatureRegister) {
    info!("Monitor task started");

    let mut monitor: Monitor<'static, WINDOW_LEN> =
        Monitor::new(MONITOR_CONFIG, register, clock::now_ms());
    monitor.announce(&mut board);
    info!("Phase: {:?}", monitor.phase());

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        let events = monitor.poll(clock::now_ms(), &mut board);
        log_events(&events);

        if events.heartbeat {
            log_status(monitor.sink_errors());
        }
    }
}

fn log_events(events: &PollEvents) {
    if let Some(phase) = events.toggled {
        info!("Phase -> {:?}", phase);
    }
    if let Some(base) = events.synced_at {
        info!("Time base established at {} ms", base);
    }
    if let Some(Err(e)) = events.sampled {
        warn!("ADC read failed: {:?}", e);
    }
    if let Some(report) = events.report {
        debug!("Report: {:?}", report);
    }
    if events.resynced {
        warn!("Monitor fell behind, deadline restarted");
    }
}

fn log_status(sink_errors: u32) {
    if let Some(stats) = INTAKE_STATS.try_take() {
        info!(
            "Intake: {} frames, {} rejected, {} accepted, {} out of range, {} transport errors",
            stats.decode.frames,
            stats.decode.errors(),
            stats.accepted,
            stats.out_of_range,
            stats.transport_errors
        );
    }
    if sink_errors > 0 {
        warn!("Report sink errors: {}", sink_errors);
    }
}
