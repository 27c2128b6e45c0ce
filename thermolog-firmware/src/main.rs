//! Thermolog - Serial Temperature Monitor Firmware
//!
//! Main firmware binary for RP2040 boards. Receives temperature frames on
//! UART0, samples ADC0 and prints one report line per period back on UART0.
//!
//! Pinout:
//! - GPIO0/GPIO1: UART0 TX/RX (115200 8N1)
//! - GPIO26: analog input (ADC0)
//! - GPIO15: start/stop button to ground
//! - GPIO25: heartbeat LED

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermolog_core::TemperatureRegister;

use crate::board::Board;
use crate::config::{MONITOR_CONFIG, WINDOW_LEN};

mod board;
mod channels;
mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Latest accepted temperature; written by the RX task, read by the monitor
static REGISTER: TemperatureRegister = TemperatureRegister::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermolog firmware starting...");

    // build.rs already rejected anything invalid
    unwrap!(MONITOR_CONFIG.validate());
    info!(
        "Config: sample={}ms report={}ms window={} sync={:?}",
        MONITOR_CONFIG.sample_period_ms,
        MONITOR_CONFIG.report_period_ms,
        WINDOW_LEN,
        MONITOR_CONFIG.sync
    );

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // UART0 for frames in and reports out
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart_config = UartConfig::default(); // 115200 baud default
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        tx_buf,
        rx_buf,
        uart_config,
    );
    let (tx, rx) = uart.split();

    let board = Board {
        adc: Adc::new_blocking(p.ADC, AdcConfig::default()),
        channel: Channel::new_pin(p.PIN_26, Pull::None),
        button: Input::new(p.PIN_15, Pull::Up),
        led: Output::new(p.PIN_25, Level::Low),
    };

    spawner.spawn(tasks::tx_task(tx)).unwrap();
    spawner.spawn(tasks::rx_task(rx, &REGISTER)).unwrap();
    spawner.spawn(tasks::monitor_task(board, &REGISTER)).unwrap();

    info!("All tasks spawned, firmware running");
}
