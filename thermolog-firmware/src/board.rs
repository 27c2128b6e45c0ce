//! RP2040 board I/O for the monitor

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{Input, Output};

use thermolog_core::report::owned_line;
use thermolog_core::traits::{
    AnalogError, AnalogInput, ControlInput, ReportSink, SinkError, StatusIndicator,
};

use crate::channels::REPORT_CHANNEL;

/// Peripherals polled by the monitor task
pub struct Board {
    pub adc: Adc<'static, Blocking>,
    pub channel: Channel<'static>,
    /// Active low, pulled up
    pub button: Input<'static>,
    pub led: Output<'static>,
}

impl AnalogInput for Board {
    fn read_raw(&mut self) -> Result<u16, AnalogError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AnalogError::Conversion)
    }
}

impl ReportSink for Board {
    /// Queue the line for the TX task; a full queue drops it
    fn send_line(&mut self, line: &str) -> Result<(), SinkError> {
        REPORT_CHANNEL
            .try_send(owned_line(line)?)
            .map_err(|_| SinkError::Busy)
    }
}

impl StatusIndicator for Board {
    fn toggle(&mut self) {
        self.led.toggle();
    }
}

impl ControlInput for Board {
    fn is_pressed(&mut self) -> bool {
        self.button.is_low()
    }
}
