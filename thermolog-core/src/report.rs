//! Report line formatting
//!
//! ```text
//! [0.25s] T:23.4 C, ADC:1820
//! ```
//!
//! All values are rendered from integers, so the text is exact: elapsed time
//! is truncated to hundredths of a second, temperature keeps its native 0.1°C
//! resolution.

use core::fmt::{self, Write};

use heapless::String;
use thermolog_protocol::TemperatureSample;

use crate::traits::SinkError;

/// Longest line `Report` can produce, with room to spare
pub const MAX_LINE_LEN: usize = 64;

/// Owned line, for sinks that queue output instead of writing it in place
pub type Line = String<MAX_LINE_LEN>;

/// Copy `text` into a [`Line`]
///
/// Text longer than [`MAX_LINE_LEN`] is refused, not truncated.
pub fn owned_line(text: &str) -> Result<Line, SinkError> {
    let mut line = Line::new();
    line.push_str(text).map_err(|_| SinkError::Transport)?;
    Ok(line)
}

/// One periodic report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// Scheduled report tick minus the time base
    pub elapsed_ms: u32,
    /// Latest accepted temperature, if any has arrived
    pub temperature: Option<TemperatureSample>,
    /// Median of the analog window, if it holds samples
    pub adc: Option<u16>,
}

impl Report {
    /// Render into a fixed-capacity line
    pub fn to_line(&self) -> Line {
        let mut line = Line::new();
        // Cannot overflow: the longest rendering is under 40 bytes
        let _ = write!(line, "{}", self);
        line
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}.{:02}s] ",
            self.elapsed_ms / 1000,
            (self.elapsed_ms % 1000) / 10
        )?;

        match self.temperature {
            Some(t) => write!(f, "T:{}.{} C", t.raw / 10, t.raw % 10)?,
            None => f.write_str("T:Wait..")?,
        }

        match self.adc {
            Some(adc) => write!(f, ", ADC:{}", adc),
            None => f.write_str(", ADC:--"),
        }
    }
}
