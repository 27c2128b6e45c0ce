//! Decoded temperature readings

use crate::frame::{Frame, CMD_TEMPERATURE_UPLOAD};

/// One temperature reading as sent by the transmitter
///
/// The raw value is fixed-point with 0.1°C resolution: 234 is 23.4°C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureSample {
    pub raw: u16,
}

impl TemperatureSample {
    pub const fn new(raw: u16) -> Self {
        Self { raw }
    }

    /// Extract a sample from a temperature upload frame
    ///
    /// Returns `None` for other commands or an upload too short to carry a value.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        if frame.command != CMD_TEMPERATURE_UPLOAD {
            return None;
        }
        match frame.payload.get(..2) {
            Some(&[lsb, msb]) => Some(Self::new(u16::from_le_bytes([lsb, msb]))),
            _ => None,
        }
    }

    /// Physical value in degrees Celsius
    pub fn celsius(&self) -> f32 {
        self.raw as f32 / 10.0
    }

    /// Check the reading against a closed range given in tenths of a degree
    pub fn within(&self, min_x10: u16, max_x10: u16) -> bool {
        (min_x10..=max_x10).contains(&self.raw)
    }
}
