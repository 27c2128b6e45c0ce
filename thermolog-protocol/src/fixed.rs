//! Fixed-offset framing
//!
//! The first transmitter firmware sends a fixed six byte frame:
//!
//! ```text
//! HEADER, LEAD[0..n], TEMP_LSB, TEMP_MSB
//! ```
//!
//! There is no length field and no checksum. Lead bytes are either skipped
//! or required to hold a fixed value; a required byte that does not match
//! sends the decoder back to header search.

use crate::frame::{DecodeStats, CMD_TEMPERATURE_UPLOAD, FRAME_HEADER};
use crate::sample::TemperatureSample;

/// Byte layout of a fixed-offset frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedLayout {
    /// Synchronization byte
    pub header: u8,
    /// Bytes between header and temperature: `None` skips, `Some(v)` must equal `v`
    pub lead: &'static [Option<u8>],
}

impl FixedLayout {
    /// `FC ?? ?? ?? LSB MSB`
    pub const SKIP_THREE: Self = Self {
        header: FRAME_HEADER,
        lead: &[None, None, None],
    };

    /// `FC 0A 00 01 LSB MSB`, the prefix of a ten byte temperature upload
    pub const UPLOAD_PREFIX: Self = Self {
        header: FRAME_HEADER,
        lead: &[Some(0x0A), Some(0x00), Some(CMD_TEMPERATURE_UPLOAD)],
    };

    fn after_lead(&self, index: usize) -> FixedState {
        if index < self.lead.len() {
            FixedState::Lead(index)
        } else {
            FixedState::ReadLow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixedState {
    WaitHeader,
    Lead(usize),
    ReadLow,
    ReadHigh(u8),
}

/// Decoder for [`FixedLayout`] frames
#[derive(Debug, Clone)]
pub struct FixedOffsetDecoder {
    layout: FixedLayout,
    state: FixedState,
    stats: DecodeStats,
}

impl FixedOffsetDecoder {
    pub const fn new(layout: FixedLayout) -> Self {
        Self {
            layout,
            state: FixedState::WaitHeader,
            stats: DecodeStats::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = FixedState::WaitHeader;
    }

    /// Frames abandoned on a lead byte mismatch
    pub fn mismatches(&self) -> u32 {
        self.stats.lead_mismatches
    }

    /// Counters since construction
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    pub fn layout(&self) -> &FixedLayout {
        &self.layout
    }

    pub fn consume(&mut self, byte: u8) -> Option<TemperatureSample> {
        match self.state {
            FixedState::WaitHeader => {
                if byte == self.layout.header {
                    self.state = self.layout.after_lead(0);
                }
                None
            }
            FixedState::Lead(index) => {
                match self.layout.lead[index] {
                    Some(expected) if expected != byte => {
                        self.stats.lead_mismatches = self.stats.lead_mismatches.wrapping_add(1);
                        // The offending byte may itself start the next frame
                        self.state = if byte == self.layout.header {
                            self.layout.after_lead(0)
                        } else {
                            FixedState::WaitHeader
                        };
                    }
                    _ => self.state = self.layout.after_lead(index + 1),
                }
                None
            }
            FixedState::ReadLow => {
                self.state = FixedState::ReadHigh(byte);
                None
            }
            FixedState::ReadHigh(lsb) => {
                self.state = FixedState::WaitHeader;
                self.stats.frames = self.stats.frames.wrapping_add(1);
                Some(TemperatureSample::new(u16::from_le_bytes([lsb, byte])))
            }
        }
    }
}
