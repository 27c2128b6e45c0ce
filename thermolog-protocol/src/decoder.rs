//! Framing selection
//!
//! A deployment talks to exactly one transmitter variant. [`Framing`] names
//! it, [`Decoder`] holds the matching state machine, and both decoders are
//! usable through [`ByteDecoder`].

use crate::fixed::{FixedLayout, FixedOffsetDecoder};
use crate::frame::{DecodeStats, FrameDecoder};
use crate::sample::TemperatureSample;

/// Byte-at-a-time temperature decoder
///
/// `consume` must do bounded work and never block: it may be called from a
/// receive interrupt.
pub trait ByteDecoder {
    /// Consume one received byte, returning a sample when a frame completes
    fn consume(&mut self, byte: u8) -> Option<TemperatureSample>;

    /// Abandon any partial frame
    fn reset(&mut self);

    /// Frame and error counters since construction
    fn stats(&self) -> DecodeStats;
}

impl ByteDecoder for FrameDecoder {
    fn consume(&mut self, byte: u8) -> Option<TemperatureSample> {
        FrameDecoder::consume(self, byte)
    }

    fn reset(&mut self) {
        FrameDecoder::reset(self)
    }

    fn stats(&self) -> DecodeStats {
        FrameDecoder::stats(self)
    }
}

impl ByteDecoder for FixedOffsetDecoder {
    fn consume(&mut self, byte: u8) -> Option<TemperatureSample> {
        FixedOffsetDecoder::consume(self, byte)
    }

    fn reset(&mut self) {
        FixedOffsetDecoder::reset(self)
    }

    fn stats(&self) -> DecodeStats {
        FixedOffsetDecoder::stats(self)
    }
}

/// Wire framing used by the transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    /// Variable length with XOR checksum
    #[default]
    Checksummed,
    /// Fixed offsets, no checksum
    FixedOffset(FixedLayout),
}

/// Decoder for whichever framing was configured
#[derive(Debug, Clone)]
pub enum Decoder {
    Checksummed(FrameDecoder),
    FixedOffset(FixedOffsetDecoder),
}

impl Decoder {
    pub const fn new(framing: Framing) -> Self {
        match framing {
            Framing::Checksummed => Decoder::Checksummed(FrameDecoder::new()),
            Framing::FixedOffset(layout) => Decoder::FixedOffset(FixedOffsetDecoder::new(layout)),
        }
    }

    pub fn framing(&self) -> Framing {
        match self {
            Decoder::Checksummed(_) => Framing::Checksummed,
            Decoder::FixedOffset(d) => Framing::FixedOffset(*d.layout()),
        }
    }
}

impl ByteDecoder for Decoder {
    fn consume(&mut self, byte: u8) -> Option<TemperatureSample> {
        match self {
            Decoder::Checksummed(d) => d.consume(byte),
            Decoder::FixedOffset(d) => d.consume(byte),
        }
    }

    fn reset(&mut self) {
        match self {
            Decoder::Checksummed(d) => d.reset(),
            Decoder::FixedOffset(d) => d.reset(),
        }
    }

    fn stats(&self) -> DecodeStats {
        match self {
            Decoder::Checksummed(d) => d.stats(),
            Decoder::FixedOffset(d) => d.stats(),
        }
    }
}
