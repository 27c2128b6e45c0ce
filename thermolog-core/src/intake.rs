//! Receive-side intake
//!
//! Owns the byte decoder and is the sole writer of the
//! [`TemperatureRegister`]. Runs wherever received bytes are delivered,
//! which may be an interrupt handler or a dedicated receive task; it never
//! blocks and does bounded work per byte.

use thermolog_protocol::{ByteDecoder, DecodeStats, Decoder, TemperatureSample};

use crate::config::{MonitorConfig, TemperatureRange};
use crate::register::{Reading, TemperatureRegister};

/// What happened to a decoded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Admission {
    /// Sample published to the register
    Accepted(Reading),
    /// Sample outside the configured range; register unchanged
    OutOfRange(TemperatureSample),
}

/// Intake counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeStats {
    pub accepted: u32,
    pub out_of_range: u32,
    pub transport_errors: u32,
    /// Decoder counters, including frames dropped before range checking
    pub decode: DecodeStats,
}

/// Decoder plus range filter in front of the shared register
pub struct Intake<'r, D = Decoder> {
    decoder: D,
    register: &'r TemperatureRegister,
    range: TemperatureRange,
    stats: IntakeStats,
}

impl<'r> Intake<'r, Decoder> {
    /// Intake using the configured framing and range
    pub fn from_config(config: &MonitorConfig, register: &'r TemperatureRegister) -> Self {
        Self::new(Decoder::new(config.framing), register, config.range)
    }
}

impl<'r, D: ByteDecoder> Intake<'r, D> {
    pub fn new(decoder: D, register: &'r TemperatureRegister, range: TemperatureRange) -> Self {
        Self {
            decoder,
            register,
            range,
            stats: IntakeStats::default(),
        }
    }

    /// Handle one received byte
    ///
    /// `now` is the tick at which the byte arrived; it becomes the reading's
    /// arrival time and may anchor the report time base.
    pub fn on_byte(&mut self, byte: u8, now: u32) -> Option<Admission> {
        let sample = self.decoder.consume(byte)?;

        if !self.range.accepts(&sample) {
            self.stats.out_of_range = self.stats.out_of_range.wrapping_add(1);
            return Some(Admission::OutOfRange(sample));
        }

        self.stats.accepted = self.stats.accepted.wrapping_add(1);
        Some(Admission::Accepted(self.register.publish(sample, now)))
    }

    /// Handle a receive fault (overrun, noise, framing)
    ///
    /// Bytes were lost, so any partial frame is abandoned.
    pub fn on_transport_error(&mut self) {
        self.decoder.reset();
        self.stats.transport_errors = self.stats.transport_errors.wrapping_add(1);
    }

    pub fn stats(&self) -> IntakeStats {
        IntakeStats {
            decode: self.decoder.stats(),
            ..self.stats
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermolog_protocol::{FixedLayout, Frame, FrameDecoder, Framing};

    fn feed(intake: &mut Intake<'_, impl ByteDecoder>, bytes: &[u8], now: u32) -> Vec<Admission> {
        bytes.iter().filter_map(|&b| intake.on_byte(b, now)).collect()
    }

    #[test]
    fn test_accepted_sample_is_published() {
        let register = TemperatureRegister::new();
        let mut intake = Intake::new(FrameDecoder::new(), &register, TemperatureRange::DEFAULT);

        let bytes = Frame::temperature(234).encode_to_vec().unwrap();
        let admissions = feed(&mut intake, &bytes, 1000);

        let reading = register.latest().unwrap();
        assert_eq!(admissions, [Admission::Accepted(reading)]);
        assert_eq!(reading.sample.raw, 234);
        assert_eq!(reading.arrived_at, 1000);
        assert_eq!(intake.stats().accepted, 1);
    }

    #[test]
    fn test_out_of_range_leaves_register_untouched() {
        let register = TemperatureRegister::new();
        let mut intake = Intake::new(FrameDecoder::new(), &register, TemperatureRange::DEFAULT);

        let hot = Frame::temperature(1050).encode_to_vec().unwrap();
        assert_eq!(
            feed(&mut intake, &hot, 10),
            [Admission::OutOfRange(TemperatureSample::new(1050))]
        );
        assert_eq!(register.latest(), None);

        let ok = Frame::temperature(500).encode_to_vec().unwrap();
        feed(&mut intake, &ok, 20);
        let before = register.latest();

        feed(&mut intake, &hot, 30);
        assert_eq!(register.latest(), before);
        assert_eq!(intake.stats().out_of_range, 2);
    }

    #[test]
    fn test_out_of_range_keeps_decoder_in_sync() {
        let register = TemperatureRegister::new();
        let mut intake = Intake::new(FrameDecoder::new(), &register, TemperatureRange::DEFAULT);

        let mut stream = std::vec::Vec::new();
        stream.extend_from_slice(&Frame::temperature(2000).encode_to_vec().unwrap());
        stream.extend_from_slice(&Frame::temperature(215).encode_to_vec().unwrap());

        let admissions = feed(&mut intake, &stream, 0);
        assert_eq!(admissions.len(), 2);
        assert_eq!(register.latest().unwrap().sample.raw, 215);
        assert_eq!(intake.decoder().stats().frames, 2);
    }

    #[test]
    fn test_transport_error_drops_partial_frame() {
        let register = TemperatureRegister::new();
        let mut intake = Intake::new(FrameDecoder::new(), &register, TemperatureRange::DEFAULT);

        let bytes = Frame::temperature(300).encode_to_vec().unwrap();
        feed(&mut intake, &bytes[..3], 0);
        intake.on_transport_error();
        // Tail of the interrupted frame is just noise now
        assert!(feed(&mut intake, &bytes[3..], 0).is_empty());
        assert_eq!(intake.stats().transport_errors, 1);
        assert_eq!(intake.stats().decode.frames, 0);

        feed(&mut intake, &bytes, 5);
        assert_eq!(register.latest().unwrap().sample.raw, 300);
    }

    #[test]
    fn test_stats_include_decode_errors() {
        let register = TemperatureRegister::new();
        let mut intake = Intake::new(FrameDecoder::new(), &register, TemperatureRange::DEFAULT);

        let mut bad = Frame::temperature(300).encode_to_vec().unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        feed(&mut intake, &bad, 0);
        feed(&mut intake, &Frame::temperature(1050).encode_to_vec().unwrap(), 0);

        let stats = intake.stats();
        assert_eq!(stats.decode.checksum_errors, 1);
        assert_eq!(stats.decode.frames, 1);
        assert_eq!(stats.out_of_range, 1);
        assert_eq!(stats.accepted, 0);
    }

    #[test]
    fn test_from_config_fixed_framing() {
        let register = TemperatureRegister::new();
        let config = MonitorConfig {
            framing: Framing::FixedOffset(FixedLayout::SKIP_THREE),
            ..MonitorConfig::DEFAULT
        };
        let mut intake = Intake::from_config(&config, &register);
        feed(&mut intake, &[0xFC, 0, 0, 0, 0xEA, 0x00], 42);
        assert_eq!(register.latest().unwrap().sample.raw, 234);
        assert_eq!(register.latest().unwrap().arrived_at, 42);
    }
}
