//! Frame encoding and decoding for the checksummed protocol.
//!
//! Frame format:
//! - HEADER (1 byte): 0xFC synchronization byte
//! - LENGTH (2 bytes): total frame length in bytes, little-endian
//! - COMMAND (1 byte): command identifier
//! - PAYLOAD (0-27 bytes): command-specific data
//! - CHECKSUM (1 byte): XOR of every preceding frame byte, header included

use heapless::{Deque, Vec};

use crate::sample::TemperatureSample;

/// Frame synchronization byte
pub const FRAME_HEADER: u8 = 0xFC;

/// Command id of a temperature upload frame
pub const CMD_TEMPERATURE_UPLOAD: u8 = 0x01;

/// Smallest valid frame (HEADER + LENGTH + COMMAND + CHECKSUM)
pub const MIN_FRAME_LEN: usize = 5;

/// Largest frame the decoder will buffer
pub const MAX_FRAME_LEN: usize = 32;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_LEN - MIN_FRAME_LEN;

/// Frame offset of the command byte
pub(crate) const COMMAND_OFFSET: usize = 3;

/// Frame offset of the first payload byte
pub(crate) const PAYLOAD_OFFSET: usize = 4;

/// Errors that can occur during frame decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Declared length outside `MIN_FRAME_LEN..=MAX_FRAME_LEN`
    LengthOutOfRange,
    /// Checksum mismatch
    InvalidChecksum,
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// XOR checksum over a run of frame bytes
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// A validated or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command identifier
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { command, payload })
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Temperature upload carrying `raw` tenths of a degree
    pub fn temperature(raw: u16) -> Self {
        let mut payload = Vec::new();
        // Capacity is well above two bytes
        let _ = payload.extend_from_slice(&raw.to_le_bytes());
        Self {
            command: CMD_TEMPERATURE_UPLOAD,
            payload,
        }
    }

    /// Total encoded length, header to checksum
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_LEN + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = (frame_len as u16).to_le_bytes();
        buffer[0] = FRAME_HEADER;
        buffer[1] = length[0];
        buffer[2] = length[1];
        buffer[COMMAND_OFFSET] = self.command;
        buffer[PAYLOAD_OFFSET..PAYLOAD_OFFSET + self.payload.len()].copy_from_slice(&self.payload);
        buffer[frame_len - 1] = checksum(&buffer[..frame_len - 1]);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Running decoder counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeStats {
    /// Frames that passed validation
    pub frames: u32,
    /// Frames dropped on checksum mismatch
    pub checksum_errors: u32,
    /// Frames dropped on an impossible length field
    pub length_errors: u32,
    /// Fixed-offset frames dropped on a required lead byte mismatch
    pub lead_mismatches: u32,
}

impl DecodeStats {
    pub const fn new() -> Self {
        Self {
            frames: 0,
            checksum_errors: 0,
            length_errors: 0,
            lead_mismatches: 0,
        }
    }

    /// Frames abandoned for any reason
    pub fn errors(&self) -> u32 {
        self.checksum_errors
            .wrapping_add(self.length_errors)
            .wrapping_add(self.lead_mismatches)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum DecoderState {
    /// Discarding bytes until HEADER
    WaitHeader,
    /// Got HEADER, waiting for the low length byte
    ReadLengthLow,
    /// Waiting for the high length byte
    ReadLengthHigh,
    /// Reading COMMAND and PAYLOAD bytes
    ReadPayload,
    /// Waiting for CHECKSUM
    ReadChecksum,
}

/// State machine for decoding checksummed frames
///
/// A rejected candidate frame may have started on a header byte that was
/// really noise. Its bytes after that first header are scanned again from
/// the next header found among them, so a stray `0xFC` never costs the
/// frame behind it. Bytes waiting to be scanned again are kept in a
/// backlog bounded by one frame length.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecoderState,
    scratch: Vec<u8, MAX_FRAME_LEN>,
    backlog: Deque<u8, MAX_FRAME_LEN>,
    expected_len: usize,
    stats: DecodeStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub const fn new() -> Self {
        Self {
            state: DecoderState::WaitHeader,
            scratch: Vec::new(),
            backlog: Deque::new(),
            expected_len: 0,
            stats: DecodeStats::new(),
        }
    }

    /// Drop any partial frame and go back to header search
    pub fn reset(&mut self) {
        self.state = DecoderState::WaitHeader;
        self.scratch.clear();
        self.backlog.clear();
        self.expected_len = 0;
    }

    /// Counters since construction
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// True while no partial frame is buffered
    pub fn is_idle(&self) -> bool {
        self.state == DecoderState::WaitHeader && self.backlog.is_empty()
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is decoded,
    /// `Ok(None)` when more bytes are needed, or `Err` when a candidate
    /// frame was dropped. At most one frame is returned per call; if
    /// rescanning completes a frame early, the remaining backlog is
    /// processed on the following calls.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        if self.backlog.push_back(byte).is_err() {
            // In-flight bytes never exceed one frame; drop them all if they do
            self.reset();
            let _ = self.backlog.push_back(byte);
        }

        let mut outcome = Ok(None);
        while let Some(next) = self.backlog.pop_front() {
            match self.step(next) {
                Ok(None) => {}
                Ok(Some(frame)) => {
                    self.stats.frames = self.stats.frames.wrapping_add(1);
                    return Ok(Some(frame));
                }
                Err(e) => {
                    match e {
                        FrameError::InvalidChecksum => {
                            self.stats.checksum_errors = self.stats.checksum_errors.wrapping_add(1)
                        }
                        _ => self.stats.length_errors = self.stats.length_errors.wrapping_add(1),
                    }
                    self.rescan();
                    outcome = Err(e);
                }
            }
        }
        outcome
    }

    /// Feed a byte and keep only temperature uploads
    pub fn consume(&mut self, byte: u8) -> Option<TemperatureSample> {
        match self.feed(byte) {
            Ok(Some(frame)) => TemperatureSample::from_frame(&frame),
            _ => None,
        }
    }

    /// Queue the rejected candidate, from its next header on, for another pass
    fn rescan(&mut self) {
        let next_header = self
            .scratch
            .iter()
            .skip(1)
            .position(|&b| b == FRAME_HEADER);

        if let Some(offset) = next_header {
            for &b in self.scratch[offset + 1..].iter().rev() {
                let _ = self.backlog.push_front(b);
            }
        }
        self.scratch.clear();
        self.expected_len = 0;
    }

    /// Advance the state machine by one byte
    ///
    /// On `Err` the state is back to header search and `scratch` still holds
    /// the rejected candidate, current byte included.
    fn step(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecoderState::WaitHeader => {
                if byte == FRAME_HEADER {
                    self.scratch.clear();
                    let _ = self.scratch.push(byte);
                    self.state = DecoderState::ReadLengthLow;
                }
                // Silently ignore non-HEADER bytes while waiting
                Ok(None)
            }
            DecoderState::ReadLengthLow => {
                let _ = self.scratch.push(byte);
                self.state = DecoderState::ReadLengthHigh;
                Ok(None)
            }
            DecoderState::ReadLengthHigh => {
                let _ = self.scratch.push(byte);
                let length = u16::from_le_bytes([self.scratch[1], byte]) as usize;
                if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&length) {
                    self.state = DecoderState::WaitHeader;
                    return Err(FrameError::LengthOutOfRange);
                }
                self.expected_len = length;
                self.state = DecoderState::ReadPayload;
                Ok(None)
            }
            DecoderState::ReadPayload => {
                // Cannot overflow: expected_len <= MAX_FRAME_LEN was checked
                let _ = self.scratch.push(byte);
                if self.scratch.len() == self.expected_len - 1 {
                    self.state = DecoderState::ReadChecksum;
                }
                Ok(None)
            }
            DecoderState::ReadChecksum => {
                let body = self.scratch.len();
                let _ = self.scratch.push(byte);
                self.state = DecoderState::WaitHeader;

                if byte != checksum(&self.scratch[..body]) {
                    return Err(FrameError::InvalidChecksum);
                }

                let frame = Frame::new(
                    self.scratch[COMMAND_OFFSET],
                    &self.scratch[PAYLOAD_OFFSET..body],
                );
                self.scratch.clear();
                self.expected_len = 0;
                frame.map(Some)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encoded(frame: &Frame) -> Vec<u8, MAX_FRAME_LEN> {
        frame.encode_to_vec().unwrap()
    }

    fn feed_all(decoder: &mut FrameDecoder, bytes: &[u8]) -> std::vec::Vec<TemperatureSample> {
        bytes.iter().filter_map(|&b| decoder.consume(b)).collect()
    }

    #[test]
    fn test_frame_encode_temperature() {
        let frame = Frame::temperature(0x014C);
        let mut buffer = [0u8; 16];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 7);
        assert_eq!(&buffer[..6], &[0xFC, 0x07, 0x00, 0x01, 0x4C, 0x01]);
        assert_eq!(buffer[6], 0xFC ^ 0x07 ^ 0x01 ^ 0x4C ^ 0x01);
    }

    #[test]
    fn test_frame_encode_buffer_too_small() {
        let frame = Frame::temperature(10);
        let mut buffer = [0u8; 6];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Frame::new(0x01, &large_payload),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_decode_transmitter_frame() {
        // Ten byte upload as captured from the transmitter: FC 0A 00 01 LSB MSB + 3 spare + XOR
        let mut bytes = [0xFC, 0x0A, 0x00, 0x01, 0xEA, 0x00, 0x11, 0x22, 0x33, 0x00];
        bytes[9] = checksum(&bytes[..9]);

        let mut decoder = FrameDecoder::new();
        let samples = feed_all(&mut decoder, &bytes);

        assert_eq!(samples, [TemperatureSample::new(234)]);
        assert!(decoder.is_idle());
        assert_eq!(decoder.stats().frames, 1);
    }

    #[test]
    fn test_feed_returns_non_temperature_frames() {
        let frame = Frame::empty(0x05);
        let bytes = encoded(&frame);

        let mut decoder = FrameDecoder::new();
        let mut out = None;
        for &b in bytes.iter() {
            if let Some(f) = decoder.feed(b).unwrap() {
                out = Some(f);
            }
        }
        assert_eq!(out, Some(frame));

        // consume drops it
        let mut decoder = FrameDecoder::new();
        assert!(feed_all(&mut decoder, &bytes).is_empty());
        assert_eq!(decoder.stats().frames, 1);
    }

    #[test]
    fn test_invalid_checksum_then_recovery() {
        let mut bad = encoded(&Frame::temperature(250));
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        let good = encoded(&Frame::temperature(260));

        let mut decoder = FrameDecoder::new();
        let mut result = Ok(None);
        for &b in bad.iter() {
            result = decoder.feed(b);
        }
        assert_eq!(result, Err(FrameError::InvalidChecksum));
        assert!(decoder.is_idle());

        assert_eq!(feed_all(&mut decoder, &good), [TemperatureSample::new(260)]);
        assert_eq!(decoder.stats().checksum_errors, 1);
    }

    #[test]
    fn test_length_out_of_range_resyncs() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(0xFC), Ok(None));
        assert_eq!(decoder.feed(0xFF), Ok(None));
        assert_eq!(decoder.feed(0xFF), Err(FrameError::LengthOutOfRange));
        assert!(decoder.is_idle());

        assert_eq!(decoder.feed(0xFC), Ok(None));
        assert_eq!(decoder.feed(0x04), Ok(None));
        assert_eq!(decoder.feed(0x00), Err(FrameError::LengthOutOfRange));
        assert_eq!(decoder.stats().length_errors, 2);

        let good = encoded(&Frame::temperature(1));
        assert_eq!(feed_all(&mut decoder, &good), [TemperatureSample::new(1)]);
    }

    #[test]
    fn test_resync_after_garbage() {
        let mut data = std::vec::Vec::from([0x00, 0xFF, 0x12, 0x34]);
        data.extend_from_slice(&encoded(&Frame::temperature(0x0123)));

        let mut decoder = FrameDecoder::new();
        assert_eq!(feed_all(&mut decoder, &data), [TemperatureSample::new(0x0123)]);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let bytes = encoded(&Frame::temperature(77));
        let mut decoder = FrameDecoder::new();
        for &b in &bytes[..4] {
            decoder.consume(b);
        }
        assert!(!decoder.is_idle());
        decoder.reset();
        assert!(decoder.is_idle());
        assert_eq!(feed_all(&mut decoder, &bytes), [TemperatureSample::new(77)]);
    }

    #[test]
    fn test_stray_header_before_frame() {
        let mut stream = std::vec::Vec::new();
        stream.extend_from_slice(&encoded(&Frame::temperature(234)));
        stream.push(FRAME_HEADER);
        stream.extend_from_slice(&encoded(&Frame::temperature(240)));

        let mut decoder = FrameDecoder::new();
        assert_eq!(
            feed_all(&mut decoder, &stream),
            [TemperatureSample::new(234), TemperatureSample::new(240)]
        );
        assert_eq!(decoder.stats().frames, 2);
        assert_eq!(decoder.stats().length_errors, 1);
        assert!(decoder.is_idle());
    }

    #[test]
    fn test_frame_inside_rejected_candidate() {
        // Bogus 12 byte candidate wrapping a real upload, bad checksum
        let inner = encoded(&Frame::temperature(234));
        let mut stream = std::vec::Vec::from([FRAME_HEADER, 0x0C, 0x00, 0x09]);
        stream.extend_from_slice(&inner);
        stream.push(0x00);
        stream.extend_from_slice(&encoded(&Frame::temperature(235)));

        let mut decoder = FrameDecoder::new();
        assert_eq!(
            feed_all(&mut decoder, &stream),
            [TemperatureSample::new(234), TemperatureSample::new(235)]
        );
        assert_eq!(decoder.stats().checksum_errors, 1);
        assert!(decoder.is_idle());
    }

    #[test]
    fn test_rescan_keeps_frames_in_order() {
        // A false header whose length swallows two real frames
        let mut stream = std::vec::Vec::from([FRAME_HEADER, 0x20, 0x00]);
        stream.extend_from_slice(&encoded(&Frame::temperature(101)));
        stream.extend_from_slice(&encoded(&Frame::temperature(102)));
        stream.extend_from_slice(&[0x00; MAX_FRAME_LEN]);

        let mut decoder = FrameDecoder::new();
        assert_eq!(
            feed_all(&mut decoder, &stream),
            [TemperatureSample::new(101), TemperatureSample::new(102)]
        );
        assert!(decoder.is_idle());
    }

    fn noise() -> impl Strategy<Value = std::vec::Vec<u8>> {
        proptest::collection::vec(any::<u8>(), 0..64)
    }

    fn without_header() -> impl Strategy<Value = u16> {
        any::<u16>().prop_filter("header byte in value", |raw| {
            !raw.to_le_bytes().contains(&FRAME_HEADER)
        })
    }

    proptest! {
        #[test]
        fn prop_valid_frame_yields_raw(raw in any::<u16>(), extra in proptest::collection::vec(any::<u8>(), 0..20)) {
            let mut payload = std::vec::Vec::from(raw.to_le_bytes());
            payload.extend_from_slice(&extra);
            let frame = Frame::new(CMD_TEMPERATURE_UPLOAD, &payload).unwrap();

            let mut decoder = FrameDecoder::new();
            let samples = feed_all(&mut decoder, &encoded(&frame));
            prop_assert_eq!(samples, vec![TemperatureSample::new(raw)]);
        }

        #[test]
        fn prop_corrupt_checksum_emits_nothing(raw in without_header(), flip in 1u8..=255) {
            let mut bytes = encoded(&Frame::temperature(raw));
            let last = bytes.len() - 1;
            bytes[last] ^= flip;

            let mut decoder = FrameDecoder::new();
            prop_assert!(feed_all(&mut decoder, &bytes).is_empty());

            let next = encoded(&Frame::temperature(raw.wrapping_add(1)));
            prop_assert_eq!(feed_all(&mut decoder, &next), vec![TemperatureSample::new(raw.wrapping_add(1))]);
        }

        #[test]
        fn prop_frames_survive_interleaved_noise(a in any::<u16>(), b in any::<u16>(), lead in noise(), gap in noise()) {
            let mut stream = lead;
            stream.extend_from_slice(&encoded(&Frame::temperature(a)));
            stream.extend_from_slice(&gap);
            stream.extend_from_slice(&encoded(&Frame::temperature(b)));
            // Idle line after the burst flushes any false candidate
            stream.extend_from_slice(&[0x00; MAX_FRAME_LEN]);

            let mut decoder = FrameDecoder::new();
            prop_assert_eq!(
                feed_all(&mut decoder, &stream),
                vec![TemperatureSample::new(a), TemperatureSample::new(b)]
            );
        }
    }
}
