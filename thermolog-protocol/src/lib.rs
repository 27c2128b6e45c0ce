//! Temperature Upload Protocol
//!
//! This crate decodes the byte stream sent by the temperature transmitter.
//! Bytes arrive one at a time from a UART receive path with no framing
//! guarantees, so every decoder here is a resynchronizing state machine fed
//! with [`ByteDecoder::consume`].
//!
//! # Checksummed framing
//!
//! ```text
//! ┌────────┬──────────────┬─────────┬─────────────┬──────────┐
//! │ HEADER │ LENGTH (LE)  │ COMMAND │ PAYLOAD     │ CHECKSUM │
//! │ 0xFC   │ 2B, total    │ 1B      │ 0–27B       │ XOR      │
//! └────────┴──────────────┴─────────┴─────────────┴──────────┘
//! ```
//!
//! A temperature upload (`COMMAND = 0x01`) carries the raw reading in tenths
//! of a degree as a little-endian `u16` at the start of the payload.
//!
//! # Fixed-offset framing
//!
//! Older transmitters send a fixed six byte frame with no length and no
//! checksum; see [`fixed`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod fixed;
pub mod frame;
pub mod sample;

pub use decoder::{ByteDecoder, Decoder, Framing};
pub use fixed::{FixedLayout, FixedOffsetDecoder};
pub use frame::{
    checksum, DecodeStats, Frame, FrameDecoder, FrameError, CMD_TEMPERATURE_UPLOAD, FRAME_HEADER,
    MAX_FRAME_LEN, MAX_PAYLOAD_SIZE, MIN_FRAME_LEN,
};
pub use sample::TemperatureSample;
