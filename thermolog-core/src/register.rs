//! Shared temperature register
//!
//! The only datum touched by both the receive path and the polling loop.
//! The whole reading (sequence, raw value, arrival tick) lives in one 64-bit
//! atomic, so a reader sees either the previous reading or the new one,
//! never a mix:
//!
//! ```text
//!  63        48 47        32 31                    0
//! ┌────────────┬────────────┬───────────────────────┐
//! │ sequence   │ raw (x10)  │ arrival tick (ms)     │
//! └────────────┴────────────┴───────────────────────┘
//! ```
//!
//! Sequence 0 means no reading has been published yet. On targets without
//! native 64-bit atomics `portable-atomic` falls back to a critical section.

use portable_atomic::{AtomicU64, Ordering};
use thermolog_protocol::TemperatureSample;

/// A published temperature reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub sample: TemperatureSample,
    /// Tick at which the completing byte was received
    pub arrived_at: u32,
    /// Publish counter, never 0
    pub seq: u16,
}

impl Reading {
    fn pack(&self) -> u64 {
        (self.seq as u64) << 48 | (self.sample.raw as u64) << 32 | self.arrived_at as u64
    }

    fn unpack(bits: u64) -> Option<Self> {
        let seq = (bits >> 48) as u16;
        if seq == 0 {
            return None;
        }
        Some(Self {
            sample: TemperatureSample::new((bits >> 32) as u16),
            arrived_at: bits as u32,
            seq,
        })
    }
}

/// Single-writer, single-reader latest-value cell
pub struct TemperatureRegister {
    cell: AtomicU64,
}

impl Default for TemperatureRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureRegister {
    pub const fn new() -> Self {
        Self {
            cell: AtomicU64::new(0),
        }
    }

    /// Publish an accepted sample
    ///
    /// Must only be called from the receive path; the sequence increment
    /// relies on there being a single writer.
    pub fn publish(&self, sample: TemperatureSample, arrived_at: u32) -> Reading {
        let seq = match self.sequence().wrapping_add(1) {
            0 => 1,
            n => n,
        };
        let reading = Reading {
            sample,
            arrived_at,
            seq,
        };
        self.cell.store(reading.pack(), Ordering::Release);
        reading
    }

    /// Latest reading, or `None` before the first publish
    pub fn latest(&self) -> Option<Reading> {
        Reading::unpack(self.cell.load(Ordering::Acquire))
    }

    /// Sequence of the latest reading, 0 when empty
    pub fn sequence(&self) -> u16 {
        self.latest().map_or(0, |r| r.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_register() {
        let register = TemperatureRegister::new();
        assert_eq!(register.latest(), None);
        assert_eq!(register.sequence(), 0);
    }

    #[test]
    fn test_publish_and_read_back() {
        let register = TemperatureRegister::new();
        let published = register.publish(TemperatureSample::new(234), 1000);
        assert_eq!(published.seq, 1);
        assert_eq!(register.latest(), Some(published));

        let next = register.publish(TemperatureSample::new(235), u32::MAX);
        assert_eq!(next.seq, 2);
        assert_eq!(register.latest().unwrap().arrived_at, u32::MAX);
        assert_eq!(register.latest().unwrap().sample.raw, 235);
    }

    #[test]
    fn test_sequence_skips_zero_on_wrap() {
        let register = TemperatureRegister::new();
        let mut last = 0;
        for tick in 0..=u16::MAX as u32 {
            last = register.publish(TemperatureSample::new(1), tick).seq;
        }
        // 65536 publishes: 1..=65535, then wraps to 1
        assert_eq!(last, 1);
        assert!(register.latest().is_some());
    }
}
