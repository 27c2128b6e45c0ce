//! Configuration type definitions

use thermolog_protocol::{Framing, TemperatureSample};

/// Median window length used by the firmware
///
/// 5 samples at 50 ms cover one 250 ms report interval.
pub const DEFAULT_WINDOW_LEN: usize = 5;

/// Longest accepted control debounce
pub const MAX_DEBOUNCE_MS: u32 = 1000;

/// When the report time base is established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportSync {
    /// Time base follows the first temperature frame of each run
    #[default]
    FirstFrame,
    /// Time base follows the start of each run; reports wait for no frame
    FreeRunning,
}

/// Closed range of plausible temperatures, in 0.1°C units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureRange {
    pub min_x10: u16,
    pub max_x10: u16,
}

impl TemperatureRange {
    /// 0.0°C to 100.0°C
    pub const DEFAULT: Self = Self {
        min_x10: 0,
        max_x10: 1000,
    };

    pub fn accepts(&self, sample: &TemperatureSample) -> bool {
        sample.within(self.min_x10, self.max_x10)
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A sample, report or heartbeat period of zero
    ZeroPeriod,
    /// `min_x10` above `max_x10`
    InvertedRange,
    /// Debounce of zero or above `MAX_DEBOUNCE_MS`
    DebounceOutOfRange,
}

/// Monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Analog sampling period
    pub sample_period_ms: u32,
    /// Report period; also the offset from first frame to elapsed 0
    pub report_period_ms: u32,
    /// Status indicator toggle period
    pub heartbeat_period_ms: u32,
    /// Settle time before a control edge is confirmed
    pub debounce_ms: u32,
    /// Accepted temperature range
    pub range: TemperatureRange,
    /// Transmitter framing
    pub framing: Framing,
    /// Time base policy
    pub sync: ReportSync,
    /// Sample the analog input before the first frame of a run
    pub sample_while_unsynced: bool,
    /// Begin in the running state after power-on
    pub start_running: bool,
}

impl MonitorConfig {
    pub const DEFAULT: Self = Self {
        sample_period_ms: 50,
        report_period_ms: 250,
        heartbeat_period_ms: 15_000,
        debounce_ms: 20,
        range: TemperatureRange::DEFAULT,
        framing: Framing::Checksummed,
        sync: ReportSync::FirstFrame,
        sample_while_unsynced: false,
        start_running: true,
    };

    /// Check the configuration for values the scheduler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period_ms == 0 || self.report_period_ms == 0 || self.heartbeat_period_ms == 0
        {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.range.min_x10 > self.range.max_x10 {
            return Err(ConfigError::InvertedRange);
        }
        if !(1..=MAX_DEBOUNCE_MS).contains(&self.debounce_ms) {
            return Err(ConfigError::DebounceOutOfRange);
        }
        Ok(())
    }

    /// Window length that covers one report interval
    pub fn samples_per_report(&self) -> u32 {
        (self.report_period_ms / self.sample_period_ms.max(1)).max(1)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(MonitorConfig::default().validate(), Ok(()));
        assert_eq!(
            MonitorConfig::DEFAULT.samples_per_report() as usize,
            DEFAULT_WINDOW_LEN
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = MonitorConfig {
            report_period_ms: 0,
            ..MonitorConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = MonitorConfig {
            range: TemperatureRange {
                min_x10: 500,
                max_x10: 100,
            },
            ..MonitorConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::InvertedRange));
    }

    #[test]
    fn test_debounce_bounds() {
        let mut config = MonitorConfig::DEFAULT;
        config.debounce_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::DebounceOutOfRange));
        config.debounce_ms = MAX_DEBOUNCE_MS + 1;
        assert_eq!(config.validate(), Err(ConfigError::DebounceOutOfRange));
        config.debounce_ms = 100;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_range_accepts_closed_bounds() {
        let range = TemperatureRange::DEFAULT;
        assert!(range.accepts(&TemperatureSample::new(0)));
        assert!(range.accepts(&TemperatureSample::new(1000)));
        assert!(!range.accepts(&TemperatureSample::new(1001)));
    }
}
