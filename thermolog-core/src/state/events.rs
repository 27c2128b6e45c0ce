//! Events that trigger phase transitions

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Debounced press of the start/stop control
    Toggle,
    /// A report time base was fixed for the current run
    TimeBaseEstablished,
}
