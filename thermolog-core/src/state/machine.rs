//! Phase definition
//!
//! Sampling and reporting behavior is a function of the current phase.

use super::events::Event;

/// Monitor run phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Sampling and reporting suspended
    Stopped,
    /// Running, waiting for the frame that fixes the time base
    Unsynced,
    /// Running with a time base; reports are due on schedule
    Synced,
}

impl Phase {
    pub fn is_running(&self) -> bool {
        !matches!(self, Phase::Stopped)
    }

    /// Check if reports may be emitted in this phase
    pub fn reports_allowed(&self) -> bool {
        matches!(self, Phase::Synced)
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Phase::*;

        match (self, event) {
            (Stopped, Toggle) => Unsynced,
            (Unsynced, Toggle) | (Synced, Toggle) => Stopped,
            (Unsynced, TimeBaseEstablished) => Synced,

            // A stopped monitor ignores frames; a synced one keeps its base
            _ => self,
        }
    }
}
