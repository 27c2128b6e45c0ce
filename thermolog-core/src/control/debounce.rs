//! Polled debounce
//!
//! The raw level is sampled once per poll. A level change is confirmed only
//! after it has held for the settle time; a bounce back to the stable level
//! cancels it. Nothing here waits, so a held button never stalls sampling or
//! reporting.

use crate::scheduler::deadline::elapsed;

/// Confirmed level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounce state for one digital input
#[derive(Debug, Clone)]
pub struct Debouncer {
    settle_ms: u32,
    /// Last confirmed level
    stable: bool,
    /// Tick at which the raw level first differed from `stable`
    pending_since: Option<u32>,
}

impl Debouncer {
    pub const fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            stable: false,
            pending_since: None,
        }
    }

    /// Feed the raw level seen at `now`
    ///
    /// Returns an edge once the new level has held for the settle time.
    pub fn update(&mut self, pressed: bool, now: u32) -> Option<Edge> {
        if pressed == self.stable {
            self.pending_since = None;
            return None;
        }

        match self.pending_since {
            None => {
                self.pending_since = Some(now);
                None
            }
            Some(since) if elapsed(now, since) >= self.settle_ms => {
                self.stable = pressed;
                self.pending_since = None;
                Some(if pressed { Edge::Pressed } else { Edge::Released })
            }
            Some(_) => None,
        }
    }

    /// Last confirmed level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}
