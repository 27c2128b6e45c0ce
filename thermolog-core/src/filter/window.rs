//! Fixed-capacity median window
//!
//! A ring of `N` raw readings. The first push fills every slot so the window
//! is always full once it holds anything; each later push overwrites the
//! oldest slot.

/// Ring buffer of raw analog readings with a median query
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize> {
    slots: [u16; N],
    /// Slot the next push overwrites (the oldest)
    cursor: usize,
    primed: bool,
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleWindow<N> {
    pub const fn new() -> Self {
        Self {
            slots: [0; N],
            cursor: 0,
            primed: false,
        }
    }

    /// Add a reading, evicting the oldest
    pub fn push(&mut self, raw: u16) {
        if N == 0 {
            return;
        }
        if !self.primed {
            self.slots = [raw; N];
            self.primed = true;
            self.cursor = 1 % N;
            return;
        }
        self.slots[self.cursor] = raw;
        self.cursor = (self.cursor + 1) % N;
    }

    /// Median of the current contents
    ///
    /// For even `N` the element at index `N / 2` of the sorted copy is
    /// returned. `None` until the first push.
    pub fn median(&self) -> Option<u16> {
        if !self.primed || N == 0 {
            return None;
        }
        let mut sorted = self.slots;
        sorted.sort_unstable();
        Some(sorted[N / 2])
    }

    /// Forget all readings
    pub fn clear(&mut self) {
        self.primed = false;
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        !self.primed
    }

    /// Slots in storage order (not age order); empty before the first push
    pub fn contents(&self) -> &[u16] {
        if self.primed {
            &self.slots
        } else {
            &[]
        }
    }
}
