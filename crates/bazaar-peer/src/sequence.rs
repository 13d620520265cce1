//! Flood duplicate suppression.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Tracks the highest sequence number seen per originating peer.
///
/// Every flood-receiving node consults its tracker before forwarding or
/// fulfilling a lookup; acceptance is strictly monotonic per origin, so
/// replayed and looped-back floods are dropped regardless of delivery
/// order across distinct originators.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    seen: Mutex<HashMap<u32, u64>>,
}

impl SequenceTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `seq` for `origin` and returns true if it is the first
    /// sequence seen for that origin or strictly exceeds the previous
    /// maximum; returns false otherwise.
    pub fn accept(&self, origin: u32, seq: u64) -> bool {
        let mut seen = self.seen.lock();
        match seen.get(&origin) {
            Some(&last) if seq <= last => false,
            _ => {
                seen.insert(origin, seq);
                true
            }
        }
    }
}
