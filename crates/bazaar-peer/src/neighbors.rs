//! Neighbor set bookkeeping.

use bazaar_types::PeerId;
use parking_lot::RwLock;

/// The ordered set of neighbors a peer broadcasts to.
///
/// Grows when an inbound adjacency announcement arrives and shrinks
/// when an outbound send fails; both sides mutate it concurrently, so
/// one lock owns the list. Knowledge is asymmetric: A may list B before
/// B lists A. Eviction is batch-applied after a full broadcast pass,
/// never mid-iteration, which is why senders work on a snapshot.
#[derive(Debug, Default)]
pub struct NeighborSet {
    peers: RwLock<Vec<PeerId>>,
}

impl NeighborSet {
    /// Creates a set seeded with the registry-provided neighbors.
    #[must_use]
    pub fn new(initial: Vec<PeerId>) -> Self {
        Self {
            peers: RwLock::new(initial),
        }
    }

    /// Appends `peer` unless it is already present.
    pub fn add(&self, peer: PeerId) {
        let mut peers = self.peers.write();
        if !peers.contains(&peer) {
            peers.push(peer);
        }
    }

    /// Returns a snapshot to iterate over during a broadcast pass.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PeerId> {
        self.peers.read().clone()
    }

    /// Evicts every peer in `unreachable`, applied as one batch after
    /// a broadcast pass completes.
    pub fn evict(&self, unreachable: &[PeerId]) {
        if unreachable.is_empty() {
            return;
        }
        let mut peers = self.peers.write();
        peers.retain(|p| !unreachable.contains(p));
    }

    /// Returns the current neighbor count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    /// Returns true if no neighbors are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn peer(index: u32) -> PeerId {
        PeerId::new(
            format!("127.0.0.1:{}", 12000 + index).parse().unwrap(),
            index,
        )
    }

    #[test]
    fn add_is_idempotent() {
        let set = NeighborSet::new(vec![peer(0)]);
        set.add(peer(1));
        set.add(peer(1));
        assert_eq!(set.snapshot(), vec![peer(0), peer(1)]);
    }

    #[test]
    fn eviction_removes_only_the_named_peers() {
        let set = NeighborSet::new(vec![peer(0), peer(1), peer(2)]);
        set.evict(&[peer(1)]);
        assert_eq!(set.snapshot(), vec![peer(0), peer(2)]);
    }

    #[test]
    fn concurrent_adds_and_evictions_lose_no_updates() {
        let set = Arc::new(NeighborSet::default());
        let adders: Vec<_> = (0..8u32)
            .map(|i| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || {
                    for j in 0..16 {
                        set.add(peer(i * 16 + j));
                    }
                })
            })
            .collect();
        let evictor = {
            let set = Arc::clone(&set);
            std::thread::spawn(move || set.evict(&[peer(0)]))
        };
        for handle in adders {
            handle.join().unwrap();
        }
        evictor.join().unwrap();
        // Every added peer except possibly peer 0 must survive.
        let snapshot = set.snapshot();
        for index in 1..128u32 {
            assert!(snapshot.contains(&peer(index)), "lost peer {index}");
        }
    }
}
