//! Flood broadcast and directional forwarding.

use crate::{transport, NeighborSet};
use bazaar_types::{Message, PeerId};

/// The band-topology pruning rule: a forwarder pushes a flood only to
/// neighbors on the opposite side of the index line from the message's
/// source. Everyone behind the source was already reached by the
/// source's own flood.
///
/// Relies on the registry handing out indices monotonically, so join
/// links always point at lower indices.
pub(crate) fn wants_forward(self_index: u32, source_index: u32, neighbor_index: u32) -> bool {
    (source_index > self_index) ^ (neighbor_index > self_index)
}

/// Sends `message`, tagged with `source`, to every current neighbor.
pub(crate) async fn broadcast(neighbors: &NeighborSet, message: &Message, source: PeerId) {
    send_pass(neighbors, message, source, None).await;
}

/// Re-broadcasts a flood message, pruned by the directional rule
/// relative to `self_index`.
pub(crate) async fn forward(
    neighbors: &NeighborSet,
    self_index: u32,
    message: &Message,
    source: PeerId,
) {
    send_pass(neighbors, message, source, Some(self_index)).await;
}

/// One pass over a snapshot of the neighbor set. Unreachable neighbors
/// are collected during the pass and evicted after it, never
/// mid-iteration.
async fn send_pass(
    neighbors: &NeighborSet,
    message: &Message,
    source: PeerId,
    prune_from: Option<u32>,
) {
    let mut unreachable = Vec::new();
    for neighbor in neighbors.snapshot() {
        if let Some(self_index) = prune_from {
            if !wants_forward(self_index, source.index(), neighbor.index()) {
                continue;
            }
        }
        if let Err(e) = transport::send(neighbor.addr(), message, source).await {
            tracing::debug!(neighbor = %neighbor, error = %e, "neighbor unreachable");
            unreachable.push(neighbor);
        }
    }
    neighbors.evict(&unreachable);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_only_away_from_the_source() {
        // Source below us: push to higher-indexed neighbors only.
        assert!(wants_forward(5, 2, 7));
        assert!(!wants_forward(5, 2, 3));
        // Source above us: push to lower-indexed neighbors only.
        assert!(wants_forward(5, 8, 3));
        assert!(!wants_forward(5, 8, 7));
    }

    #[tokio::test]
    async fn unreachable_neighbors_are_evicted_after_the_pass() {
        // Two neighbors on ports nothing listens on.
        let neighbors = NeighborSet::new(vec![
            PeerId::new("127.0.0.1:1".parse().unwrap(), 0),
            PeerId::new("127.0.0.1:2".parse().unwrap(), 1),
        ]);
        let source = PeerId::new("127.0.0.1:14000".parse().unwrap(), 2);
        broadcast(&neighbors, &Message::Adjacency, source).await;
        assert!(neighbors.is_empty());
    }
}
