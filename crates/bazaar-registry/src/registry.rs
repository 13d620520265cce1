//! The peer registry monitor.

use crate::{RegistryError, Result};
use bazaar_types::PeerId;
use parking_lot::Mutex;
use std::net::{IpAddr, SocketAddr};

/// Assigns topology indices and listening ports to joining peers and
/// answers neighbor queries.
///
/// Indices are handed out in join order starting at 0 and ports
/// monotonically from `port_start + 1`. A peer's neighbor set contains
/// only lower-indexed peers; later joiners within the radius announce
/// themselves back via adjacency messages. All operations take one lock
/// so concurrent joins see a consistent assignment order.
pub struct PeerRegistry {
    limit: usize,
    radius: u32,
    port_start: u16,
    assigned: Mutex<Vec<PeerId>>,
}

impl PeerRegistry {
    /// Creates a registry that admits up to `limit` peers, each linked
    /// to the `radius` peers directly below it.
    #[must_use]
    pub fn new(limit: usize, radius: u32, port_start: u16) -> Self {
        Self {
            limit,
            radius,
            port_start,
            assigned: Mutex::new(Vec::new()),
        }
    }

    /// Admits a peer reachable at `ip`, returning its identity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Full`] once `limit` peers have been
    /// admitted.
    pub fn assign(&self, ip: IpAddr) -> Result<PeerId> {
        let mut assigned = self.assigned.lock();
        if assigned.len() >= self.limit {
            return Err(RegistryError::Full(self.limit));
        }
        let index = assigned.len() as u32;
        let port = self.port_start + 1 + index as u16;
        let id = PeerId::new(SocketAddr::new(ip, port), index);
        assigned.push(id);
        Ok(id)
    }

    /// Returns the already-assigned neighbors of `index`, nearest
    /// first: every peer with index in `[index - radius, index - 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownIndex`] if `index` was never
    /// assigned.
    pub fn neighbors_of(&self, index: u32) -> Result<Vec<PeerId>> {
        let assigned = self.assigned.lock();
        if index as usize >= assigned.len() {
            return Err(RegistryError::UnknownIndex(index));
        }
        let mut neighbors = Vec::new();
        for step in 1..=self.radius {
            let Some(neighbor_index) = index.checked_sub(step) else {
                break;
            };
            neighbors.push(assigned[neighbor_index as usize]);
        }
        Ok(neighbors)
    }

    /// Returns how many peers have been admitted so far.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.assigned.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const IP: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);

    #[test]
    fn indices_are_assigned_in_join_order() {
        let registry = PeerRegistry::new(4, 2, 10250);
        for expected in 0..4u32 {
            let id = registry.assign(IP).unwrap();
            assert_eq!(id.index(), expected);
            assert_eq!(id.addr().port(), 10251 + expected as u16);
        }
    }

    #[test]
    fn assign_returns_full_at_the_limit() {
        let registry = PeerRegistry::new(3, 1, 10250);
        for _ in 0..3 {
            registry.assign(IP).unwrap();
        }
        assert!(matches!(
            registry.assign(IP),
            Err(RegistryError::Full(3))
        ));
    }

    #[test]
    fn neighbor_window_is_clamped_at_zero() {
        let registry = PeerRegistry::new(6, 3, 10250);
        for _ in 0..6 {
            registry.assign(IP).unwrap();
        }
        // Peer 1 only has peer 0 below it.
        let near_edge = registry.neighbors_of(1).unwrap();
        assert_eq!(
            near_edge.iter().map(PeerId::index).collect::<Vec<_>>(),
            vec![0]
        );
        // Peer 5 has the full window, nearest first.
        let full = registry.neighbors_of(5).unwrap();
        assert_eq!(
            full.iter().map(PeerId::index).collect::<Vec<_>>(),
            vec![4, 3, 2]
        );
    }

    #[test]
    fn first_peer_has_no_neighbors() {
        let registry = PeerRegistry::new(3, 1, 10250);
        registry.assign(IP).unwrap();
        assert!(registry.neighbors_of(0).unwrap().is_empty());
    }

    #[test]
    fn neighbors_of_unassigned_index_fails() {
        let registry = PeerRegistry::new(3, 1, 10250);
        assert!(matches!(
            registry.neighbors_of(0),
            Err(RegistryError::UnknownIndex(0))
        ));
    }

    #[test]
    fn concurrent_joins_get_distinct_assignments() {
        let registry = Arc::new(PeerRegistry::new(32, 2, 20000));
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.assign(IP).unwrap())
            })
            .collect();
        let mut indices: Vec<u32> = handles
            .into_iter()
            .map(|h| h.join().unwrap().index())
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..32).collect::<Vec<_>>());
    }
}
