//! The buyer role.

use crate::{
    flood, transport, Bootstrap, NeighborSet, PeerConfig, PeerError, RequestCoordinator, Result,
    SequenceTracker,
};
use bazaar_types::{Message, PeerId};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A buyer peer: originates product lookups, collects seller replies,
/// and decides one winner per request cycle.
pub struct Buyer {
    id: PeerId,
    hop_budget: u32,
    config: PeerConfig,
    neighbors: Arc<NeighborSet>,
    coordinator: Arc<RequestCoordinator>,
    sequences: Arc<SequenceTracker>,
}

impl Buyer {
    /// Assembles a buyer from its bootstrap data and its own monitor
    /// instances. One coordinator and one tracker belong to exactly
    /// this peer; nothing is process-global.
    #[must_use]
    pub fn new(
        boot: Bootstrap,
        config: PeerConfig,
        coordinator: Arc<RequestCoordinator>,
        sequences: Arc<SequenceTracker>,
    ) -> Self {
        Self {
            id: boot.id,
            hop_budget: boot.hop_budget,
            config,
            neighbors: Arc::new(NeighborSet::new(boot.neighbors)),
            coordinator,
            sequences,
        }
    }

    /// Runs the buyer until its purchase target is met: announce
    /// adjacency, serve inbound messages, and loop request cycles.
    ///
    /// # Errors
    ///
    /// Returns an error if the listening socket cannot be bound.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind((self.config.bind_ip, self.id.addr().port())).await?;
        flood::broadcast(&self.neighbors, &Message::Adjacency, self.id).await;

        let listener_task = {
            let id = self.id;
            let neighbors = Arc::clone(&self.neighbors);
            let coordinator = Arc::clone(&self.coordinator);
            let sequences = Arc::clone(&self.sequences);
            tokio::spawn(async move {
                listen(listener, id, neighbors, coordinator, sequences).await;
            })
        };

        let mut seq = 0u64;
        let mut purchases = 0u32;
        while purchases < self.config.purchase_target {
            let product = self.coordinator.new_request();
            let lookup = Message::Lookup {
                hops: self.hop_budget,
                product: product.clone(),
                seq,
            };
            tracing::debug!(buyer = self.id.index(), product = %product, seq, "lookup issued");
            flood::broadcast(&self.neighbors, &lookup, self.id).await;
            seq += 1;

            tokio::time::sleep(self.config.reply_window()).await;

            let outcomes = self.coordinator.choose_winner();
            let won = outcomes.iter().filter(|o| o.chosen).count() as u32;
            purchases += won;
            tracing::debug!(
                buyer = self.id.index(),
                replies = outcomes.len(),
                purchases,
                "cycle decided"
            );
        }

        self.coordinator.write_latency_report();
        listener_task.abort();
        tracing::info!(buyer = self.id.index(), purchases, "purchase target met");
        Ok(())
    }
}

async fn listen(
    listener: TcpListener,
    id: PeerId,
    neighbors: Arc<NeighborSet>,
    coordinator: Arc<RequestCoordinator>,
    sequences: Arc<SequenceTracker>,
) {
    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        let neighbors = Arc::clone(&neighbors);
        let coordinator = Arc::clone(&coordinator);
        let sequences = Arc::clone(&sequences);
        tokio::spawn(async move {
            if let Err(e) = handle(stream, id, &neighbors, &coordinator, &sequences).await {
                tracing::debug!(error = %e, "inbound connection failed");
            }
        });
    }
}

async fn handle(
    stream: TcpStream,
    id: PeerId,
    neighbors: &NeighborSet,
    coordinator: &RequestCoordinator,
    sequences: &SequenceTracker,
) -> Result<()> {
    let mut reader = BufReader::new(stream);
    let (message, source) = transport::read_envelope(&mut reader).await?;
    match message {
        Message::Adjacency => neighbors.add(source),
        Message::Lookup { hops, product, seq } => {
            if !sequences.accept(source.index(), seq) {
                return Ok(());
            }
            let hops = hops.saturating_sub(1);
            if hops == 0 {
                return Ok(());
            }
            let onward = Message::Lookup { hops, product, seq };
            flood::forward(neighbors, id.index(), &onward, source).await;
        }
        Message::Reply { product } => {
            let chosen = coordinator.buy(&product, source).await;
            let decision = Message::Decision(chosen);
            reader
                .get_mut()
                .write_all(format!("{decision}\n").as_bytes())
                .await?;
        }
        Message::Decision(_) => {
            return Err(PeerError::Unexpected(
                "decision outside a reply exchange".to_string(),
            ));
        }
    }
    Ok(())
}
