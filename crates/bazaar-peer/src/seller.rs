//! The seller role.

use crate::{
    flood, transport, Bootstrap, NeighborSet, PeerConfig, PeerError, ReservationLedger, Result,
    SequenceTracker,
};
use bazaar_types::{Message, PeerId};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

/// A seller peer: stocks one product at a time, answers matching
/// lookups with a direct reply, and settles each reservation on the
/// buyer's decision.
pub struct Seller {
    id: PeerId,
    config: PeerConfig,
    neighbors: Arc<NeighborSet>,
    ledger: Arc<ReservationLedger>,
    sequences: Arc<SequenceTracker>,
}

impl Seller {
    /// Assembles a seller from its bootstrap data and its own monitor
    /// instances.
    #[must_use]
    pub fn new(
        boot: Bootstrap,
        config: PeerConfig,
        ledger: Arc<ReservationLedger>,
        sequences: Arc<SequenceTracker>,
    ) -> Self {
        Self {
            id: boot.id,
            config,
            neighbors: Arc::new(NeighborSet::new(boot.neighbors)),
            ledger,
            sequences,
        }
    }

    /// Runs the seller forever: announce adjacency, then serve
    /// lookups and adjacency announcements.
    ///
    /// # Errors
    ///
    /// Returns an error if the listening socket cannot be bound.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind((self.config.bind_ip, self.id.addr().port())).await?;
        flood::broadcast(&self.neighbors, &Message::Adjacency, self.id).await;
        tracing::info!(
            seller = self.id.index(),
            product = %self.ledger.product(),
            "open for business"
        );

        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };
            let id = self.id;
            let neighbors = Arc::clone(&self.neighbors);
            let ledger = Arc::clone(&self.ledger);
            let sequences = Arc::clone(&self.sequences);
            tokio::spawn(async move {
                if let Err(e) = handle(stream, id, &neighbors, &ledger, &sequences).await {
                    tracing::debug!(error = %e, "inbound connection failed");
                }
            });
        }
    }
}

async fn handle(
    stream: TcpStream,
    id: PeerId,
    neighbors: &NeighborSet,
    ledger: &ReservationLedger,
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
            if product == ledger.product() && ledger.reserve() {
                fulfill(id, ledger, &product, source).await;
                return Ok(());
            }
            let hops = hops.saturating_sub(1);
            if hops == 0 {
                return Ok(());
            }
            let onward = Message::Lookup { hops, product, seq };
            flood::forward(neighbors, id.index(), &onward, source).await;
        }
        other => {
            return Err(PeerError::Unexpected(format!(
                "seller received {other}"
            )));
        }
    }
    Ok(())
}

/// Replies directly to the buyer and settles the reservation made for
/// this reply. An unreachable or crashed buyer releases the hold so
/// the unit goes back on the shelf.
async fn fulfill(id: PeerId, ledger: &ReservationLedger, product: &str, buyer: PeerId) {
    match transport::send_reply(buyer.addr(), product, id).await {
        Ok(purchased) => {
            ledger.settle(purchased, buyer.index());
            tracing::debug!(
                seller = id.index(),
                buyer = buyer.index(),
                product = %product,
                purchased,
                "reservation settled"
            );
        }
        Err(e) => {
            tracing::debug!(buyer = %buyer, error = %e, "reply failed, releasing hold");
            ledger.settle(false, buyer.index());
        }
    }
}
