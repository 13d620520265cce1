//! Registry join client.

use crate::{transport, PeerError, Result};
use bazaar_types::{PeerId, END_TOKEN, TERMINATE_TOKEN};
use std::net::SocketAddr;
use tokio::io::BufReader;
use tokio::net::TcpStream;

/// Everything a peer needs to start trading: its identity, its
/// registry-assigned lower-indexed neighbors, and the overlay peer
/// count used as the flood hop budget.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// This peer's assigned identity.
    pub id: PeerId,
    /// Already-assigned neighbors, nearest first.
    pub neighbors: Vec<PeerId>,
    /// Hop budget for originated lookups.
    pub hop_budget: u32,
}

/// Joins the overlay through the registry at `registry_addr`.
///
/// # Errors
///
/// Returns [`PeerError::RegistryFull`] when the registry answers with
/// its terminate token; the caller should exit cleanly.
pub async fn join(registry_addr: SocketAddr) -> Result<Bootstrap> {
    let stream = TcpStream::connect(registry_addr).await?;
    let mut reader = BufReader::new(stream);

    let first = transport::read_line(&mut reader).await?;
    if first == TERMINATE_TOKEN {
        return Err(PeerError::RegistryFull);
    }
    let id = first.parse::<PeerId>()?;

    let mut neighbors = Vec::new();
    loop {
        let line = transport::read_line(&mut reader).await?;
        if line == END_TOKEN {
            break;
        }
        neighbors.push(line.parse::<PeerId>()?);
    }

    let count_line = transport::read_line(&mut reader).await?;
    let hop_budget = count_line
        .parse::<u32>()
        .map_err(|_| PeerError::RegistryProtocol(count_line))?;

    tracing::info!(id = %id, neighbors = neighbors.len(), hop_budget, "joined overlay");
    Ok(Bootstrap {
        id,
        neighbors,
        hop_budget,
    })
}
