//! The registry's TCP join server.

use crate::{PeerRegistry, RegistryError, Result};
use bazaar_types::{END_TOKEN, TERMINATE_TOKEN};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

/// Configuration for a [`RegistryServer`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Address the registry listens on; peers are assigned ports
    /// monotonically above this one.
    pub bind_ip: IpAddr,
    /// The registry's own listening port and the base of the peer port
    /// range.
    pub port_start: u16,
    /// Maximum number of peers admitted to the overlay; also the hop
    /// budget handed to every joining peer.
    pub limit: usize,
    /// Neighbor radius of the band topology.
    pub radius: u32,
}

/// Serves the registry join protocol.
///
/// Per connection the server sends the caller's assigned identity, one
/// line per lower-indexed neighbor, the `end` marker, then the overlay
/// peer count used as the flood hop budget. A full registry answers
/// with the single line `terminate`.
pub struct RegistryServer {
    registry: Arc<PeerRegistry>,
    limit: usize,
    listener: TcpListener,
}

impl RegistryServer {
    /// Binds the join server.
    ///
    /// # Errors
    ///
    /// Returns an error if the listening socket cannot be bound.
    pub async fn bind(config: RegistryConfig) -> Result<Self> {
        let listener = TcpListener::bind((config.bind_ip, config.port_start)).await?;
        let registry = Arc::new(PeerRegistry::new(
            config.limit,
            config.radius,
            config.port_start,
        ));
        tracing::info!(addr = %listener.local_addr()?, "registry listening");
        Ok(Self {
            registry,
            limit: config.limit,
            listener,
        })
    }

    /// Returns the address the server is listening on.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket's local address is unavailable.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Returns the shared registry monitor.
    #[must_use]
    pub fn registry(&self) -> Arc<PeerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accepts joins forever, one task per connection.
    pub async fn run(self) {
        loop {
            let (stream, remote) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };
            tracing::info!(remote = %remote, "peer joining");
            let registry = Arc::clone(&self.registry);
            let limit = self.limit;
            tokio::spawn(async move {
                if let Err(e) = handle_join(stream, remote.ip(), &registry, limit).await {
                    tracing::warn!(remote = %remote, error = %e, "join failed");
                }
            });
        }
    }
}

async fn handle_join(
    mut stream: TcpStream,
    peer_ip: IpAddr,
    registry: &PeerRegistry,
    limit: usize,
) -> Result<()> {
    match registry.assign(peer_ip) {
        Ok(id) => {
            let mut response = format!("{id}\n");
            for neighbor in registry.neighbors_of(id.index())? {
                response.push_str(&format!("{neighbor}\n"));
            }
            response.push_str(&format!("{END_TOKEN}\n{limit}\n"));
            stream.write_all(response.as_bytes()).await?;
            tracing::info!(id = %id, "peer admitted");
        }
        Err(RegistryError::Full(_)) => {
            stream.write_all(format!("{TERMINATE_TOKEN}\n").as_bytes()).await?;
            tracing::info!("peer turned away, registry full");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
