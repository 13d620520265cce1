//! Peer configuration.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Which side of the market a peer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Originates lookups and buys products.
    Buyer,
    /// Stocks inventory and answers lookups.
    Seller,
}

impl Role {
    /// Flips a coin, matching deployments where each peer picks its
    /// role at startup.
    #[must_use]
    pub fn random() -> Self {
        if rand::random() {
            Role::Buyer
        } else {
            Role::Seller
        }
    }
}

/// Configuration for one peer process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Address of the registry's join server.
    pub registry_addr: SocketAddr,
    /// Local interface the peer's listener binds to.
    pub bind_ip: IpAddr,
    /// Directory trade logs are written under.
    pub output_dir: PathBuf,
    /// How long a buyer collects replies to one lookup before
    /// deciding, in milliseconds.
    pub reply_window_ms: u64,
    /// How many purchases a buyer completes before retiring.
    pub purchase_target: u32,
    /// Bounded wait for a seller's undecided reply, in milliseconds.
    /// Absent means wait forever.
    pub decision_timeout_ms: Option<u64>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            registry_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 10250),
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            output_dir: PathBuf::from("."),
            reply_window_ms: 1000,
            purchase_target: 1000,
            decision_timeout_ms: None,
        }
    }
}

impl PeerConfig {
    /// The buyer's reply collection window.
    #[must_use]
    pub fn reply_window(&self) -> Duration {
        Duration::from_millis(self.reply_window_ms)
    }

    /// The seller-side decision wait bound, if configured.
    #[must_use]
    pub fn decision_timeout(&self) -> Option<Duration> {
        self.decision_timeout_ms.map(Duration::from_millis)
    }
}
