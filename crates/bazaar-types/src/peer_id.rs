//! Peer identity tokens.

use crate::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// A peer's routing identity: its reachable socket address plus the
/// topology index the registry assigned it.
///
/// The wire form is `<addr>:<port>|<index>` and is self-describing, so
/// no lookup table is needed to route to the peer named by a token.
/// Identities are immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId {
    addr: SocketAddr,
    index: u32,
}

impl PeerId {
    /// Creates an identity from a socket address and topology index.
    #[must_use]
    pub fn new(addr: SocketAddr, index: u32) -> Self {
        Self { addr, index }
    }

    /// Returns the peer's listening address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the peer's topology index.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.addr, self.index)
    }
}

impl FromStr for PeerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, index) = s
            .rsplit_once('|')
            .ok_or_else(|| ProtocolError::MalformedIdentity(s.to_string()))?;
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ProtocolError::MalformedIdentity(s.to_string()))?;
        let index = index
            .parse::<u32>()
            .map_err(|_| ProtocolError::MalformedIdentity(s.to_string()))?;
        Ok(Self { addr, index })
    }
}
