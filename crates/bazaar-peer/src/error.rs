//! Peer error types.

use thiserror::Error;

/// Errors that can occur while running a peer.
#[derive(Debug, Error)]
pub enum PeerError {
    /// The registry is at capacity; the peer should exit cleanly.
    #[error("registry full, overlay at capacity")]
    RegistryFull,

    /// The registry spoke something other than the join protocol.
    #[error("unexpected registry response: {0}")]
    RegistryProtocol(String),

    /// A well-formed message arrived where the protocol does not
    /// allow it.
    #[error("unexpected message: {0}")]
    Unexpected(String),

    /// A wire token failed to parse.
    #[error(transparent)]
    Protocol(#[from] bazaar_types::ProtocolError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for peer operations.
pub type Result<T> = std::result::Result<T, PeerError>;
