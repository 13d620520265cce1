//! Protocol error types.

use thiserror::Error;

/// Errors produced while parsing wire tokens.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A peer identity token did not match `<addr>:<port>|<index>`.
    #[error("malformed peer identity: {0}")]
    MalformedIdentity(String),

    /// A message header line was not one of the known forms.
    #[error("malformed message header: {0}")]
    MalformedHeader(String),
}

/// A specialized Result type for protocol parsing.
pub type Result<T> = std::result::Result<T, ProtocolError>;
