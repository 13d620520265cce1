//! Registry error types.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The configured peer limit has been reached.
    #[error("registry full: peer limit {0} reached")]
    Full(usize),

    /// A neighbor query named an index that was never assigned.
    #[error("unknown topology index: {0}")]
    UnknownIndex(u32),

    /// I/O error while serving a join.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
