//! # Bazaar Registry
//!
//! The central registry that admits peers into the overlay. Each
//! joining peer receives a topology index and a listening port, plus
//! the identities of its already-assigned lower-indexed neighbors.
//! Higher-indexed peers link back later through adjacency
//! announcements, so the overlay converges to an undirected band graph
//! of bandwidth `2 * radius`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod registry;
mod server;

pub use error::{RegistryError, Result};
pub use registry::PeerRegistry;
pub use server::{RegistryConfig, RegistryServer};
