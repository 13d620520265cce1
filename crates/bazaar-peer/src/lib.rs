//! # Bazaar Peer
//!
//! Buyer and seller peers for the Bazaar marketplace overlay.
//!
//! A peer joins through the registry, announces itself to its assigned
//! neighbors, and then serves the flood protocol: buyers originate
//! product lookups and collect seller replies, sellers reserve
//! inventory and answer matching lookups directly. Every inbound
//! connection is handled by its own task; monitors (`SequenceTracker`,
//! `ReservationLedger`, `RequestCoordinator`) each guard their state
//! with a single lock and never call into one another.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod buyer;
mod catalog;
mod config;
mod coordinator;
mod error;
mod flood;
mod ledger;
mod neighbors;
mod node;
mod seller;
mod sequence;
mod trade_log;
mod transport;

pub use bootstrap::{join, Bootstrap};
pub use buyer::Buyer;
pub use config::{PeerConfig, Role};
pub use coordinator::{ReplyOutcome, RequestCoordinator};
pub use error::{PeerError, Result};
pub use ledger::ReservationLedger;
pub use neighbors::NeighborSet;
pub use node::run;
pub use seller::Seller;
pub use sequence::SequenceTracker;
pub use trade_log::TradeLog;

/// Products traded on the overlay.
pub const PRODUCTS: [&str; 3] = ["boar", "fish", "salt"];

/// Largest quantity a seller restocks in one batch.
pub const MAX_STOCK: u32 = 9;
