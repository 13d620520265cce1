//! # Bazaar Types
//!
//! Wire-level types shared by every component of the Bazaar overlay:
//! peer identities, flood message headers, and the protocol errors
//! produced while parsing either.
//!
//! The overlay speaks a line-oriented text protocol; these types own
//! the text forms so that the registry and the peers never disagree on
//! framing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod message;
mod peer_id;

pub use error::{ProtocolError, Result};
pub use message::Message;
pub use peer_id::PeerId;

/// Line sent by the registry after the last neighbor identity.
pub const END_TOKEN: &str = "end";

/// Line sent by the registry when the overlay is at capacity.
pub const TERMINATE_TOKEN: &str = "terminate";
