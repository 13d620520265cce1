//! Flood message headers.
//!
//! Every overlay message is two lines on the wire: a header line
//! encoded here, then the sender's [`crate::PeerId`] token. Reply
//! connections stay open for one more line, the buyer's decision.

use crate::{ProtocolError, Result};
use std::fmt;

/// A message header exchanged between peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Announce the sender as a new neighbor.
    Adjacency,
    /// A flooded product lookup.
    Lookup {
        /// Remaining forwarding depth.
        hops: u32,
        /// Product being searched for.
        product: String,
        /// The originator's per-buyer sequence number.
        seq: u64,
    },
    /// A seller's reply to a lookup, sent directly to the buyer on a
    /// connection held open for the decision.
    Reply {
        /// Product the seller has reserved.
        product: String,
    },
    /// The buyer's purchase decision, answered on the reply connection.
    Decision(bool),
}

impl Message {
    /// Parses a header line.
    pub fn parse(line: &str) -> Result<Self> {
        match line {
            "adj" => return Ok(Message::Adjacency),
            "BT" => return Ok(Message::Decision(true)),
            "BF" => return Ok(Message::Decision(false)),
            _ => {}
        }
        if let Some(rest) = line.strip_prefix('L') {
            let (hops, rest) = rest
                .split_once(':')
                .ok_or_else(|| ProtocolError::MalformedHeader(line.to_string()))?;
            let (product, seq) = rest
                .rsplit_once('|')
                .ok_or_else(|| ProtocolError::MalformedHeader(line.to_string()))?;
            let hops = hops
                .parse::<u32>()
                .map_err(|_| ProtocolError::MalformedHeader(line.to_string()))?;
            let seq = seq
                .parse::<u64>()
                .map_err(|_| ProtocolError::MalformedHeader(line.to_string()))?;
            return Ok(Message::Lookup {
                hops,
                product: product.to_string(),
                seq,
            });
        }
        if let Some(product) = line.strip_prefix("R:") {
            return Ok(Message::Reply {
                product: product.to_string(),
            });
        }
        Err(ProtocolError::MalformedHeader(line.to_string()))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Adjacency => write!(f, "adj"),
            Message::Lookup { hops, product, seq } => {
                write!(f, "L{hops}:{product}|{seq}")
            }
            Message::Reply { product } => write!(f, "R:{product}"),
            Message::Decision(true) => write!(f, "BT"),
            Message::Decision(false) => write!(f, "BF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_header() {
        assert_eq!(Message::parse("adj").unwrap(), Message::Adjacency);
        assert_eq!(Message::Adjacency.to_string(), "adj");
    }

    #[test]
    fn lookup_header() {
        let msg = Message::parse("L10:fish|42").unwrap();
        assert_eq!(
            msg,
            Message::Lookup {
                hops: 10,
                product: "fish".to_string(),
                seq: 42,
            }
        );
        assert_eq!(msg.to_string(), "L10:fish|42");
    }

    #[test]
    fn reply_header() {
        let msg = Message::parse("R:boar").unwrap();
        assert_eq!(
            msg,
            Message::Reply {
                product: "boar".to_string()
            }
        );
        assert_eq!(msg.to_string(), "R:boar");
    }

    #[test]
    fn decision_headers() {
        assert_eq!(Message::parse("BT").unwrap(), Message::Decision(true));
        assert_eq!(Message::parse("BF").unwrap(), Message::Decision(false));
        assert_eq!(Message::Decision(true).to_string(), "BT");
        assert_eq!(Message::Decision(false).to_string(), "BF");
    }

    #[test]
    fn malformed_headers_rejected() {
        for line in ["", "X", "L:fish|1", "Lten:fish|1", "L3:fish", "adj2"] {
            assert!(Message::parse(line).is_err(), "accepted {line:?}");
        }
    }
}
