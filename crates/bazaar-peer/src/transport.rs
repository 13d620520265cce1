//! Point-to-point line transport.
//!
//! Outbound connections are one-shot: connect, write the two-line
//! envelope (header then source identity), close. The reply path is
//! the one exception, holding its connection open for the buyer's
//! decision line.

use crate::{PeerError, Result};
use bazaar_types::{Message, PeerId};
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Sends one envelope to `to` and closes the connection.
pub async fn send(to: SocketAddr, message: &Message, source: PeerId) -> Result<()> {
    let mut stream = TcpStream::connect(to).await?;
    stream
        .write_all(format!("{message}\n{source}\n").as_bytes())
        .await?;
    Ok(())
}

/// Sends a reply envelope to the buyer and waits on the same
/// connection for the decision. Returns true iff the buyer chose this
/// seller.
pub async fn send_reply(buyer: SocketAddr, product: &str, source: PeerId) -> Result<bool> {
    let stream = TcpStream::connect(buyer).await?;
    let mut reader = BufReader::new(stream);
    let header = Message::Reply {
        product: product.to_string(),
    };
    reader
        .get_mut()
        .write_all(format!("{header}\n{source}\n").as_bytes())
        .await?;
    let line = read_line(&mut reader).await?;
    match Message::parse(&line)? {
        Message::Decision(chosen) => Ok(chosen),
        other => Err(PeerError::Unexpected(format!(
            "expected a decision, got {other}"
        ))),
    }
}

/// Reads one line, without its terminator. EOF is an error: envelopes
/// are never legitimately truncated.
pub async fn read_line<R>(reader: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(PeerError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed mid-envelope",
        )));
    }
    Ok(line.trim_end().to_string())
}

/// Reads an inbound envelope: the header line then the source identity.
pub async fn read_envelope<R>(reader: &mut R) -> Result<(Message, PeerId)>
where
    R: AsyncBufRead + Unpin,
{
    let message = Message::parse(&read_line(reader).await?)?;
    let source = read_line(reader).await?.parse::<PeerId>()?;
    Ok((message, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn peer(index: u32) -> PeerId {
        PeerId::new(
            format!("127.0.0.1:{}", 13000 + index).parse().unwrap(),
            index,
        )
    }

    #[tokio::test]
    async fn send_delivers_a_two_line_envelope() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let source = peer(4);
        let message = Message::Lookup {
            hops: 3,
            product: "salt".to_string(),
            seq: 9,
        };

        let sender = tokio::spawn(async move { send(addr, &message, source).await });
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);
        let (received, from) = read_envelope(&mut reader).await.unwrap();
        sender.await.unwrap().unwrap();

        assert_eq!(
            received,
            Message::Lookup {
                hops: 3,
                product: "salt".to_string(),
                seq: 9,
            }
        );
        assert_eq!(from, source);
    }

    #[tokio::test]
    async fn send_reply_carries_the_decision_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seller = peer(7);

        let replier = tokio::spawn(async move { send_reply(addr, "fish", seller).await });
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);
        let (message, from) = read_envelope(&mut reader).await.unwrap();
        assert_eq!(
            message,
            Message::Reply {
                product: "fish".to_string()
            }
        );
        assert_eq!(from, seller);
        reader.get_mut().write_all(b"BT\n").await.unwrap();

        assert!(replier.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn a_closed_connection_is_an_eof_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
        });
        let stream = TcpStream::connect(addr).await.unwrap();
        let mut reader = BufReader::new(stream);
        assert!(read_line(&mut reader).await.is_err());
    }
}
