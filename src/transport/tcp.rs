//! TCP + optional mutual-TLS transport, framed with the wire codec.

// Layer 1: Standard library imports
use std::net::SocketAddr;
use std::pin::Pin;

// Layer 2: Third-party crate imports
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use crate::message::{ClusterCodec, Frame};
use crate::transport::error::TransportError;
use crate::transport::tls::{client_connector, RotatingTlsAcceptor, TlsMaterial};

/// Marker trait so a TLS or plain stream can be boxed behind one pointer;
/// has no methods of its own, so any `AsyncRead + AsyncWrite` type
/// qualifies automatically.
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncStream for T {}

/// One framed, bidirectional connection to a peer member.
pub struct Connection {
    peer: SocketAddr,
    framed: Framed<Pin<Box<dyn AsyncStream>>, ClusterCodec>,
}

impl Connection {
    fn new(peer: SocketAddr, stream: Pin<Box<dyn AsyncStream>>) -> Self {
        Self {
            peer,
            framed: Framed::new(stream, ClusterCodec),
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        self.framed.send(frame).await.map_err(Into::into)
    }

    pub async fn recv(&mut self) -> Result<Frame, TransportError> {
        match self.framed.next().await {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(e)) => Err(e.into()),
            None => Err(TransportError::Closed { addr: self.peer }),
        }
    }
}

/// Connect to `addr`, optionally upgrading to mutual TLS.
pub async fn connect(addr: SocketAddr, tls: Option<&TlsMaterial>) -> Result<Connection, TransportError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| TransportError::ConnectFailed { addr, source })?;
    stream.set_nodelay(true).ok();

    match tls {
        Some(material) => {
            let connector = client_connector(material)?;
            // Cluster transport authenticates peers by certificate, not by
            // hostname, so any `ServerName` placeholder is acceptable here.
            let server_name = tokio_rustls::rustls::pki_types::ServerName::IpAddress(addr.ip().into());
            let tls_stream = connector
                .connect(server_name, stream)
                .await
                .map_err(|source| TransportError::TlsHandshakeFailed { addr, source })?;
            debug!(%addr, "TLS handshake complete (client)");
            Ok(Connection::new(addr, Box::pin(tls_stream)))
        }
        None => Ok(Connection::new(addr, Box::pin(stream))),
    }
}

/// A bound listener accepting inbound member connections.
pub struct Listener {
    inner: TcpListener,
    acceptor: Option<std::sync::Arc<RotatingTlsAcceptor>>,
}

impl Listener {
    pub async fn bind(
        addr: SocketAddr,
        acceptor: Option<std::sync::Arc<RotatingTlsAcceptor>>,
    ) -> Result<Self, TransportError> {
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::ConnectFailed { addr, source })?;
        Ok(Self { inner, acceptor })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.inner.local_addr().map_err(Into::into)
    }

    pub async fn accept(&self) -> Result<Connection, TransportError> {
        let (stream, peer) = self
            .inner
            .accept()
            .await
            .map_err(|source| TransportError::ConnectFailed { addr: self.inner.local_addr().unwrap_or(peer_unknown()), source })?;
        stream.set_nodelay(true).ok();

        match &self.acceptor {
            Some(rotating) => {
                // Captured once per accept: the handshake below always
                // completes under this config, even if a rotation happens
                // concurrently on another task.
                let acceptor = rotating.acceptor();
                let tls_stream = acceptor
                    .accept(stream)
                    .await
                    .map_err(|source| TransportError::TlsHandshakeFailed { addr: peer, source })?;
                debug!(%peer, "TLS handshake complete (server)");
                Ok(Connection::new(peer, Box::pin(tls_stream)))
            }
            None => {
                warn!(%peer, "accepting plaintext cluster connection");
                Ok(Connection::new(peer, Box::pin(stream)))
            }
        }
    }
}

fn peer_unknown() -> SocketAddr {
    "0.0.0.0:0".parse().expect("static address")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Frame;
    use bytes::Bytes;

    #[tokio::test]
    async fn plaintext_round_trip_delivers_a_frame() {
        let listener = Listener::bind("127.0.0.1:0".parse().unwrap(), None)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();
            let frame = conn.recv().await.unwrap();
            assert_eq!(frame.type_tag, "ping");
        });

        let mut client = connect(addr, None).await.unwrap();
        client
            .send(Frame::new("ping", Bytes::from_static(b"{}")))
            .await
            .unwrap();

        server.await.unwrap();
    }
}
