//! TCP + mutual-TLS transport between cluster members, framed with
//! `message::codec`.

pub mod error;
pub mod tcp;
pub mod tls;

pub use error::TransportError;
pub use tcp::{connect, AsyncStream, Connection, Listener};
pub use tls::{client_connector, RotatingTlsAcceptor, TlsMaterial};
