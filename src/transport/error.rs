// Layer 1: Standard library imports
use std::io;
use std::net::SocketAddr;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::message::CodecError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {addr}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("TLS handshake with {addr} failed")]
    TlsHandshakeFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to load TLS material from {path}")]
    TlsConfig { path: String },

    #[error("connection to {addr} closed")]
    Closed { addr: SocketAddr },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TransportError {
    /// Connection-level failures warrant a retry with backoff; protocol
    /// mismatches (`CodecError::MalformedFrame`) never will on their own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectFailed { .. } | Self::Closed { .. } | Self::Io(_)
        )
    }
}
