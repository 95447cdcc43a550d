//! TLS material loading and certificate rotation.
//!
//! Grounded in the same `tokio_rustls` usage as Stalwart's JMAP cluster
//! transport: certificates and keys are PEM files loaded once at startup
//! and on each rotation, fed through `rustls_pemfile`.

// Layer 1: Standard library imports
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use rustls_pemfile::{certs, pkcs8_private_keys};
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::{ClientConfig, RootCertStore, ServerConfig};
use tokio_rustls::{TlsAcceptor, TlsConnector};

// Layer 3: Internal module imports
use crate::transport::error::TransportError;

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TransportError> {
    let file = std::fs::File::open(path).map_err(|_| TransportError::TlsConfig {
        path: path.display().to_string(),
    })?;
    certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TransportError::TlsConfig {
            path: path.display().to_string(),
        })
}

fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, TransportError> {
    let file = std::fs::File::open(path).map_err(|_| TransportError::TlsConfig {
        path: path.display().to_string(),
    })?;
    let mut keys = pkcs8_private_keys(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TransportError::TlsConfig {
            path: path.display().to_string(),
        })?;
    keys.pop()
        .map(PrivateKeyDer::Pkcs8)
        .ok_or_else(|| TransportError::TlsConfig {
            path: path.display().to_string(),
        })
}

/// Paths to the PEM material used to build server/client TLS configs.
#[derive(Debug, Clone)]
pub struct TlsMaterial {
    pub cert_path: String,
    pub key_path: String,
    /// Peer CA bundle, required for mutual authentication between members.
    pub ca_path: String,
}

impl TlsMaterial {
    fn build_server_config(&self) -> Result<ServerConfig, TransportError> {
        let certs = load_certs(Path::new(&self.cert_path))?;
        let key = load_key(Path::new(&self.key_path))?;
        let mut roots = RootCertStore::empty();
        for ca in load_certs(Path::new(&self.ca_path))? {
            roots
                .add(ca)
                .map_err(|_| TransportError::TlsConfig {
                    path: self.ca_path.clone(),
                })?;
        }
        let client_verifier = tokio_rustls::rustls::server::WebPkiClientVerifier::builder(
            Arc::new(roots),
        )
        .build()
        .map_err(|_| TransportError::TlsConfig {
            path: self.ca_path.clone(),
        })?;

        ServerConfig::builder()
            .with_client_cert_verifier(client_verifier)
            .with_single_cert(certs, key)
            .map_err(|_| TransportError::TlsConfig {
                path: self.cert_path.clone(),
            })
    }

    fn build_client_config(&self) -> Result<ClientConfig, TransportError> {
        let certs = load_certs(Path::new(&self.cert_path))?;
        let key = load_key(Path::new(&self.key_path))?;
        let mut roots = RootCertStore::empty();
        for ca in load_certs(Path::new(&self.ca_path))? {
            roots
                .add(ca)
                .map_err(|_| TransportError::TlsConfig {
                    path: self.ca_path.clone(),
                })?;
        }

        ClientConfig::builder()
            .with_root_certificates(roots)
            .with_client_auth_cert(certs, key)
            .map_err(|_| TransportError::TlsConfig {
                path: self.cert_path.clone(),
            })
    }
}

/// A rotatable [`TlsAcceptor`]: swapping in new material only affects
/// connections accepted after the swap. A handshake already in flight is
/// driven by the `TlsAcceptor` clone it captured at accept time, so it
/// always completes under the certificate it started with — no separate
/// grace-period bookkeeping is needed beyond holding that clone for the
/// handshake's lifetime.
pub struct RotatingTlsAcceptor {
    current: RwLock<Arc<ServerConfig>>,
}

impl RotatingTlsAcceptor {
    pub fn new(material: &TlsMaterial) -> Result<Self, TransportError> {
        let config = material.build_server_config()?;
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
        })
    }

    pub fn rotate(&self, material: &TlsMaterial) -> Result<(), TransportError> {
        let config = material.build_server_config()?;
        *self.current.write() = Arc::new(config);
        Ok(())
    }

    /// Acceptor bound to whichever config is current right now.
    pub fn acceptor(&self) -> TlsAcceptor {
        TlsAcceptor::from(self.current.read().clone())
    }
}

pub fn client_connector(material: &TlsMaterial) -> Result<TlsConnector, TransportError> {
    Ok(TlsConnector::from(Arc::new(
        material.build_client_config()?,
    )))
}
