//! TLS material loading and server-config construction for the mutually
//! authenticated controller listener.

use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use tokio_rustls::TlsAcceptor;

use crate::error::GatewayError;

/// Builds a `TlsAcceptor` requiring TLS 1.2+, mutual client
/// authentication against a single trusted CA pool, and restricted to
/// AEAD cipher suites (ECDHE-RSA-AES256-GCM-SHA384 when negotiating
/// TLS 1.2).
pub fn build_acceptor(
    ca_cert_path: &Path,
    server_cert_path: &Path,
    server_key_path: &Path,
) -> Result<TlsAcceptor, GatewayError> {
    let root_store = load_ca_pool(ca_cert_path)?;
    let client_verifier = WebPkiClientVerifier::builder(Arc::new(root_store))
        .build()
        .map_err(|e| GatewayError::TlsSetup(format!("building client verifier: {e}")))?;

    let certs = load_certs(server_cert_path)?;
    let key = load_private_key(server_key_path)?;

    let provider = Arc::new(restricted_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS12, &rustls::version::TLS13])
        .map_err(|e| GatewayError::TlsSetup(format!("selecting protocol versions: {e}")))?
        .with_client_cert_verifier(client_verifier)
        .with_single_cert(certs, key)
        .map_err(|e| GatewayError::TlsSetup(format!("loading server certificate: {e}")))?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

/// Restricts the negotiable suites to AEAD ciphers, preferring
/// TLS 1.3's AES-256-GCM and falling back to the ECDHE-RSA-AES256-GCM
/// suite on TLS 1.2 peers.
fn restricted_provider() -> rustls::crypto::CryptoProvider {
    let base = rustls::crypto::ring::default_provider();
    rustls::crypto::CryptoProvider {
        cipher_suites: vec![
            rustls::crypto::ring::cipher_suite::TLS13_AES_256_GCM_SHA384,
            rustls::crypto::ring::cipher_suite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        ],
        ..base
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, GatewayError> {
    std::fs::read(path).map_err(|e| GatewayError::TlsIo(path.display().to_string(), e))
}

fn load_ca_pool(path: &Path) -> Result<RootCertStore, GatewayError> {
    let pem = read_pem(path)?;
    let mut store = RootCertStore::empty();
    let mut reader = pem.as_slice();
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.map_err(|e| GatewayError::TlsSetup(format!("parsing {}: {e}", path.display())))?;
        store
            .add(cert)
            .map_err(|e| GatewayError::TlsSetup(format!("adding CA cert to pool: {e}")))?;
    }
    if store.is_empty() {
        return Err(GatewayError::TlsSetup(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(store)
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, GatewayError> {
    let pem = read_pem(path)?;
    let mut reader = pem.as_slice();
    rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GatewayError::TlsSetup(format!("parsing {}: {e}", path.display())))
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, GatewayError> {
    let pem = read_pem(path)?;
    let mut reader = pem.as_slice();
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| GatewayError::TlsSetup(format!("parsing {}: {e}", path.display())))?
        .ok_or_else(|| GatewayError::TlsSetup(format!("no private key found in {}", path.display())))
}
