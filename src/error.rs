//! Startup-failure error taxonomy. Only these failures are fatal: a bad
//! bind address, unreadable or malformed TLS material. Everything else
//! (session-level parse errors, southbound failures) is absorbed
//! locally and never reaches this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind listener on {0}: {1}")]
    Bind(String, #[source] std::io::Error),

    #[error("failed to read TLS material at {0}: {1}")]
    TlsIo(String, #[source] std::io::Error),

    #[error("TLS setup failed: {0}")]
    TlsSetup(String),
}
