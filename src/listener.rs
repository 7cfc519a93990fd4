//! Listener / TLS front-end: accepts controller connections and hands
//! each to its own independent session task. The accept loop is
//! infinite; a transient accept error is logged and never kills the
//! loop.

use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{info, warn};

use crate::session::Session;

pub enum Listener {
    Plain(TcpListener),
    Tls(TcpListener, TlsAcceptor),
}

impl Listener {
    pub async fn bind_plain(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Listener::Plain(listener))
    }

    pub async fn bind_tls(addr: &str, acceptor: TlsAcceptor) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Listener::Tls(listener, acceptor))
    }

    /// Runs the accept loop. Only returns on a fatal listener error;
    /// per-connection failures never propagate out of here.
    pub async fn serve(self) -> std::io::Result<()> {
        match self {
            Listener::Plain(listener) => serve_plain(listener).await,
            Listener::Tls(listener, acceptor) => serve_tls(listener, acceptor).await,
        }
    }
}

async fn serve_plain(listener: TcpListener) -> std::io::Result<()> {
    info!(
        "[listener] accepting plaintext controller connections on {}",
        listener.local_addr()?
    );
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                tokio::spawn(async move {
                    Session::new(stream, addr.to_string()).run().await;
                });
            }
            Err(e) => warn!("[listener] accept error: {}", e),
        }
    }
}

async fn serve_tls(listener: TcpListener, acceptor: TlsAcceptor) -> std::io::Result<()> {
    info!(
        "[listener] accepting mTLS controller connections on {}",
        listener.local_addr()?
    );
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("[listener] accept error: {}", e);
                continue;
            }
        };
        let acceptor = acceptor.clone();
        tokio::spawn(async move {
            match acceptor.accept(stream).await {
                Ok(tls_stream) => {
                    Session::new(tls_stream, addr.to_string()).run().await;
                }
                Err(e) => warn!("[listener] TLS handshake with {} failed: {}", addr, e),
            }
        });
    }
}
