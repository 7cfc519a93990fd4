use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tunnelgate::config::{Cli, Settings};
use tunnelgate::error::GatewayError;
use tunnelgate::{listener, tls};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging();

    let settings: Settings = Cli::parse().into();
    info!(
        "[main] starting tunnelgated, listen={} tls={}",
        settings.listen_addr, settings.enable_tls
    );

    let gateway_listener = if settings.enable_tls {
        let acceptor = tls::build_acceptor(
            &settings.ca_cert_path,
            &settings.server_cert_path,
            &settings.server_key_path,
        )?;
        listener::Listener::bind_tls(&settings.listen_addr, acceptor)
            .await
            .map_err(|e| GatewayError::Bind(settings.listen_addr.clone(), e))?
    } else {
        listener::Listener::bind_plain(&settings.listen_addr)
            .await
            .map_err(|e| GatewayError::Bind(settings.listen_addr.clone(), e))?
    };

    gateway_listener.serve().await.map_err(|e| {
        color_eyre::eyre::eyre!("controller listener loop exited unexpectedly: {e}")
    })?;

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
