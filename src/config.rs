//! CLI surface and the settings derived from it.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:41194";
pub const DEFAULT_TLS_CERT_DIR: &str = ".";
pub const DEFAULT_TLS_KEY_DIR: &str = ".";
pub const CA_CERT_FILENAME: &str = "ca.crt";
pub const SERVER_CERT_FILENAME: &str = "server.crt";
pub const SERVER_KEY_FILENAME: &str = "server.key";

/// The two flags an operator sets day to day: `--listen` and
/// `--enable-tls`. The TLS material directories are
/// compile-time-configurable defaults (`.`/`.`, matching the original
/// `tlsCertDir`/`tlsKeyDir` package vars); these extra flags only let an
/// operator override the default, they don't replace it.
#[derive(Debug, Parser)]
#[command(
    name = "tunnelgated",
    about = "Aggregation gateway in front of a pool of VPN management interfaces"
)]
pub struct Cli {
    /// IP:port to listen on.
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Require mutually-authenticated TLS on the controller listener.
    #[arg(long)]
    pub enable_tls: bool,

    /// Directory holding ca.crt and server.crt.
    #[arg(long, default_value = DEFAULT_TLS_CERT_DIR)]
    pub tls_cert_dir: PathBuf,

    /// Directory holding server.key.
    #[arg(long, default_value = DEFAULT_TLS_KEY_DIR)]
    pub tls_key_dir: PathBuf,

    /// Base directory for the optional permission/audit store.
    /// Absent by default: the store is out of scope for the core.
    #[arg(long)]
    pub audit_base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub listen_addr: String,
    pub enable_tls: bool,
    pub ca_cert_path: PathBuf,
    pub server_cert_path: PathBuf,
    pub server_key_path: PathBuf,
    pub audit_base_dir: Option<PathBuf>,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            listen_addr: cli.listen,
            enable_tls: cli.enable_tls,
            ca_cert_path: cli.tls_cert_dir.join(CA_CERT_FILENAME),
            server_cert_path: cli.tls_cert_dir.join(SERVER_CERT_FILENAME),
            server_key_path: cli.tls_key_dir.join(SERVER_KEY_FILENAME),
            audit_base_dir: cli.audit_base_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listen_address() {
        let cli = Cli::parse_from(["tunnelgated"]);
        assert_eq!(cli.listen, DEFAULT_LISTEN_ADDR);
        assert!(!cli.enable_tls);
    }

    #[test]
    fn settings_join_cert_paths_under_cert_dir() {
        let cli = Cli::parse_from(["tunnelgated", "--tls-cert-dir", "/etc/tunnelgate"]);
        let settings: Settings = cli.into();
        assert_eq!(
            settings.ca_cert_path,
            PathBuf::from("/etc/tunnelgate/ca.crt")
        );
        assert_eq!(
            settings.server_cert_path,
            PathBuf::from("/etc/tunnelgate/server.crt")
        );
    }
}
