//! The fan-out engine: for one controller request, launches one
//! concurrent worker per configured port, waits for all of them, and
//! aggregates.
//!
//! Modeled on `fantoch`'s `connect_to_all`/reader-to-workers channel
//! fan-in: each worker owns its port by value and reports back on a
//! single per-request channel sized to the number of workers, so the
//! engine drains exactly `|PortSet|` messages with no shared state.

use tokio::sync::mpsc;
use tracing::trace;

use crate::mgmt_client;
use crate::protocol::{ClientRecord, CommonName, PortSet};

/// Issues `status 2` to every port in `ports` and concatenates the
/// results. Order is unspecified. An empty `PortSet` returns
/// immediately with no rows.
pub async fn list(ports: &PortSet) -> Vec<ClientRecord> {
    if ports.is_empty() {
        return Vec::new();
    }

    let (tx, mut rx) = mpsc::channel::<Vec<ClientRecord>>(ports.len());
    for port in ports.iter() {
        let tx = tx.clone();
        tokio::spawn(async move {
            let records = mgmt_client::obtain_status(port).await;
            // the receiver only ever disappears if the engine has
            // already given up, which it never does before draining.
            let _ = tx.send(records).await;
        });
    }
    drop(tx);

    let mut aggregated = Vec::new();
    for _ in 0..ports.len() {
        if let Some(records) = rx.recv().await {
            aggregated.extend(records);
        }
    }
    trace!("[fan-out] LIST across {} port(s) -> {} row(s)", ports.len(), aggregated.len());
    aggregated
}

/// Issues `kill <cn>` for every name in `common_names` against every
/// port in `ports`, concurrently, and waits for all workers to finish.
/// No per-port result is propagated; the controller only ever learns
/// that the fan-out completed. An empty `PortSet` returns immediately.
pub async fn disconnect(ports: &PortSet, common_names: &[CommonName]) {
    if ports.is_empty() {
        return;
    }

    let (tx, mut rx) = mpsc::channel::<()>(ports.len());
    for port in ports.iter() {
        let tx = tx.clone();
        let common_names = common_names.to_vec();
        tokio::spawn(async move {
            mgmt_client::disconnect_client(port, &common_names).await;
            let _ = tx.send(()).await;
        });
    }
    drop(tx);

    for _ in 0..ports.len() {
        let _ = rx.recv().await;
    }
    trace!("[fan-out] DISCONNECT across {} port(s) complete", ports.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_on_empty_port_set_is_immediate() {
        let ports = PortSet::empty();
        let records = list(&ports).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn disconnect_on_empty_port_set_is_immediate() {
        let ports = PortSet::empty();
        disconnect(&ports, &[]).await;
    }
}
