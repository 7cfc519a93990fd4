//! The management-interface client: dials one loopback management port,
//! issues `status 2` or `kill <CN>`, and walks the noisy,
//! asynchronous-log-interleaved reply to extract what matters.
//!
//! Every failure here (dial refusal, dial timeout, read deadline,
//! stream close, malformed CSV) is absorbed. The worker contributes
//! nothing rather than propagating an error.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::protocol::common_name::UNDEF;
use crate::protocol::{ClientRecord, CommonName, Port};

/// Hard cap on establishing the TCP connection to a management port.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard cap on the whole southbound exchange, counted from the moment
/// the connection is established. Not a per-line timer.
pub const READ_DEADLINE: Duration = Duration::from_secs(3);

async fn dial(port: Port) -> std::io::Result<TcpStream> {
    let addr = (Ipv4Addr::LOCALHOST, port.get());
    match timeout(DIAL_TIMEOUT, TcpStream::connect(addr)).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "dial timeout",
        )),
    }
}

/// Issues `status 2` and returns every reachable, non-`UNDEF`
/// `ClientRecord`. Returns an empty vector on any failure.
pub async fn obtain_status(port: Port) -> Vec<ClientRecord> {
    match obtain_status_inner(port).await {
        Ok(records) => records,
        Err(e) => {
            debug!("[mgmt-client] status 127.0.0.1:{} failed: {}", port, e);
            Vec::new()
        }
    }
}

async fn obtain_status_inner(port: Port) -> std::io::Result<Vec<ClientRecord>> {
    let stream = dial(port).await?;
    let deadline = Instant::now() + READ_DEADLINE;
    let mut reader = BufReader::new(stream);
    reader.get_mut().write_all(b"status 2\n").await?;

    let mut records = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let mut line = String::new();
        let read = match timeout(remaining, reader.read_line(&mut line)).await {
            Ok(Ok(n)) => n,
            Ok(Err(_)) | Err(_) => break,
        };
        if read == 0 {
            // peer closed the stream
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with("END") {
            break;
        }
        if let Some(record) = parse_client_list_row(line) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Parses one `CLIENT_LIST,...` row. Returns `None` for any other line
/// (headers, routing table, global stats, `>`-prefixed async log), for
/// rows with too few fields to contain 1/3/4, and for `UNDEF` rows.
fn parse_client_list_row(line: &str) -> Option<ClientRecord> {
    if !line.starts_with("CLIENT_LIST") {
        return None;
    }
    let fields: Vec<&str> = line.split(',').collect();
    // 0=CLIENT_LIST 1=CommonName 2=RealAddress 3=VirtualIPv4 4=VirtualIPv6 ...
    if fields.len() < 5 {
        return None;
    }
    let common_name = fields[1];
    if common_name == UNDEF {
        return None;
    }
    Some(ClientRecord {
        common_name: common_name.to_string(),
        virtual_ipv4: fields[3].to_string(),
        virtual_ipv6: fields[4].to_string(),
    })
}

/// Issues `kill <CN>` for each name in order, waiting for a terminal
/// line per kill. Never reports counts back to the caller; the
/// controller protocol only surfaces a coarse `OK`.
pub async fn disconnect_client(port: Port, common_names: &[CommonName]) {
    if let Err(e) = disconnect_client_inner(port, common_names).await {
        debug!("[mgmt-client] kill 127.0.0.1:{} failed: {}", port, e);
    }
}

async fn disconnect_client_inner(
    port: Port,
    common_names: &[CommonName],
) -> std::io::Result<()> {
    let stream = dial(port).await?;
    let deadline = Instant::now() + READ_DEADLINE;
    let mut reader = BufReader::new(stream);

    for cn in common_names {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(());
        }
        reader
            .get_mut()
            .write_all(format!("kill {}\n", cn).as_bytes())
            .await?;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            let mut line = String::new();
            let read = match timeout(remaining, reader.read_line(&mut line)).await {
                Ok(Ok(n)) => n,
                Ok(Err(_)) | Err(_) => return Ok(()),
            };
            if read == 0 {
                return Ok(());
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.starts_with("SUCCESS: common name") || line.starts_with("ERROR: common name")
            {
                break;
            }
            warn!("[mgmt-client] discarding unrelated line from 127.0.0.1:{}: {}", port, line);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_list_row_keeping_fields_1_3_4() {
        let row = "CLIENT_LIST,edu,95.196.100.50:63410,10.0.0.2,f385::8fc1,0,0,since,0,user,cid,pid";
        let record = parse_client_list_row(row).unwrap();
        assert_eq!(record.common_name, "edu");
        assert_eq!(record.virtual_ipv4, "10.0.0.2");
        assert_eq!(record.virtual_ipv6, "f385::8fc1");
    }

    #[test]
    fn filters_undef_common_name() {
        let row = "CLIENT_LIST,UNDEF,1.2.3.4:5,,,,,,,,,";
        assert!(parse_client_list_row(row).is_none());
    }

    #[test]
    fn ignores_non_client_list_lines() {
        assert!(parse_client_list_row(">LOG: status 2....").is_none());
        assert!(parse_client_list_row("HEADER,CLIENT_LIST,.....").is_none());
        assert!(parse_client_list_row("ROUTING_TABLE,....").is_none());
    }

    #[test]
    fn ignores_short_rows() {
        assert!(parse_client_list_row("CLIENT_LIST,edu").is_none());
    }
}
