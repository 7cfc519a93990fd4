//! The per-connection session state machine: reads one line, dispatches
//! it, writes the full reply, and only then reads the next line. Owns
//! the connection's mutable `PortSet` exclusively. No cross-session
//! sharing, no lock.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tracing::{debug, info, warn};

use crate::fanout;
use crate::protocol::{Command, ErrorReason, PortSet};

/// One controller connection's lifetime. Exclusively owned by the task
/// that drives it.
pub struct Session<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    ports: PortSet,
    peer: String,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: String) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Session {
            reader: BufReader::new(read_half),
            writer: write_half,
            ports: PortSet::empty(),
            peer,
        }
    }

    /// Drives the session to completion: `OPEN` until a read error/EOF
    /// or a successful `QUIT` transitions it to `CLOSED`.
    pub async fn run(mut self) {
        loop {
            let mut line = String::new();
            let read = match self.reader.read_line(&mut line).await {
                Ok(n) => n,
                Err(e) => {
                    debug!("[session {}] read error, closing: {}", self.peer, e);
                    return;
                }
            };
            if read == 0 {
                debug!("[session {}] controller closed the connection", self.peer);
                return;
            }
            let line = line.trim_end_matches(['\r', '\n']);

            let (reply, quit) = self.handle_line(line).await;
            if let Err(e) = self.write_reply(&reply).await {
                debug!("[session {}] write error, closing: {}", self.peer, e);
                return;
            }
            if quit {
                info!("[session {}] QUIT", self.peer);
                return;
            }
        }
    }

    /// Returns the full reply text (LF-terminated, possibly multi-line)
    /// and whether the session should close after writing it.
    async fn handle_line(&mut self, line: &str) -> (String, bool) {
        match crate::protocol::command::parse_line(line) {
            Err(reason) => (format_err(reason), false),
            Ok(Command::SetPorts(ports)) => {
                self.ports = PortSet::from_ports(ports);
                (String::from("OK: 0\n"), false)
            }
            Ok(Command::Disconnect(names)) => {
                fanout::disconnect(&self.ports, &names).await;
                (String::from("OK: 0\n"), false)
            }
            Ok(Command::List) => {
                let records = fanout::list(&self.ports).await;
                let mut reply = format!("OK: {}\n", records.len());
                for record in &records {
                    reply.push_str(&record.to_string());
                    reply.push('\n');
                }
                (reply, false)
            }
            Ok(Command::Quit) => (String::from("OK: 0\n"), true),
        }
    }

    async fn write_reply(&mut self, reply: &str) -> std::io::Result<()> {
        self.writer.write_all(reply.as_bytes()).await?;
        self.writer.flush().await
    }
}

fn format_err(reason: ErrorReason) -> String {
    let mut s = String::from("ERR: ");
    s.push_str(&reason.to_string());
    s.push('\n');
    s
}
