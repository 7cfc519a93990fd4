//! Per-identity permission files and per-connect/disconnect event logs,
//! persisted as JSON under a configured base directory:
//!
//! - `data/c/<CN>` (`{"Version":1,"ProfileList":[...]}`)
//! - `log/<ipv4>/<unixTime>` (one JSON event record)
//!
//! This is deliberately thin: plain file I/O, no caching, no indexing.
//! It's an optional collaborator the daemon process may host alongside
//! the core, never a dependency of it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionRecord {
    #[serde(rename = "Version")]
    pub version: u32,
    #[serde(rename = "ProfileList")]
    pub profile_list: Vec<String>,
}

impl Default for PermissionRecord {
    fn default() -> Self {
        PermissionRecord {
            version: 1,
            profile_list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Connect,
    Disconnect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectEvent {
    pub common_name: String,
    pub virtual_ipv4: String,
    pub kind: EventKind,
    pub unix_time: u64,
}

#[derive(Debug, Clone)]
pub struct AuditStore {
    base_dir: PathBuf,
}

impl AuditStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        AuditStore {
            base_dir: base_dir.into(),
        }
    }

    fn permission_path(&self, common_name: &str) -> PathBuf {
        self.base_dir.join("data").join("c").join(common_name)
    }

    fn event_path(&self, ipv4: &str, unix_time: u64) -> PathBuf {
        self.base_dir.join("log").join(ipv4).join(unix_time.to_string())
    }

    pub async fn write_permissions(
        &self,
        common_name: &str,
        record: &PermissionRecord,
    ) -> io::Result<()> {
        let path = self.permission_path(common_name);
        write_json(&path, record).await
    }

    pub async fn read_permissions(
        &self,
        common_name: &str,
    ) -> io::Result<Option<PermissionRecord>> {
        let path = self.permission_path(common_name);
        match fs::read(&path).await {
            Ok(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn log_event(&self, event: &ConnectEvent) -> io::Result<()> {
        let path = self.event_path(&event.virtual_ipv4, event.unix_time);
        write_json(&path, event).await
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec(value).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_permission_record() {
        let dir = std::env::temp_dir().join(format!("tunnelgate-audit-test-{}", std::process::id()));
        let store = AuditStore::new(&dir);
        let record = PermissionRecord {
            version: 1,
            profile_list: vec!["default".to_string()],
        };
        store.write_permissions("edu.client-01", &record).await.unwrap();
        let read_back = store.read_permissions("edu.client-01").await.unwrap();
        assert_eq!(read_back, Some(record));
        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_permission_file_is_none() {
        let dir = std::env::temp_dir().join(format!("tunnelgate-audit-test-missing-{}", std::process::id()));
        let store = AuditStore::new(&dir);
        assert_eq!(store.read_permissions("nobody").await.unwrap(), None);
    }
}
