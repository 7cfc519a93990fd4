//! The permission/audit store: a file-I/O-only external collaborator.
//! Named here only to define the interface the core could hand off to;
//! the fan-out core neither reads nor writes these files and nothing in
//! `session`/`fanout`/`mgmt_client` depends on this module.

pub mod store;

pub use store::{AuditStore, ConnectEvent, PermissionRecord};
