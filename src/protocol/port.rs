//! Management port numbers and the per-session set of them.

use std::collections::BTreeSet;
use std::fmt;

/// A TCP port in `[1, 65535]`. `0` is never a valid `Port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(u16);

impl Port {
    pub fn new(value: u16) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Port(value))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-scoped, mutable, ordered, duplicate-free set of management
/// ports. Replaced wholesale by a successful `SET_PORTS`; never mutated
/// in place while a fan-out is in flight (see session.rs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSet(BTreeSet<Port>);

impl PortSet {
    pub fn empty() -> Self {
        PortSet(BTreeSet::new())
    }

    /// Builds a `PortSet` from parsed ports, collapsing duplicates.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        PortSet(ports.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.0.iter().copied()
    }
}
