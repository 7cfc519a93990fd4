//! One connected tunnel as reported by a management port.

use std::fmt;

/// `(commonName, virtualIPv4, virtualIPv6)`, per-request and short-lived.
/// The `UNDEF` sentinel common name is filtered out before a `ClientRecord`
/// is ever constructed (see mgmt_client.rs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub common_name: String,
    pub virtual_ipv4: String,
    pub virtual_ipv6: String,
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.common_name, self.virtual_ipv4, self.virtual_ipv6
        )
    }
}
