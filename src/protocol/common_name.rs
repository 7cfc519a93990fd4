//! The tunnel-identifying common name (CN), opaque to the daemon.

use std::fmt;

/// Sentinel CN the management dialect uses for a half-established
/// tunnel. Rows carrying it are filtered out of `LIST` results.
pub const UNDEF: &str = "UNDEF";

/// A validated common name: `[A-Za-z0-9.\-]+`, never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommonName(String);

impl CommonName {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
        {
            Some(CommonName(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alnum_dot_dash() {
        assert!(CommonName::parse("edu.client-01").is_some());
    }

    #[test]
    fn rejects_at_sign() {
        assert!(CommonName::parse("foo@daemon").is_none());
    }

    #[test]
    fn rejects_empty() {
        assert!(CommonName::parse("").is_none());
    }
}
