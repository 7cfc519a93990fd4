//! Validates and parses the four controller commands.

use std::fmt;

use super::common_name::CommonName;
use super::port::Port;

/// The closed set of reasons a recognized-or-not request can be rejected
/// with. These exact strings follow `ERR: ` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    /// Verb unrecognized, or recognized but the line doesn't match its
    /// grammar (e.g. trailing arguments on `LIST`/`QUIT`).
    NotSupported,
    /// Verb recognized but zero arguments where at least one is required.
    MissingParameter,
    /// A token failed its per-token validation.
    InvalidParameter,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorReason::NotSupported => "NOT_SUPPORTED",
            ErrorReason::MissingParameter => "MISSING_PARAMETER",
            ErrorReason::InvalidParameter => "INVALID_PARAMETER",
        };
        write!(f, "{}", s)
    }
}

/// A parsed, valid controller request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetPorts(Vec<Port>),
    Disconnect(Vec<CommonName>),
    List,
    Quit,
}

/// Parses one line (already stripped of its trailing `\n`) against the
/// anchored, whole-line grammar for `SET_PORTS`/`DISCONNECT`/`LIST`/
/// `QUIT`. Leading/trailing whitespace around tokens is tolerated via
/// `str::split_whitespace`.
pub fn parse_line(line: &str) -> Result<Command, ErrorReason> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next().ok_or(ErrorReason::NotSupported)?;
    let rest: Vec<&str> = tokens.collect();

    match verb {
        "SET_PORTS" => {
            if rest.is_empty() {
                return Err(ErrorReason::MissingParameter);
            }
            let mut ports = Vec::with_capacity(rest.len());
            for token in rest {
                let value: u16 = token.parse().map_err(|_| ErrorReason::InvalidParameter)?;
                let port = Port::new(value).ok_or(ErrorReason::InvalidParameter)?;
                ports.push(port);
            }
            Ok(Command::SetPorts(ports))
        }
        "DISCONNECT" => {
            if rest.is_empty() {
                return Err(ErrorReason::MissingParameter);
            }
            let mut names = Vec::with_capacity(rest.len());
            for token in rest {
                let cn = CommonName::parse(token).ok_or(ErrorReason::InvalidParameter)?;
                names.push(cn);
            }
            Ok(Command::Disconnect(names))
        }
        "LIST" => {
            if rest.is_empty() {
                Ok(Command::List)
            } else {
                Err(ErrorReason::NotSupported)
            }
        }
        "QUIT" => {
            if rest.is_empty() {
                Ok(Command::Quit)
            } else {
                Err(ErrorReason::NotSupported)
            }
        }
        _ => Err(ErrorReason::NotSupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(values: &[u16]) -> Vec<Port> {
        values.iter().map(|&v| Port::new(v).unwrap()).collect()
    }

    #[test]
    fn set_ports_collapses_duplicates_is_caller_responsibility() {
        // parse_line itself preserves order/duplicates; de-duplication is
        // PortSet's job (see port.rs), so SET_PORTS p1 p2 p1 parses to
        // three tokens here.
        let cmd = parse_line("SET_PORTS 11940 11941 11940").unwrap();
        assert_eq!(cmd, Command::SetPorts(ports(&[11940, 11941, 11940])));
    }

    #[test]
    fn set_ports_missing_parameter() {
        assert_eq!(parse_line("SET_PORTS"), Err(ErrorReason::MissingParameter));
    }

    #[test]
    fn set_ports_rejects_non_numeric() {
        assert_eq!(
            parse_line("SET_PORTS a b 11941"),
            Err(ErrorReason::InvalidParameter)
        );
    }

    #[test]
    fn set_ports_rejects_zero() {
        assert_eq!(
            parse_line("SET_PORTS 0"),
            Err(ErrorReason::InvalidParameter)
        );
    }

    #[test]
    fn set_ports_accepts_max_u16() {
        assert_eq!(
            parse_line("SET_PORTS 65535"),
            Ok(Command::SetPorts(ports(&[65535])))
        );
    }

    #[test]
    fn set_ports_rejects_above_max_u16() {
        assert_eq!(
            parse_line("SET_PORTS 65536"),
            Err(ErrorReason::InvalidParameter)
        );
    }

    #[test]
    fn unknown_verb_with_trailing_s() {
        assert_eq!(parse_line("SET_PORTSS 1"), Err(ErrorReason::NotSupported));
    }

    #[test]
    fn list_rejects_arguments() {
        assert_eq!(parse_line("LIST foo"), Err(ErrorReason::NotSupported));
    }

    #[test]
    fn list_exact() {
        assert_eq!(parse_line("LIST"), Ok(Command::List));
    }

    #[test]
    fn quit_exact() {
        assert_eq!(parse_line("QUIT"), Ok(Command::Quit));
    }

    #[test]
    fn quit_rejects_arguments() {
        assert_eq!(parse_line("QUIT now"), Err(ErrorReason::NotSupported));
    }

    #[test]
    fn disconnect_rejects_at_sign() {
        assert_eq!(
            parse_line("DISCONNECT foo@daemon"),
            Err(ErrorReason::InvalidParameter)
        );
    }

    #[test]
    fn disconnect_missing_parameter() {
        assert_eq!(
            parse_line("DISCONNECT"),
            Err(ErrorReason::MissingParameter)
        );
    }

    #[test]
    fn blank_line_is_not_supported() {
        assert_eq!(parse_line(""), Err(ErrorReason::NotSupported));
        assert_eq!(parse_line("   "), Err(ErrorReason::NotSupported));
    }
}
