//! `host[:port]` parsing for resolution targets

use crate::models::ErrorKind;
use std::fmt;

/// A host plus the port its TLS endpoint listens on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    /// Parse `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6 literal.
    /// A missing port becomes `default_port`.
    pub fn parse(input: &str, default_port: u16) -> Result<Self, ErrorKind> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ErrorKind::other("empty hostname"));
        }

        if let Some(rest) = input.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| ErrorKind::other(format!("unterminated IPv6 literal: {}", input)))?;
            let port = match after {
                "" => default_port,
                _ => {
                    let port = after.strip_prefix(':').ok_or_else(|| {
                        ErrorKind::other(format!("unexpected text after IPv6 literal: {}", input))
                    })?;
                    parse_port(port)?
                }
            };
            return Self::build(host, port);
        }

        match input.matches(':').count() {
            0 => Self::build(input, default_port),
            1 => {
                let (host, port) = input.split_once(':').unwrap_or((input, ""));
                Self::build(host, parse_port(port)?)
            }
            // Unbracketed IPv6 address
            _ => Self::build(input, default_port),
        }
    }

    fn build(host: &str, port: u16) -> Result<Self, ErrorKind> {
        if host.is_empty() {
            return Err(ErrorKind::other("empty hostname"));
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

fn parse_port(port: &str) -> Result<u16, ErrorKind> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(ErrorKind::other(format!("invalid port: {:?}", port))),
        Ok(port) => Ok(port),
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
