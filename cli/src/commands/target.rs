//! # Command Target
//!
//! The positional argument: a hostname with an optional `:PORT` suffix.
//! The port is not interpreted, only carried through to the output so that
//! `lomap example.test:8080` prints an address ready to connect to.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub hostname: String,
    pub port: Option<u16>,
}

impl Target {
    /// Joins `ip` with the port, if one was given.
    pub fn with_address(&self, ip: IpAddr) -> String {
        match self.port {
            Some(port) => SocketAddr::new(ip, port).to_string(),
            None => ip.to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) if self.hostname.contains(':') => write!(f, "[{}]:{port}", self.hostname),
            Some(port) => write!(f, "{}:{port}", self.hostname),
            None => f.write_str(&self.hostname),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    /// Accepted forms:
    /// * `host`
    /// * `host:port`
    /// * `[v6-address]:port`
    ///
    /// Anything else containing colons (a bare IPv6 address) is taken as
    /// the hostname as a whole.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix('[') {
            let Some((host, port)) = rest.split_once("]:") else {
                return Err(format!("invalid target: {s}"));
            };
            return Ok(Target {
                hostname: host.to_string(),
                port: Some(parse_port(port)?),
            });
        }

        match s.split_once(':') {
            Some((host, port)) if !port.contains(':') => Ok(Target {
                hostname: host.to_string(),
                port: Some(parse_port(port)?),
            }),
            _ => Ok(Target {
                hostname: s.to_string(),
                port: None,
            }),
        }
    }
}

fn parse_port(s: &str) -> Result<u16, String> {
    s.parse::<u16>()
        .map_err(|e| format!("Invalid port '{s}': {e}"))
}
