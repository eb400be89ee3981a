//! # Hostname Normalization
//!
//! Hostnames are only ever stored and compared in their canonical ASCII
//! form: lowercase, with Unicode labels converted to IDNA Punycode
//! (`xn--...`). Anything that parses as an IP address is rejected, so an
//! address can never end up as a mapping key.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

/// Names that always resolve to [`LOCALHOST_ADDR`] and are never remapped.
pub const LOCALHOST_NAMES: [&str; 2] = ["localhost", "localhost.localdomain"];

pub const LOCALHOST_ADDR: Ipv4Addr = Ipv4Addr::LOCALHOST;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostnameError {
    #[error("hostname is empty")]
    Empty,
    #[error("invalid hostname {hostname:?}: host is IP address")]
    IsAddress { hostname: String },
    #[error("invalid hostname {hostname:?}: {reason}")]
    InvalidCharacters { hostname: String, reason: String },
}

impl HostnameError {
    /// The hostname exactly as it was given.
    pub fn hostname(&self) -> &str {
        match self {
            HostnameError::Empty => "",
            HostnameError::IsAddress { hostname } => hostname,
            HostnameError::InvalidCharacters { hostname, .. } => hostname,
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, HostnameError::IsAddress { .. })
    }
}

/// A validated hostname in canonical ASCII form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hostname(String);

impl Hostname {
    pub fn parse(raw: &str) -> Result<Self, HostnameError> {
        normalize(raw).map(Hostname)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved localhost names.
    pub fn is_localhost(&self) -> bool {
        LOCALHOST_NAMES.contains(&self.0.as_str())
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates `raw` and converts it to its canonical ASCII form.
pub fn normalize(raw: &str) -> Result<String, HostnameError> {
    if raw.is_empty() {
        return Err(HostnameError::Empty);
    }

    if raw.parse::<IpAddr>().is_ok() {
        return Err(HostnameError::IsAddress {
            hostname: raw.to_string(),
        });
    }

    idna::domain_to_ascii_strict(raw).map_err(|e| HostnameError::InvalidCharacters {
        hostname: raw.to_string(),
        reason: disallowed_char(raw)
            .map(|c| format!("disallowed character U+{:04X}", c as u32))
            .unwrap_or_else(|| e.to_string()),
    })
}

/// First ASCII character that can never appear in a hostname label.
fn disallowed_char(raw: &str) -> Option<char> {
    raw.chars()
        .find(|c| c.is_ascii() && !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
}
