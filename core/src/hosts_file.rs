//! # Hosts File Model
//!
//! In-memory representation of a hosts file
//! (`ADDRESS HOSTNAME [HOSTNAME...] [# comment]`).
//!
//! Every line of the source is kept. Comments, blank lines, lines that are
//! not valid UTF-8 and lines whose address cannot be parsed are carried
//! through byte for byte; address lines become [`Record`]s. Records that are
//! never touched are written back exactly as they were read.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use lomap_common::network::hostname::Hostname;

use crate::error::{Error, Result};
use crate::storage;

/// A line whose address field is not a valid IP address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: invalid address {address:?}")]
pub struct ParseError {
    /// One-based line number.
    pub line: usize,
    pub address: String,
}

/// One address line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub address: IpAddr,
    pub hostnames: Vec<String>,
    pub comment: Option<String>,
}

impl Record {
    /// Hostnames in the file are matched without regard to ASCII case.
    pub fn has_hostname(&self, hostname: &Hostname) -> bool {
        self.hostnames
            .iter()
            .any(|h| h.eq_ignore_ascii_case(hostname.as_str()))
    }

    fn render(&self, zone: Option<&str>) -> String {
        let mut line = self.address.to_string();
        if let Some(zone) = zone {
            line.push('%');
            line.push_str(zone);
        }
        for hostname in &self.hostnames {
            line.push(' ');
            line.push_str(hostname);
        }
        if let Some(comment) = &self.comment {
            line.push_str(" #");
            line.push_str(comment);
        }
        line
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Opaque(Vec<u8>),
    Record {
        record: Record,
        /// Scope of a link-local address (`fe80::1%lo0`).
        zone: Option<String>,
        /// Source text, dropped once the record is modified.
        source: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
    entries: Vec<Entry>,
    parse_errors: Vec<ParseError>,
    changed: bool,
}

impl HostsFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| Error::io(path, e))?;

        let file = Self::parse(path, contents);
        debug!(
            "Read {} records from {}",
            file.records().count(),
            path.display()
        );
        Ok(file)
    }

    /// Parses hosts file contents. Never fails: unparseable lines are kept
    /// verbatim and reported through [`HostsFile::parse_errors`].
    pub fn parse(path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Self {
        let mut entries = Vec::new();
        let mut parse_errors = Vec::new();

        for (idx, line) in split_lines(contents.as_ref()).into_iter().enumerate() {
            let Ok(text) = std::str::from_utf8(line) else {
                debug!("Keeping line {} verbatim: not valid UTF-8", idx + 1);
                entries.push(Entry::Opaque(line.to_vec()));
                continue;
            };

            match parse_line(text) {
                Ok(Some((record, zone))) => entries.push(Entry::Record {
                    record,
                    zone,
                    source: Some(text.to_string()),
                }),
                Ok(None) => entries.push(Entry::Opaque(line.to_vec())),
                Err(address) => {
                    let err = ParseError {
                        line: idx + 1,
                        address,
                    };
                    warn!("Keeping unparsed hosts entry: {err}");
                    parse_errors.push(err);
                    entries.push(Entry::Opaque(line.to_vec()));
                }
            }
        }

        Self {
            path: path.into(),
            entries,
            parse_errors,
            changed: false,
        }
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }

    /// True once a mapping has been added or removed.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Records that carry at least one hostname, in file order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Record { record, .. } if !record.hostnames.is_empty() => Some(record),
            _ => None,
        })
    }

    pub fn has_ip(&self, address: IpAddr) -> bool {
        self.records().any(|r| r.address == address)
    }

    /// Address of the first record holding `hostname`.
    pub fn ip(&self, hostname: &Hostname) -> Option<IpAddr> {
        self.records()
            .find(|r| r.has_hostname(hostname))
            .map(|r| r.address)
    }

    /// Binds `hostname` to `address`, joining an existing record for the
    /// address when there is one. Existing bindings of `hostname` are left
    /// alone.
    pub fn map(&mut self, hostname: &Hostname, address: IpAddr) {
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Record { record, source, .. } if record.address == address => {
                Some((record, source))
            }
            _ => None,
        });

        match existing {
            Some((record, source)) => {
                if !record.has_hostname(hostname) {
                    record.hostnames.push(hostname.to_string());
                    *source = None;
                }
            }
            None => self.entries.push(Entry::Record {
                record: Record {
                    address,
                    hostnames: vec![hostname.to_string()],
                    comment: None,
                },
                zone: None,
                source: None,
            }),
        }

        self.changed = true;
        debug!("Mapped {hostname} to {address}");
    }

    /// Removes `hostname` from every record holding it. Records left without
    /// hostnames are dropped. Returns the address it was mapped to first.
    pub fn unmap(&mut self, hostname: &Hostname) -> Option<IpAddr> {
        let mut removed = None;

        for entry in self.entries.iter_mut() {
            let Entry::Record { record, source, .. } = entry else {
                continue;
            };
            let before = record.hostnames.len();
            record
                .hostnames
                .retain(|h| !h.eq_ignore_ascii_case(hostname.as_str()));

            if record.hostnames.len() != before {
                removed.get_or_insert(record.address);
                *source = None;
            }
        }

        if removed.is_some() {
            self.entries.retain(|entry| match entry {
                Entry::Record { record, source, .. } => {
                    source.is_some() || !record.hostnames.is_empty()
                }
                Entry::Opaque(_) => true,
            });
            self.changed = true;
            debug!("Unmapped {hostname}");
        }

        removed
    }

    /// Serializes every entry, one per line, each ending in `\n`.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Opaque(line) => out.extend_from_slice(line),
                Entry::Record {
                    source: Some(line), ..
                } => out.extend_from_slice(line.as_bytes()),
                Entry::Record { record, zone, .. } => {
                    out.extend_from_slice(record.render(zone.as_deref()).as_bytes())
                }
            }
            out.push(b'\n');
        }
        out
    }

    /// Writes the file back if anything changed, optionally copying the
    /// previous version to `backup` first.
    pub fn save(&mut self, backup: Option<&Path>) -> Result<()> {
        if !self.changed {
            debug!("No changes to {}", self.path.display());
            return Ok(());
        }

        if let Some(backup) = backup {
            storage::backup(&self.path, backup)?;
        }
        storage::write_atomic(&self.path, &self.render())?;
        self.changed = false;
        Ok(())
    }
}

/// Splits on `\n` and drops a trailing `\r`, the way [`str::lines`] does.
fn split_lines(contents: &[u8]) -> Vec<&[u8]> {
    if contents.is_empty() {
        return Vec::new();
    }

    let body = contents.strip_suffix(b"\n").unwrap_or(contents);
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

/// `Ok(None)` for blank and comment lines, `Err` with the offending token
/// when the address does not parse. A zone suffix is only accepted on IPv6
/// addresses.
fn parse_line(line: &str) -> std::result::Result<Option<(Record, Option<String>)>, String> {
    let (data, comment) = match line.split_once('#') {
        Some((data, comment)) => (data, Some(comment.to_string())),
        None => (line, None),
    };

    let mut fields = data.split_whitespace();
    let Some(token) = fields.next() else {
        return Ok(None);
    };

    let (address, zone) = match token.split_once('%') {
        Some((address, zone)) => (address, Some(zone.to_string())),
        None => (token, None),
    };
    let address = match address.parse::<IpAddr>() {
        Ok(ip) if zone.is_none() || ip.is_ipv6() => ip,
        _ => return Err(token.to_string()),
    };

    let record = Record {
        address,
        hostnames: fields.map(str::to_string).collect(),
        comment,
    };
    Ok(Some((record, zone)))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
