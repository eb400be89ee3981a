//! # Hostname Mapping
//!
//! [`Hosts`] ties hostname normalization, the hosts file model and address
//! allocation together. Each operation reads the hosts file afresh, applies
//! at most one change and writes the file back only if something changed.
//!
//! ```no_run
//! use lomap_common::config::Config;
//! use lomap_core::Hosts;
//!
//! let mut hosts = Hosts::new(Config::with_hosts_file("/etc/hosts"));
//! let ip = hosts.map("example.test")?;
//! assert_eq!(hosts.ip("example.test")?, Some(ip));
//! # Ok::<(), lomap_core::Error>(())
//! ```

use std::net::{IpAddr, Ipv4Addr};

use tracing::debug;

use lomap_common::config::Config;
use lomap_common::network::hostname::{Hostname, LOCALHOST_ADDR};

use crate::alias;
use crate::allocator;
use crate::error::{Error, Result};
use crate::hosts_file::HostsFile;
use crate::random::{RandomSource, SystemRandom};

pub struct Hosts {
    config: Config,
    random: Box<dyn RandomSource>,
}

impl Hosts {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            random: Box::new(SystemRandom),
        }
    }

    /// Replaces the generator used to draw addresses.
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Returns a random unassigned address from the configured block without
    /// mapping it.
    pub fn random_ip(&mut self) -> Result<Ipv4Addr> {
        let file = self.open()?;
        self.allocate(&file)
    }

    /// Maps `hostname` to a random unassigned address and returns it. A
    /// hostname that is already mapped keeps its address.
    pub fn map(&mut self, hostname: &str) -> Result<IpAddr> {
        let hostname = Hostname::parse(hostname)?;
        if hostname.is_localhost() {
            return Ok(IpAddr::V4(LOCALHOST_ADDR));
        }

        let mut file = self.open()?;
        if let Some(ip) = file.ip(&hostname) {
            debug!("{hostname} is already mapped to {ip}");
            return Ok(ip);
        }

        let ip = IpAddr::V4(self.allocate(&file)?);
        file.map(&hostname, ip);
        self.commit(&mut file)?;

        if self.config.manage_aliases {
            alias::ensure(ip)?;
        }
        Ok(ip)
    }

    /// Removes the mapping for `hostname` and returns the address it had, or
    /// `None` if it was not mapped.
    pub fn unmap(&mut self, hostname: &str) -> Result<Option<IpAddr>> {
        let hostname = Hostname::parse(hostname)?;
        if hostname.is_localhost() {
            return Err(Error::CannotUnmapLocalhost);
        }

        let mut file = self.open()?;
        let Some(ip) = file.unmap(&hostname) else {
            debug!("{hostname} is not mapped");
            return Ok(None);
        };
        self.commit(&mut file)?;

        if self.config.manage_aliases && !file.has_ip(ip) {
            alias::remove(ip)?;
        }
        Ok(Some(ip))
    }

    /// Looks up the address mapped to `hostname`. Never modifies the file.
    pub fn ip(&self, hostname: &str) -> Result<Option<IpAddr>> {
        let hostname = Hostname::parse(hostname)?;
        if hostname.is_localhost() {
            return Ok(Some(IpAddr::V4(LOCALHOST_ADDR)));
        }

        let ip = self.open()?.ip(&hostname);
        if let Some(ip) = ip {
            if self.config.manage_aliases {
                alias::ensure(ip)?;
            }
        }
        Ok(ip)
    }

    fn open(&self) -> Result<HostsFile> {
        HostsFile::open(&self.config.hosts_file)
    }

    fn allocate(&mut self, file: &HostsFile) -> Result<Ipv4Addr> {
        let existing = file.records().map(|r| r.address);
        allocator::allocate(&self.config.block, existing, self.random.as_mut())
    }

    fn commit(&self, file: &mut HostsFile) -> Result<()> {
        let backup = self.config.backup.then(|| self.config.backup_file());
        file.save(backup.as_deref())
    }
}
