//! # Address Blocks
//!
//! CIDR blocks that loopback addresses are drawn from, and the arithmetic
//! that turns a block into the span of addresses eligible for allocation.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;
use thiserror::Error;

use crate::network::range::Ipv4Range;

/// Largest prefix length that still leaves room for an allocation.
pub const MAX_PREFIX: u8 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("invalid CIDR address: {0}")]
    Invalid(String),
    #[error("address block too small: {0}")]
    TooSmall(AddressBlock),
}

/// An IPv4 CIDR block, always stored with its host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressBlock {
    network: Ipv4Addr,
    prefix: u8,
}

impl AddressBlock {
    /// `127.0.0.0/8`, the whole loopback space.
    pub const LOOPBACK: AddressBlock = AddressBlock {
        network: Ipv4Addr::new(127, 0, 0, 0),
        prefix: 8,
    };

    pub fn new(ip: Ipv4Addr, prefix: u8) -> Result<Self, BlockError> {
        let net = Ipv4Network::new(ip, prefix)
            .map_err(|e| BlockError::Invalid(format!("{ip}/{prefix}: {e}")))?;

        Ok(Self {
            network: net.network(),
            prefix: net.prefix(),
        })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Total number of addresses covered by the block.
    pub fn host_count(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        Ipv4Network::new(self.network, self.prefix).is_ok_and(|net| net.contains(addr))
    }

    /// Addresses eligible for allocation.
    ///
    /// The span excludes the network and broadcast addresses, so for
    /// `127.0.0.0/8` it is `127.0.0.1 - 127.255.255.254`.
    pub fn usable_range(&self) -> Result<Ipv4Range, BlockError> {
        if self.prefix > MAX_PREFIX {
            return Err(BlockError::TooSmall(*self));
        }

        let min: u64 = u64::from(u32::from(self.network)) + 1;
        let max: u64 = min + self.host_count() - 3;

        // Both ends stay below 2^32 for every prefix up to MAX_PREFIX.
        Ok(Ipv4Range::new(
            Ipv4Addr::from(min as u32),
            Ipv4Addr::from(max as u32),
        ))
    }
}

impl Default for AddressBlock {
    fn default() -> Self {
        Self::LOOPBACK
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for AddressBlock {
    type Err = BlockError;

    /// Parses CIDR notation like "127.0.0.0/8". A bare address is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((ip_str, prefix_str)) = s.trim().split_once('/') else {
            return Err(BlockError::Invalid(s.to_string()));
        };

        let ip = ip_str
            .parse::<Ipv4Addr>()
            .map_err(|_| BlockError::Invalid(s.to_string()))?;

        let prefix = prefix_str
            .parse::<u8>()
            .map_err(|_| BlockError::Invalid(s.to_string()))?;

        Self::new(ip, prefix)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
