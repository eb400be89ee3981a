//! # Address Allocation
//!
//! Draws an unused address from an [`AddressBlock`] by rejection sampling
//! against the addresses already present in a hosts file.
//!
//! Sampling is capped at [`MAX_DRAWS`]. Past the cap the block is scanned
//! linearly from a random starting point, so allocation terminates even when
//! the file holds duplicate or otherwise inconsistent entries.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};

use tracing::debug;

use lomap_common::network::block::AddressBlock;
use lomap_common::network::hostname::LOCALHOST_ADDR;
use lomap_common::network::range::Ipv4Range;

use crate::error::{Error, Result};
use crate::random::RandomSource;

/// Random draws attempted before falling back to a linear scan.
pub const MAX_DRAWS: u32 = 4096;

/// Picks an address in `block` that is not in `existing`.
///
/// `127.0.0.1` is always treated as taken when the block contains it.
pub fn allocate<I>(
    block: &AddressBlock,
    existing: I,
    random: &mut dyn RandomSource,
) -> Result<Ipv4Addr>
where
    I: IntoIterator<Item = IpAddr>,
{
    let range: Ipv4Range = block.usable_range()?;
    let taken: HashSet<Ipv4Addr> = taken_addresses(block, existing);

    let occupied = taken.iter().filter(|addr| range.contains(**addr)).count() as u64;
    if occupied >= range.len() {
        return Err(Error::BlockExhausted(*block));
    }

    // usable_range never spans more than 2^32 - 2 addresses.
    let span = range.len() as u32;

    for _ in 0..MAX_DRAWS {
        let offset = random.below(span);
        match range.nth(offset) {
            Some(candidate) if !taken.contains(&candidate) => return Ok(candidate),
            _ => continue,
        }
    }

    debug!("{MAX_DRAWS} draws in {block} were all taken, scanning");
    scan(&range, span, &taken, random).ok_or(Error::BlockExhausted(*block))
}

fn taken_addresses<I>(block: &AddressBlock, existing: I) -> HashSet<Ipv4Addr>
where
    I: IntoIterator<Item = IpAddr>,
{
    let mut taken: HashSet<Ipv4Addr> = existing
        .into_iter()
        .filter_map(|addr| match addr {
            IpAddr::V4(v4) if block.contains(v4) => Some(v4),
            _ => None,
        })
        .collect();

    if block.contains(LOCALHOST_ADDR) {
        taken.insert(LOCALHOST_ADDR);
    }
    taken
}

fn scan(
    range: &Ipv4Range,
    span: u32,
    taken: &HashSet<Ipv4Addr>,
    random: &mut dyn RandomSource,
) -> Option<Ipv4Addr> {
    let start = u64::from(random.below(span));
    let span = u64::from(span);

    (0..span)
        .map(|i| ((start + i) % span) as u32)
        .filter_map(|offset| range.nth(offset))
        .find(|candidate| !taken.contains(candidate))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
