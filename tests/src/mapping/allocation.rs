use std::collections::HashSet;
use std::net::IpAddr;

use lomap_common::config::Config;
use lomap_common::network::block::AddressBlock;
use lomap_core::{Error, Hosts};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::utils::{HOSTS, HostsFixture};

#[test]
fn random_ip_leaves_file_alone() {
    let fixture = HostsFixture::new(HOSTS);
    let mut hosts = fixture.hosts();

    for _ in 0..3 {
        let ip = hosts.random_ip().unwrap();
        assert!(ip.is_loopback());
        assert_ne!(ip.octets(), [127, 0, 0, 1]);
    }
    assert_eq!(fixture.contents(), HOSTS);
}

#[test]
fn seeded_runs_are_reproducible() {
    let a = HostsFixture::new(HOSTS);
    let b = HostsFixture::new(HOSTS);

    let from_a: Vec<IpAddr> = (0..5)
        .map(|i| a.hosts().map(&format!("host{i}.test")).unwrap())
        .collect();
    let from_b: Vec<IpAddr> = (0..5)
        .map(|i| b.hosts().map(&format!("host{i}.test")).unwrap())
        .collect();

    assert_eq!(from_a, from_b);
}

#[test]
fn allocations_never_collide() {
    let fixture = HostsFixture::new(HOSTS);
    let config = Config {
        block: "127.0.0.0/26".parse::<AddressBlock>().unwrap(),
        ..fixture.config()
    };
    let mut hosts = Hosts::new(config).with_random(StdRng::seed_from_u64(7));

    let preexisting: HashSet<IpAddr> =
        ["127.0.0.1", "127.0.0.2"].iter().map(|s| s.parse().unwrap()).collect();
    let mut seen: HashSet<IpAddr> = HashSet::new();

    // /26 has 62 usable addresses; localhost and localhost2 hold two.
    for i in 0..60 {
        let ip = hosts.map(&format!("n{i}.test")).unwrap();
        assert!(!preexisting.contains(&ip), "{ip} was already in the file");
        assert!(seen.insert(ip), "{ip} was handed out twice");
    }

    assert!(matches!(
        hosts.map("one-too-many.test"),
        Err(Error::BlockExhausted(_))
    ));
}

#[test]
fn smallest_block_exhausts() {
    let fixture = HostsFixture::new("127.0.0.1 localhost\n");
    let config = Config {
        block: "127.0.0.0/30".parse::<AddressBlock>().unwrap(),
        ..fixture.config()
    };
    let mut hosts = Hosts::new(config).with_random(StdRng::seed_from_u64(1));

    assert_eq!(hosts.map("only.test").unwrap(), "127.0.0.2".parse::<IpAddr>().unwrap());
    assert!(matches!(hosts.random_ip(), Err(Error::BlockExhausted(_))));
}

#[test]
fn block_too_small() {
    let fixture = HostsFixture::new(HOSTS);
    let config = Config {
        block: "127.0.0.0/31".parse::<AddressBlock>().unwrap(),
        ..fixture.config()
    };
    let mut hosts = Hosts::new(config);

    assert!(hosts.random_ip().unwrap_err().is_block_too_small());
}

#[test]
fn duplicate_addresses_in_file_do_not_hang() {
    // 127.0.0.3 is listed twice but occupies a single slot.
    let fixture = HostsFixture::new("127.0.0.3 a.test\n127.0.0.3 b.test\n127.0.0.1 localhost\n");
    let config = Config {
        block: "127.0.0.0/29".parse::<AddressBlock>().unwrap(),
        ..fixture.config()
    };
    let mut hosts = Hosts::new(config).with_random(StdRng::seed_from_u64(3));

    let mut assigned = HashSet::new();
    for i in 0..4 {
        assigned.insert(hosts.map(&format!("d{i}.test")).unwrap());
    }
    assert_eq!(assigned.len(), 4);
    assert!(matches!(hosts.map("full.test"), Err(Error::BlockExhausted(_))));
}
