use std::net::IpAddr;

use lomap_common::network::hostname::HostnameError;
use lomap_core::Error;

use crate::utils::{HOSTS, HostsFixture};

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn lookup_unmap_lookup() {
    let fixture = HostsFixture::new(HOSTS);
    let mut hosts = fixture.hosts();

    assert_eq!(hosts.ip("example.test").unwrap(), Some(ip("127.75.38.138")));
    assert_eq!(hosts.map("example.test").unwrap(), ip("127.75.38.138"));
    assert_eq!(hosts.unmap("example.test").unwrap(), Some(ip("127.75.38.138")));
    assert_eq!(hosts.unmap("example.test").unwrap(), None);
    assert_eq!(hosts.ip("example.test").unwrap(), None);

    assert!(!fixture.contents().contains("example.test"));
    assert!(fixture.contents().starts_with("127.0.0.1 localhost localhost.localdomain\n"));
}

#[test]
fn map_twice_keeps_one_record() {
    let fixture = HostsFixture::new(HOSTS);
    let mut hosts = fixture.hosts();

    let first = hosts.map("twice.test").unwrap();
    let second = hosts.map("twice.test").unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.contents().matches("twice.test").count(), 1);
}

#[test]
fn map_then_unmap_returns_assigned_address() {
    let fixture = HostsFixture::new(HOSTS);
    let mut hosts = fixture.hosts();

    let assigned = hosts.map("roundtrip.test").unwrap();

    assert_eq!(hosts.unmap("roundtrip.test").unwrap(), Some(assigned));
    assert_eq!(hosts.ip("roundtrip.test").unwrap(), None);
    assert_eq!(fixture.contents(), HOSTS);
}

#[test]
fn unicode_and_punycode_are_the_same_key() {
    let fixture = HostsFixture::new(HOSTS);
    let mut hosts = fixture.hosts();

    let assigned = hosts.map("Hello世界").unwrap();

    assert_eq!(hosts.ip("Hello世界").unwrap(), Some(assigned));
    assert_eq!(hosts.ip("xn--hello-ck1hg65u").unwrap(), Some(assigned));
    assert!(fixture.contents().contains(" xn--hello-ck1hg65u\n"));

    assert_eq!(hosts.unmap("xn--hello-ck1hg65u").unwrap(), Some(assigned));
    assert_eq!(hosts.ip("Hello世界").unwrap(), None);
}

#[test]
fn localhost_is_protected() {
    let fixture = HostsFixture::new("10.0.0.1 localhost\n");
    let mut hosts = fixture.hosts();

    assert_eq!(hosts.ip("localhost").unwrap(), Some(ip("127.0.0.1")));
    assert_eq!(hosts.map("localhost").unwrap(), ip("127.0.0.1"));
    assert!(matches!(hosts.unmap("localhost"), Err(Error::CannotUnmapLocalhost)));
    assert_eq!(fixture.contents(), "10.0.0.1 localhost\n");
}

#[test]
fn invalid_hostnames_are_rejected() {
    let fixture = HostsFixture::new(HOSTS);
    let mut hosts = fixture.hosts();

    for name in ["foo bar", "foo_bar", "foo/bar", ""] {
        let err = hosts.map(name).unwrap_err();
        let hostname_err = err.hostname_error().expect("hostname error");
        assert_eq!(hostname_err.hostname(), name);
        assert!(!hostname_err.is_address());
    }

    let err = hosts.map("192.168.0.1").unwrap_err();
    assert_eq!(
        err.hostname_error(),
        Some(&HostnameError::IsAddress {
            hostname: "192.168.0.1".into()
        })
    );

    assert_eq!(fixture.contents(), HOSTS);
}

#[test]
fn missing_file_is_reported() {
    let fixture = HostsFixture::new(HOSTS);
    std::fs::remove_file(&fixture.path).unwrap();
    let mut hosts = fixture.hosts();

    let err = hosts.map("example.test").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("hosts"));
}

#[test]
fn unrelated_content_survives_changes() {
    let original = "\
# managed by hand
127.0.0.1 localhost

192.168.1.10 nas.lan   # NAS
garbage line here
";
    let fixture = HostsFixture::new(original);
    let mut hosts = fixture.hosts();

    let assigned = hosts.map("dev.test").unwrap();
    assert_eq!(fixture.contents(), format!("{original}{assigned} dev.test\n"));

    hosts.unmap("dev.test").unwrap();
    assert_eq!(fixture.contents(), original);
}
