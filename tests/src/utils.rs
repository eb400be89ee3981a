use std::fs;
use std::path::PathBuf;

use lomap_common::config::Config;
use lomap_core::Hosts;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

pub const HOSTS: &str = "\
127.0.0.1 localhost localhost.localdomain
127.0.0.2 localhost2
127.75.38.138 example.test
";

/// A hosts file in a scratch directory, removed on drop.
pub struct HostsFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl HostsFixture {
    pub fn new(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("creating scratch directory");
        let path = dir.path().join("hosts");
        fs::write(&path, contents).expect("writing hosts file");
        Self { _dir: dir, path }
    }

    pub fn config(&self) -> Config {
        Config {
            manage_aliases: false,
            ..Config::with_hosts_file(&self.path)
        }
    }

    /// Hosts handle with a seeded generator, so runs are reproducible.
    pub fn hosts(&self) -> Hosts {
        Hosts::new(self.config()).with_random(StdRng::seed_from_u64(1))
    }

    pub fn contents(&self) -> String {
        fs::read_to_string(&self.path).expect("reading hosts file")
    }
}
