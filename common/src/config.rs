use std::path::PathBuf;

use crate::network::block::AddressBlock;

/// Suffix appended to the hosts file path when keeping a backup.
pub const BACKUP_SUFFIX: &str = ".lomap-old";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hosts file that mappings are read from and written to.
    pub hosts_file: PathBuf,
    /// Block that new addresses are drawn from.
    pub block: AddressBlock,
    /// Copy the previous hosts file to `<hosts_file>.lomap-old` before
    /// replacing it.
    pub backup: bool,
    /// Add and remove `lo0` aliases for mapped addresses.
    ///
    /// Only has an effect on macOS, where loopback addresses other than
    /// 127.0.0.1 are not routed until aliased.
    pub manage_aliases: bool,
}

impl Config {
    pub fn with_hosts_file(hosts_file: impl Into<PathBuf>) -> Self {
        Self {
            hosts_file: hosts_file.into(),
            ..Self::default()
        }
    }

    pub fn backup_file(&self) -> PathBuf {
        let mut path = self.hosts_file.clone().into_os_string();
        path.push(BACKUP_SUFFIX);
        PathBuf::from(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: default_hosts_file(),
            block: AddressBlock::default(),
            backup: false,
            manage_aliases: cfg!(target_os = "macos"),
        }
    }
}

/// Platform location of the hosts file.
#[cfg(windows)]
pub fn default_hosts_file() -> PathBuf {
    let root = std::env::var_os("SystemRoot").unwrap_or_else(|| "C:\\Windows".into());
    PathBuf::from(root).join(r"System32\drivers\etc\hosts")
}

/// Platform location of the hosts file.
#[cfg(not(windows))]
pub fn default_hosts_file() -> PathBuf {
    PathBuf::from("/etc/hosts")
}
