pub mod target;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use lomap_common::config::{self, Config};
use lomap_common::network::block::AddressBlock;
use lomap_common::network::hostname::HostnameError;
use lomap_core::Hosts;

use target::Target;

#[derive(Parser, Debug)]
#[command(name = "lomap", version)]
#[command(about = "Map hostnames to random loopback addresses.")]
#[command(
    long_about = "Print the IP mapped to HOSTNAME, assigning a random loopback address if no mapping exists.\n\
                  Without a HOSTNAME, print a random unassigned address."
)]
pub struct CommandLine {
    /// Hostname to map, optionally followed by :PORT
    pub target: Option<Target>,

    /// Path to the hosts file
    #[arg(short = 'f', long, value_name = "PATH", default_value_os_t = config::default_hosts_file())]
    pub hosts_file: PathBuf,

    /// Address block to draw addresses from
    #[arg(short, long, value_name = "CIDR", default_value_t = AddressBlock::LOOPBACK)]
    pub block: AddressBlock,

    /// Remove the hostname mapping
    #[arg(short, long, conflicts_with = "query", requires = "target")]
    pub unmap: bool,

    /// Look up the hostname without assigning an address
    #[arg(short, long, requires = "target")]
    pub query: bool,

    /// Print the hostname instead of the address
    #[arg(short, long)]
    pub echo: bool,

    /// Do not print a trailing newline
    #[arg(short = 'n')]
    pub no_newline: bool,

    /// Keep a copy of the previous hosts file next to it
    #[arg(long)]
    pub backup: bool,

    /// Log each step to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            hosts_file: self.hosts_file.clone(),
            block: self.block,
            backup: self.backup,
            ..Config::default()
        }
    }
}

/// Runs the requested operation and returns the text to print.
pub fn execute(cmd: &CommandLine, hosts: &mut Hosts) -> lomap_core::Result<String> {
    let Some(target) = &cmd.target else {
        return hosts.random_ip().map(|ip| ip.to_string());
    };

    let result: lomap_core::Result<Option<IpAddr>> = if cmd.unmap {
        hosts.unmap(&target.hostname)
    } else if cmd.query {
        hosts.ip(&target.hostname)
    } else {
        hosts.map(&target.hostname).map(Some)
    };

    match result {
        Ok(_) if cmd.echo => Ok(target.to_string()),
        Ok(ip) => Ok(ip.map(|ip| target.with_address(ip)).unwrap_or_default()),
        // Addresses resolve to themselves.
        Err(e) if e.hostname_error().is_some_and(HostnameError::is_address) => {
            Ok(target.to_string())
        }
        Err(e) => Err(e),
    }
}
