//! Loopback interface aliases.
//!
//! macOS only routes `127.0.0.1` on `lo0`; any other loopback address needs an
//! explicit `ifconfig lo0 alias`. Aliases disappear on reboot, so they are
//! recreated whenever a mapping is looked up. On other platforms the whole
//! loopback block is routed and every function here is a no-op.

use std::net::IpAddr;

use lomap_common::network::hostname::LOCALHOST_ADDR;

use crate::error::Result;

/// True for loopback addresses that are not routed without an alias.
pub fn needs_alias(address: IpAddr) -> bool {
    match address {
        IpAddr::V4(v4) => v4.is_loopback() && v4 != LOCALHOST_ADDR,
        IpAddr::V6(_) => false,
    }
}

/// Makes sure `address` is configured on the loopback interface.
pub fn ensure(address: IpAddr) -> Result<()> {
    if !needs_alias(address) {
        return Ok(());
    }
    platform::ensure(address)
}

/// Removes the loopback alias for `address`.
pub fn remove(address: IpAddr) -> Result<()> {
    if !needs_alias(address) {
        return Ok(());
    }
    platform::remove(address)
}

#[cfg(target_os = "macos")]
mod platform {
    use std::net::IpAddr;
    use std::process::Command;

    use tracing::debug;

    use crate::error::{Error, Result};

    const IFCONFIG: &str = "ifconfig";
    const LOOPBACK: &str = "lo0";

    pub fn ensure(address: IpAddr) -> Result<()> {
        if is_aliased(address)? {
            return Ok(());
        }
        run(address, &[LOOPBACK, "alias", &address.to_string(), "up"])?;
        debug!("Added {LOOPBACK} alias for {address}");
        Ok(())
    }

    pub fn remove(address: IpAddr) -> Result<()> {
        if !is_aliased(address)? {
            return Ok(());
        }
        run(address, &[LOOPBACK, "-alias", &address.to_string()])?;
        debug!("Removed {LOOPBACK} alias for {address}");
        Ok(())
    }

    fn is_aliased(address: IpAddr) -> Result<bool> {
        let output = run(address, &[LOOPBACK])?;
        let needle = address.to_string();

        Ok(output.lines().any(|line| {
            let mut fields = line.split_whitespace();
            fields.next() == Some("inet") && fields.next() == Some(needle.as_str())
        }))
    }

    fn run(address: IpAddr, args: &[&str]) -> Result<String> {
        let output = Command::new(IFCONFIG)
            .args(args)
            .output()
            .map_err(|e| Error::Alias {
                address,
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Alias {
                address,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(not(target_os = "macos"))]
mod platform {
    use std::net::IpAddr;

    use crate::error::Result;

    pub fn ensure(_address: IpAddr) -> Result<()> {
        Ok(())
    }

    pub fn remove(_address: IpAddr) -> Result<()> {
        Ok(())
    }
}
