use std::io::{self, Write};

use colored::*;
use tracing::{error, warn};

/// Writes the command result to stdout. Empty results print nothing, not
/// even a newline.
pub fn output(text: &str, no_newline: bool) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !no_newline {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}

pub fn failure(err: &anyhow::Error) {
    error!("{err:#}");

    let denied = err
        .downcast_ref::<lomap_core::Error>()
        .is_some_and(lomap_core::Error::is_permission_denied);

    if denied && !is_root::is_root() {
        warn!(
            "Changing the hosts file usually requires {}",
            "elevated privileges".bold()
        );
    }
}
