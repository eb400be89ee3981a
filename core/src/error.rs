use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use lomap_common::network::block::{AddressBlock, BlockError};
use lomap_common::network::hostname::HostnameError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A file system operation on `path` failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    InvalidHostname(#[from] HostnameError),

    #[error("cannot unmap localhost")]
    CannotUnmapLocalhost,

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error("no unassigned addresses in address block: {0}")]
    BlockExhausted(AddressBlock),

    #[error("loopback alias for {address}: {reason}")]
    Alias { address: IpAddr, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Kind of the underlying I/O failure, if this is a file system error.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }

    pub fn is_permission_denied(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::PermissionDenied)
    }

    /// The hostname error behind this error, if any.
    pub fn hostname_error(&self) -> Option<&HostnameError> {
        match self {
            Error::InvalidHostname(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_block_too_small(&self) -> bool {
        matches!(self, Error::Block(BlockError::TooSmall(_)))
    }
}
