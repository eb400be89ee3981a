//! Hostname to loopback address mapping, persisted in the hosts file.

pub mod alias;
pub mod allocator;
pub mod error;
pub mod hosts;
pub mod hosts_file;
pub mod random;
pub mod storage;

pub use error::{Error, Result};
pub use hosts::Hosts;
