//! Directory-tree operations for FTP-style connections.
//!
//! A [`Transport`] only knows how to work with one directory or one file at a
//! time. [`FtpClient`] composes those primitives into recursive uploads,
//! downloads, copies and removals, and keeps the connection's working
//! directory where the caller left it.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

pub mod client;
mod error;
pub mod file;
pub mod options;
/// Listing dialects and the wire-level value types shared with transports
pub mod protocol;
pub mod transport;
mod utils;

pub use client::FtpClient;
pub use error::{Direction, Error, Operation, Result};
pub use file::{EntryKind, FileEntry};
pub use options::ConnectOptions;
pub use protocol::{Dialect, Permissions, TransferMode};
pub use transport::{Transport, TransportError, TransportResult};
