use std::{fmt, io, path::PathBuf};
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

/// Transport primitive that produced a [`Error::Transport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ChangeDirectory,
    PrintWorkingDirectory,
    RawList,
    NameList,
    MakeDirectory,
    RemoveDirectory,
    DeleteFile,
    Rename,
    ChangePermissions,
    Size,
    SystemType,
    SetPassiveMode,
    Close,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChangeDirectory => "chdir",
            Self::PrintWorkingDirectory => "pwd",
            Self::RawList => "rawlist",
            Self::NameList => "nlist",
            Self::MakeDirectory => "mkdir",
            Self::RemoveDirectory => "rmdir",
            Self::DeleteFile => "delete",
            Self::Rename => "rename",
            Self::ChangePermissions => "chmod",
            Self::Size => "size",
            Self::SystemType => "systype",
            Self::SetPassiveMode => "pasv",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a failed single-file transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("cannot write file"),
            Self::Download => f.write_str("cannot read file"),
        }
    }
}

/// Enum for client errors
#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not reach the server
    #[error("connection error: {0}")]
    Connection(String),
    /// The server rejected the credentials
    #[error("login error: {0}")]
    Authentication(String),
    /// An operation was attempted before `connect` or after `close`
    #[error("connection is not opened")]
    NotConnected,
    /// A single transport primitive failed
    #[error("{operation} \"{path}\" failed: {message}")]
    Transport {
        operation: Operation,
        path: String,
        message: String,
    },
    /// Neither entering nor creating a path segment succeeded
    #[error("mkdir \"{segment}\" failed")]
    DirectoryCreate { segment: String },
    /// A recursive removal stopped; `source` is the first failure below `path`
    #[error("delete \"{path}\" failed")]
    DirectoryDelete { path: String, source: Box<Error> },
    #[error("{direction} \"{path}\": {message}")]
    FileTransfer {
        direction: Direction,
        path: String,
        message: String,
    },
    #[error("local path \"{}\": {source}", .path.display())]
    LocalFilesystem { path: PathBuf, source: io::Error },
    /// A recursive walk went deeper than `ConnectOptions::max_depth`
    #[error("directory \"{path}\" is nested deeper than {limit} levels")]
    DepthExceeded { path: String, limit: usize },
}

impl Error {
    pub(crate) fn transport(operation: Operation, path: &str, error: TransportError) -> Self {
        Self::Transport {
            operation,
            path: path.to_owned(),
            message: error.to_string(),
        }
    }

    pub(crate) fn transfer(direction: Direction, path: &str, error: TransportError) -> Self {
        Self::FileTransfer {
            direction,
            path: path.to_owned(),
            message: error.to_string(),
        }
    }

    pub(crate) fn local<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::LocalFilesystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn directory_delete(path: &str, source: Self) -> Self {
        Self::DirectoryDelete {
            path: path.to_owned(),
            source: Box::new(source),
        }
    }
}
