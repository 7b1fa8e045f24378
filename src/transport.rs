use std::{io, time::Duration};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::protocol::{Permissions, TransferMode};

pub type TransportResult<T> = Result<T, TransportError>;

/// Failure reported by a [`Transport`] primitive. Carries the server's or
/// the I/O layer's message only; the client adds operation and path.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self(message.into())
    }
}

impl From<io::Error> for TransportError {
    fn from(error: io::Error) -> Self {
        Self(error.to_string())
    }
}

/// Flat, single-directory primitives of one remote connection. This is `async_trait`
///
/// Every method completes before the next one is issued and all of them act
/// on the same server-side working directory, so one transport must never be
/// driven by more than one caller.
#[async_trait]
pub trait Transport: Send {
    async fn connect(
        &mut self,
        host: &str,
        port: u16,
        timeout: Duration,
        secure: bool,
    ) -> TransportResult<()>;

    async fn login(&mut self, username: &str, password: &str) -> TransportResult<()>;

    async fn set_passive_mode(&mut self, passive: bool) -> TransportResult<()>;

    async fn change_directory(&mut self, path: &str) -> TransportResult<()>;

    async fn print_working_directory(&mut self) -> TransportResult<String>;

    /// Lines of the server's free-form `LIST` response for `path`.
    async fn raw_list(&mut self, path: &str) -> TransportResult<Vec<String>>;

    /// Bare names of the `NLST` response for `path`.
    async fn name_list(&mut self, path: &str) -> TransportResult<Vec<String>>;

    async fn make_directory(&mut self, name: &str) -> TransportResult<()>;

    async fn remove_directory(&mut self, path: &str) -> TransportResult<()>;

    async fn delete_file(&mut self, path: &str) -> TransportResult<()>;

    async fn rename(&mut self, from: &str, to: &str) -> TransportResult<()>;

    async fn change_permissions(&mut self, path: &str, mode: Permissions) -> TransportResult<()>;

    /// Stores everything read from `source` as the remote file `path`.
    async fn upload_stream(
        &mut self,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        mode: TransferMode,
    ) -> TransportResult<()>;

    /// Writes the content of the remote file `path` into `sink`.
    async fn download_stream(
        &mut self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
        mode: TransferMode,
    ) -> TransportResult<()>;

    /// Size in bytes, negative when `path` is not a plain file or unknown.
    async fn size(&mut self, path: &str) -> TransportResult<i64>;

    /// The server's `SYST` answer, e.g. `UNIX` or `Windows_NT`.
    async fn system_type(&mut self) -> TransportResult<String>;

    /// Called once by [`FtpClient::close`](crate::FtpClient::close).
    async fn close(&mut self) -> TransportResult<()> {
        Ok(())
    }
}
