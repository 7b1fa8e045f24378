//! Scoped moves of the remote working directory.
//!
//! The connection has one working directory shared by every operation. A
//! [`CursorMark`] records it before a descent and [`FtpClient::release`]
//! returns to it after the body has run, on success and on error alike.

use super::FtpClient;
use crate::{
    error::{Error, Operation, Result},
    transport::Transport,
};

/// Directory to come back to when a scoped move ends
#[must_use = "the working directory is only restored by `FtpClient::release`"]
pub(crate) struct CursorMark {
    directory: String,
}

impl<T: Transport> FtpClient<T> {
    /// Records the current working directory.
    pub(crate) async fn mark(&mut self) -> Result<CursorMark> {
        let directory = self
            .transport
            .print_working_directory()
            .await
            .map_err(|e| Error::transport(Operation::PrintWorkingDirectory, "", e))?;

        Ok(CursorMark { directory })
    }

    /// Moves into `path` and returns the mark of the directory left behind.
    /// Nothing has moved when this fails.
    pub(crate) async fn enter(&mut self, path: &str) -> Result<CursorMark> {
        let mark = self.mark().await?;

        self.transport
            .change_directory(path)
            .await
            .map_err(|e| Error::transport(Operation::ChangeDirectory, path, e))?;

        trace!("entered {:?} from {:?}", path, mark.directory);
        Ok(mark)
    }

    pub(crate) async fn return_to(&mut self, mark: &CursorMark) -> Result<()> {
        self.transport
            .change_directory(&mark.directory)
            .await
            .map_err(|e| Error::transport(Operation::ChangeDirectory, &mark.directory, e))
    }

    /// Goes back to `mark` and then hands out `result`. When both the body and
    /// the return fail, the body's error is kept.
    pub(crate) async fn release<R>(&mut self, mark: CursorMark, result: Result<R>) -> Result<R> {
        let restored = self.return_to(&mark).await;

        match (result, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(error)) | (Err(error), Ok(())) => Err(error),
            (Err(error), Err(restore_error)) => {
                warn!(
                    "working directory not restored to {:?}: {}",
                    mark.directory, restore_error
                );
                Err(error)
            }
        }
    }

    /// Tells directories from files by trying to enter `name`, coming straight
    /// back to `here` when that works.
    ///
    /// A directory the server refuses to enter is reported as a file.
    pub(crate) async fn probe_directory(&mut self, name: &str, here: &CursorMark) -> Result<bool> {
        if let Err(error) = self.transport.change_directory(name).await {
            trace!("{:?} is not enterable, treating as file: {}", name, error);
            return Ok(false);
        }

        self.return_to(here).await?;
        Ok(true)
    }

    /// Checks whether `path` can be entered. The working directory is unchanged.
    pub async fn is_directory(&mut self, path: &str) -> Result<bool> {
        self.ensure_connected()?;
        let here = self.mark().await?;
        self.probe_directory(path, &here).await
    }
}
