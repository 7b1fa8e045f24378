//! Recursive operations composed from single-directory primitives.
//!
//! Nothing here is transactional. The first failing primitive aborts the
//! operation and whatever was already created, transferred or removed stays
//! that way. Each public operation restores the working directory it started
//! in before returning.

use std::{io::Cursor, path::Path};
use tokio::fs;

use super::{FtpClient, Pending};
use crate::{
    error::{Direction, Error, Operation, Result},
    protocol::{Dialect, Permissions, TransferMode},
    transport::Transport,
    utils::{base_name, join, segments},
};

/// `NLST`/`CWD` name of the directory the cursor is already in
const CURRENT_DIRECTORY: &str = ".";

impl<T: Transport> FtpClient<T> {
    /// Creates every missing segment of `path` below `base`.
    ///
    /// Segments that can be entered are kept as they are. New segments get
    /// `permissions`, except on Windows servers. When a segment can be neither
    /// entered nor created the call fails with [`Error::DirectoryCreate`];
    /// segments created before it are left in place.
    pub async fn make_directory_path(
        &mut self,
        base: &str,
        path: &str,
        permissions: Permissions,
    ) -> Result<()> {
        let dialect = self.dialect().await?;
        let origin = self.enter(base).await?;
        let result = self.make_path_here(dialect, path, permissions).await;
        self.release(origin, result).await
    }

    async fn make_path_here(
        &mut self,
        dialect: Dialect,
        path: &str,
        permissions: Permissions,
    ) -> Result<()> {
        let base = self.mark().await?;
        let result = self.descend_creating(dialect, path, permissions).await;
        self.release(base, result).await
    }

    async fn descend_creating(
        &mut self,
        dialect: Dialect,
        path: &str,
        permissions: Permissions,
    ) -> Result<()> {
        for segment in segments(path) {
            if self.transport.change_directory(segment).await.is_ok() {
                continue;
            }

            if let Err(error) = self.transport.make_directory(segment).await {
                debug!("mkdir {:?} failed: {}", segment, error);
                return Err(Error::DirectoryCreate {
                    segment: segment.to_owned(),
                });
            }

            debug!("created directory {:?}", segment);
            self.chmod_with(dialect, segment, permissions).await?;
            self.transport
                .change_directory(segment)
                .await
                .map_err(|e| Error::transport(Operation::ChangeDirectory, segment, e))?;
        }

        Ok(())
    }

    /// Removes `path` with everything below it, children before parents.
    ///
    /// Any failure is reported as [`Error::DirectoryDelete`] naming `path`,
    /// with the first failure further down as its source.
    pub async fn remove_tree(&mut self, path: &str) -> Result<()> {
        let dialect = self.dialect().await?;
        self.remove_level(dialect, path, 0).await
    }

    fn remove_level<'a>(&'a mut self, dialect: Dialect, path: &'a str, depth: usize) -> Pending<'a, ()> {
        Box::pin(async move {
            self.remove_contents(dialect, path, depth)
                .await
                .map_err(|error| Error::directory_delete(path, error))
        })
    }

    async fn remove_contents(&mut self, dialect: Dialect, path: &str, depth: usize) -> Result<()> {
        self.check_depth(path, depth)?;

        for child in self.list_with(dialect, path).await? {
            let child_path = join(path, child.link_name());
            if child.is_dir() {
                self.remove_level(dialect, &child_path, depth + 1).await?;
            } else {
                self.delete_file(&child_path).await?;
            }
        }

        self.transport
            .remove_directory(path)
            .await
            .map_err(|e| Error::transport(Operation::RemoveDirectory, path, e))?;

        debug!("removed directory {:?}", path);
        Ok(())
    }

    /// Uploads the local directory `source` as `remote_dir` below `base`.
    ///
    /// Directories are created with `permissions`, files get
    /// [`Permissions::FILE`].
    pub async fn upload_tree<P: AsRef<Path>>(
        &mut self,
        base: &str,
        source: P,
        remote_dir: &str,
        mode: TransferMode,
        permissions: Permissions,
    ) -> Result<()> {
        let dialect = self.dialect().await?;
        let origin = self.enter(base).await?;
        let result = self
            .upload_level(dialect, source.as_ref(), remote_dir, mode, permissions, 0)
            .await;
        self.release(origin, result).await
    }

    fn upload_level<'a>(
        &'a mut self,
        dialect: Dialect,
        source: &'a Path,
        remote_dir: &'a str,
        mode: TransferMode,
        permissions: Permissions,
        depth: usize,
    ) -> Pending<'a, ()> {
        Box::pin(async move {
            self.check_depth(remote_dir, depth)?;
            self.make_path_here(dialect, remote_dir, permissions).await?;

            let mut entries = fs::read_dir(source)
                .await
                .map_err(|e| Error::local(source, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::local(source, e))?
            {
                let local = entry.path();
                let remote = join(remote_dir, &entry.file_name().to_string_lossy());
                let metadata = fs::metadata(&local)
                    .await
                    .map_err(|e| Error::local(&local, e))?;

                if metadata.is_dir() {
                    self.upload_level(dialect, &local, &remote, mode, permissions, depth + 1)
                        .await?;
                } else {
                    self.put_with(dialect, &remote, &local, mode, Permissions::FILE)
                        .await?;
                }
            }

            Ok(())
        })
    }

    /// Downloads the remote directory `remote_dir` into `local_dir`.
    ///
    /// `"."` downloads the current working directory. Names from the
    /// directory's `NLST` are told apart by trying to enter them, so an entry
    /// the server refuses to enter is downloaded as a file.
    pub async fn download_tree<P: AsRef<Path>>(
        &mut self,
        remote_dir: &str,
        local_dir: P,
        mode: TransferMode,
    ) -> Result<()> {
        self.ensure_connected()?;
        let origin = self.mark().await?;
        let result = self
            .download_level(remote_dir, local_dir.as_ref(), mode, 0)
            .await;
        self.release(origin, result).await
    }

    fn download_level<'a>(
        &'a mut self,
        remote_dir: &'a str,
        local_dir: &'a Path,
        mode: TransferMode,
        depth: usize,
    ) -> Pending<'a, ()> {
        Box::pin(async move {
            self.check_depth(remote_dir, depth)?;

            if remote_dir == CURRENT_DIRECTORY {
                return self.download_here(local_dir, mode, depth).await;
            }

            let parent = self.enter(remote_dir).await?;
            let result = self.download_here(local_dir, mode, depth).await;
            self.release(parent, result).await
        })
    }

    async fn download_here(&mut self, local_dir: &Path, mode: TransferMode, depth: usize) -> Result<()> {
        ensure_local_dir(local_dir).await?;

        let here = self.mark().await?;
        let names = self
            .transport
            .name_list(CURRENT_DIRECTORY)
            .await
            .map_err(|e| Error::transport(Operation::NameList, CURRENT_DIRECTORY, e))?;

        for name in &names {
            let name = base_name(name);
            if name.is_empty() || name == "." || name == ".." {
                continue;
            }

            let local = local_dir.join(name);
            if self.probe_directory(name, &here).await? {
                self.download_level(name, &local, mode, depth + 1).await?;
            } else {
                self.get_into(&local, name, mode).await?;
            }
        }

        Ok(())
    }

    /// Copies one remote file to another remote path through memory.
    pub async fn copy_file(&mut self, source: &str, destination: &str) -> Result<()> {
        self.ensure_connected()?;
        self.copy_through_buffer(source, destination).await
    }

    async fn copy_through_buffer(&mut self, source: &str, destination: &str) -> Result<()> {
        let mut buffer = Cursor::new(Vec::new());

        self.transport
            .download_stream(source, &mut buffer, TransferMode::Binary)
            .await
            .map_err(|e| Error::transfer(Direction::Download, source, e))?;

        buffer.set_position(0);

        self.transport
            .upload_stream(destination, &mut buffer, TransferMode::Binary)
            .await
            .map_err(|e| Error::transfer(Direction::Upload, destination, e))?;

        debug!("copied {:?} to {:?}", source, destination);
        Ok(())
    }

    /// Copies the remote directory `source` to `destination`, both relative
    /// to `base`. New directories are created with [`Permissions::OPEN`].
    pub async fn copy_directory(&mut self, base: &str, source: &str, destination: &str) -> Result<()> {
        let dialect = self.dialect().await?;
        let origin = self.enter(base).await?;
        let result = self.copy_level(dialect, source, destination, 0).await;
        self.release(origin, result).await
    }

    fn copy_level<'a>(
        &'a mut self,
        dialect: Dialect,
        source: &'a str,
        destination: &'a str,
        depth: usize,
    ) -> Pending<'a, ()> {
        Box::pin(async move {
            self.check_depth(source, depth)?;
            self.make_path_here(dialect, destination, Permissions::OPEN)
                .await?;

            for child in self.list_with(dialect, source).await? {
                let from = join(source, child.link_name());
                let to = join(destination, child.link_name());

                if child.is_dir() {
                    self.copy_level(dialect, &from, &to, depth + 1).await?;
                } else {
                    self.copy_through_buffer(&from, &to).await?;
                }
            }

            Ok(())
        })
    }
}

/// Creates `path` unless it already is a directory.
async fn ensure_local_dir(path: &Path) -> Result<()> {
    if is_local_dir(path).await {
        return Ok(());
    }

    if let Err(error) = fs::create_dir(path).await {
        if !is_local_dir(path).await {
            return Err(Error::local(path, error));
        }
    }

    Ok(())
}

async fn is_local_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}
