mod cursor;
mod sync;
mod tree;

use std::{collections::HashMap, future::Future, io::Cursor, path::Path, pin::Pin};
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    error::{Direction, Error, Operation, Result},
    file::FileEntry,
    options::ConnectOptions,
    protocol::{listing, Dialect, Permissions, TransferMode},
    transport::Transport,
};

/// Boxed future of a recursive walk step
pub(crate) type Pending<'a, R> = Pin<Box<dyn Future<Output = Result<R>> + Send + 'a>>;

/// High-level client over a flat [`Transport`].
///
/// Single-item helpers forward to one transport primitive and attach the
/// operation and path to any failure. The compound operations (tree walks,
/// recursive upload, download, copy and removal) leave the remote working
/// directory where they found it, whether they succeed or not.
///
/// All methods take `&mut self`: one client drives one connection from one
/// caller. Use separate clients for parallel work.
pub struct FtpClient<T> {
    transport: T,
    options: ConnectOptions,
    connected: bool,
}

impl<T: Transport> FtpClient<T> {
    pub fn new(transport: T, options: ConnectOptions) -> Self {
        Self {
            transport,
            options,
            connected: false,
        }
    }

    /// Opens the connection, logs in and applies the passive-mode setting.
    pub async fn connect(&mut self) -> Result<()> {
        let options = &self.options;

        self.transport
            .connect(&options.host, options.port, options.timeout, options.secure)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        self.transport
            .login(&options.username, &options.password)
            .await
            .map_err(|e| Error::Authentication(e.to_string()))?;

        debug!(
            "logged in to {}:{} as {}",
            options.host, options.port, options.username
        );

        self.connected = true;
        self.set_passive(self.options.passive).await
    }

    /// Closes the connection. Further calls fail with [`Error::NotConnected`].
    pub async fn close(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }

        self.connected = false;
        self.transport
            .close()
            .await
            .map_err(|e| Error::transport(Operation::Close, &self.options.host, e))
    }

    #[must_use]
    pub const fn options(&self) -> &ConnectOptions {
        &self.options
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    fn check_depth(&self, path: &str, depth: usize) -> Result<()> {
        let limit = self.options.max_depth;
        if depth > limit {
            return Err(Error::DepthExceeded {
                path: path.to_owned(),
                limit,
            });
        }

        Ok(())
    }

    pub async fn set_passive(&mut self, passive: bool) -> Result<()> {
        self.ensure_connected()?;
        self.transport
            .set_passive_mode(passive)
            .await
            .map_err(|e| Error::transport(Operation::SetPassiveMode, "", e))
    }

    /// Asks the server for its system type and picks the listing dialect.
    pub async fn dialect(&mut self) -> Result<Dialect> {
        self.ensure_connected()?;
        let system_type = self
            .transport
            .system_type()
            .await
            .map_err(|e| Error::transport(Operation::SystemType, "", e))?;

        Ok(Dialect::from_system_type(&system_type))
    }

    pub async fn change_directory(&mut self, path: &str) -> Result<()> {
        self.ensure_connected()?;
        self.transport
            .change_directory(path)
            .await
            .map_err(|e| Error::transport(Operation::ChangeDirectory, path, e))
    }

    /// Current remote working directory
    pub async fn pwd(&mut self) -> Result<String> {
        self.ensure_connected()?;
        self.transport
            .print_working_directory()
            .await
            .map_err(|e| Error::transport(Operation::PrintWorkingDirectory, "", e))
    }

    /// Renames or moves a file or directory.
    pub async fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.ensure_connected()?;
        self.transport
            .rename(from, to)
            .await
            .map_err(|e| Error::transport(Operation::Rename, from, e))
    }

    /// Removes a single remote file.
    pub async fn delete(&mut self, path: &str) -> Result<()> {
        self.ensure_connected()?;
        self.delete_file(path).await
    }

    async fn delete_file(&mut self, path: &str) -> Result<()> {
        self.transport
            .delete_file(path)
            .await
            .map_err(|e| Error::transport(Operation::DeleteFile, path, e))
    }

    /// Changes permissions of a remote path. Does nothing on Windows servers.
    pub async fn chmod(&mut self, path: &str, permissions: Permissions) -> Result<()> {
        let dialect = self.dialect().await?;
        self.chmod_with(dialect, path, permissions).await
    }

    async fn chmod_with(
        &mut self,
        dialect: Dialect,
        path: &str,
        permissions: Permissions,
    ) -> Result<()> {
        if !dialect.supports_permissions() {
            return Ok(());
        }

        self.transport
            .change_permissions(path, permissions)
            .await
            .map_err(|e| Error::transport(Operation::ChangePermissions, path, e))
    }

    /// Uploads the local file `local` as `remote` and applies `permissions`.
    pub async fn put<P: AsRef<Path>>(
        &mut self,
        remote: &str,
        local: P,
        mode: TransferMode,
        permissions: Permissions,
    ) -> Result<()> {
        let dialect = self.dialect().await?;
        self.put_with(dialect, remote, local.as_ref(), mode, permissions)
            .await
    }

    async fn put_with(
        &mut self,
        dialect: Dialect,
        remote: &str,
        local: &Path,
        mode: TransferMode,
        permissions: Permissions,
    ) -> Result<()> {
        let mut file = fs::File::open(local)
            .await
            .map_err(|e| Error::local(local, e))?;

        self.transport
            .upload_stream(remote, &mut file, mode)
            .await
            .map_err(|e| Error::transfer(Direction::Upload, remote, e))?;

        debug!("uploaded {} to {:?}", local.display(), remote);

        self.chmod_with(dialect, remote, permissions).await
    }

    /// Downloads `remote` into the local file `local`, replacing its content.
    pub async fn get<P: AsRef<Path>>(
        &mut self,
        local: P,
        remote: &str,
        mode: TransferMode,
    ) -> Result<()> {
        self.ensure_connected()?;
        self.get_into(local.as_ref(), remote, mode).await
    }

    async fn get_into(&mut self, local: &Path, remote: &str, mode: TransferMode) -> Result<()> {
        let mut file = fs::File::create(local)
            .await
            .map_err(|e| Error::local(local, e))?;

        self.transport
            .download_stream(remote, &mut file, mode)
            .await
            .map_err(|e| Error::transfer(Direction::Download, remote, e))?;

        file.flush().await.map_err(|e| Error::local(local, e))?;

        debug!("downloaded {:?} to {}", remote, local.display());
        Ok(())
    }

    /// Reads a remote file to the end.
    pub async fn file_content(&mut self, remote: &str, mode: TransferMode) -> Result<Vec<u8>> {
        self.ensure_connected()?;

        let mut buffer = Cursor::new(Vec::new());
        self.transport
            .download_stream(remote, &mut buffer, mode)
            .await
            .map_err(|e| Error::transfer(Direction::Download, remote, e))?;

        Ok(buffer.into_inner())
    }

    /// Checks whether `path` is a plain file, using its reported size.
    pub async fn is_file(&mut self, path: &str) -> Result<bool> {
        self.ensure_connected()?;
        let size = self
            .transport
            .size(path)
            .await
            .map_err(|e| Error::transport(Operation::Size, path, e))?;

        Ok(size >= 0)
    }

    /// Entries of one remote directory, non-recursive.
    ///
    /// Duplicate names keep the last listed entry at the position of the first.
    pub async fn list(&mut self, directory: &str) -> Result<Vec<FileEntry>> {
        let dialect = self.dialect().await?;
        self.list_with(dialect, directory).await
    }

    async fn list_with(&mut self, dialect: Dialect, directory: &str) -> Result<Vec<FileEntry>> {
        let mut entries: Vec<FileEntry> = Vec::new();
        let mut positions = HashMap::new();

        for entry in self.parse_listing(dialect, directory).await? {
            let existing = positions.get(entry.name()).copied();
            match existing {
                Some(index) => entries[index] = entry,
                None => {
                    let _ = positions.insert(entry.name().to_owned(), entries.len());
                    entries.push(entry);
                }
            }
        }

        Ok(entries)
    }

    /// Every parsable line of one raw listing, in listing order.
    async fn parse_listing(&mut self, dialect: Dialect, directory: &str) -> Result<Vec<FileEntry>> {
        let lines = self
            .transport
            .raw_list(directory)
            .await
            .map_err(|e| Error::transport(Operation::RawList, directory, e))?;

        Ok(lines
            .iter()
            .filter_map(|line| listing::parse(line, dialect))
            .filter(|entry| !entry.is_pseudo())
            .collect())
    }
}
