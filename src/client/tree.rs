use super::{FtpClient, Pending};
use crate::{
    error::Result,
    file::FileEntry,
    protocol::Dialect,
    transport::Transport,
    utils::{join, relative},
};

impl<T: Transport> FtpClient<T> {
    /// Directory-only forest below `directory`.
    ///
    /// Files and links are skipped. Every returned directory carries its
    /// root-relative `path` and its own subdirectories as children, in
    /// listing order. A failed listing anywhere fails the whole walk.
    pub async fn tree(&mut self, directory: &str) -> Result<Vec<FileEntry>> {
        let dialect = self.dialect().await?;
        self.subdirectories(dialect, directory, 0).await
    }

    fn subdirectories<'a>(
        &'a mut self,
        dialect: Dialect,
        directory: &'a str,
        depth: usize,
    ) -> Pending<'a, Vec<FileEntry>> {
        Box::pin(async move {
            self.check_depth(directory, depth)?;

            let mut forest = Vec::new();
            for entry in self.parse_listing(dialect, directory).await? {
                if !entry.is_dir() {
                    continue;
                }

                let location = join(directory, entry.name());
                let children = self.subdirectories(dialect, &location, depth + 1).await?;
                let path = relative(&location).to_owned();

                debug!("tree node {:?} with {} subdirectories", path, children.len());
                forest.push(entry.into_node(path, children));
            }

            Ok(forest)
        })
    }
}
