use chrono::{DateTime, Utc};
use std::time::UNIX_EPOCH;

const LINK_ARROW: &str = " -> ";

/// What a listing line describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    SymbolicLink,
}

/// One entry of a remote directory listing.
///
/// `path` and `children` are only filled in by
/// [`FtpClient::tree`](crate::FtpClient::tree); flat listings leave them empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: String,
    kind: EntryKind,
    size: u64,
    modified: DateTime<Utc>,
    path: String,
    children: Vec<FileEntry>,
}

impl FileEntry {
    /// Creates a flat entry. Directories always report a size of zero.
    pub(crate) fn new<N: Into<String>>(
        name: N,
        kind: EntryKind,
        size: u64,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            size: if kind == EntryKind::Directory { 0 } else { size },
            modified,
            path: String::new(),
            children: Vec::new(),
        }
    }

    /// Timestamp used when a listing's date columns cannot be read
    #[must_use]
    pub fn unknown_time() -> DateTime<Utc> {
        DateTime::<Utc>::from(UNIX_EPOCH)
    }

    pub(crate) fn into_node(mut self, path: String, children: Vec<Self>) -> Self {
        self.path = path;
        self.children = children;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Last modification, minute resolution, UTC
    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Location relative to the root of a tree walk, `/` separated
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::SymbolicLink
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Name the server knows the entry by. Unix links list as
    /// `name -> target`, only `name` can be addressed.
    pub(crate) fn link_name(&self) -> &str {
        if self.is_symlink() {
            if let Some((name, _)) = self.name.split_once(LINK_ARROW) {
                return name;
            }
        }
        &self.name
    }

    /// `.` and `..` as returned by servers that list pseudo-entries
    pub(crate) fn is_pseudo(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}
