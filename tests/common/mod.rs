#![allow(dead_code)]

use async_trait::async_trait;
use ftp_tree::{
    ConnectOptions, FtpClient, Permissions, TransferMode, Transport, TransportError,
    TransportResult,
};
use std::{collections::BTreeMap, time::Duration};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const USER: &str = "tester";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
enum Node {
    Directory(Vec<String>),
    File(Vec<u8>),
    /// Symbolic link, target resolved against the link's directory
    Link(String),
}

/// Remote file system kept in memory, with one working directory like a
/// real control connection.
pub struct MemoryTransport {
    nodes: BTreeMap<String, Node>,
    cwd: String,
    system_type: String,
    windows: bool,
    list_pseudo: bool,
    failures: Vec<(&'static str, String)>,
    journal: Vec<String>,
    permissions: BTreeMap<String, u32>,
    passive: Option<bool>,
    closed: bool,
}

impl MemoryTransport {
    pub fn unix() -> Self {
        Self::with_system_type("UNIX Type: L8", false)
    }

    pub fn windows() -> Self {
        Self::with_system_type("Windows_NT", true)
    }

    fn with_system_type(system_type: &str, windows: bool) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_owned(), Node::Directory(Vec::new()));

        Self {
            nodes,
            cwd: "/".to_owned(),
            system_type: system_type.to_owned(),
            windows,
            list_pseudo: false,
            failures: Vec::new(),
            journal: Vec::new(),
            permissions: BTreeMap::new(),
            passive: None,
            closed: false,
        }
    }

    /// Adds `.` and `..` to every raw listing, like `ls -a` based servers.
    pub fn listing_pseudo_entries(mut self) -> Self {
        self.list_pseudo = true;
        self
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.create_dirs(path);
        self
    }

    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        let (parent, name) = split(path);
        self.create_dirs(&parent);
        self.attach(&parent, name);
        self.nodes.insert(path.to_owned(), Node::File(content.to_vec()));
        self
    }

    pub fn link(mut self, path: &str, target: &str) -> Self {
        let (parent, name) = split(path);
        self.create_dirs(&parent);
        self.attach(&parent, name);
        self.nodes.insert(path.to_owned(), Node::Link(target.to_owned()));
        self
    }

    /// Makes `operation` fail for the resolved absolute `path`.
    pub fn fail(mut self, operation: &'static str, path: &str) -> Self {
        self.failures.push((operation, path.to_owned()));
        self
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn journal(&self) -> &[String] {
        &self.journal
    }

    pub fn passive(&self) -> Option<bool> {
        self.passive
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn permissions_of(&self, path: &str) -> Option<u32> {
        self.permissions.get(path).copied()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(Node::Directory(_)))
    }

    pub fn content(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(path) {
            Some(Node::File(data)) => Some(data.as_slice()),
            _ => None,
        }
    }

    pub fn is_link(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(Node::Link(_)))
    }

    pub fn children(&self, path: &str) -> Vec<String> {
        match self.nodes.get(path) {
            Some(Node::Directory(children)) => children.clone(),
            _ => Vec::new(),
        }
    }

    fn create_dirs(&mut self, path: &str) {
        let mut current = String::from("/");
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let next = join_abs(&current, segment);
            if !self.nodes.contains_key(&next) {
                self.attach(&current, segment);
                self.nodes.insert(next.clone(), Node::Directory(Vec::new()));
            }
            current = next;
        }
    }

    fn attach(&mut self, parent: &str, name: &str) {
        if let Some(Node::Directory(children)) = self.nodes.get_mut(parent) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_owned());
            }
        }
    }

    fn detach(&mut self, path: &str) {
        let (parent, name) = split(path);
        if let Some(Node::Directory(children)) = self.nodes.get_mut(&parent) {
            children.retain(|c| c != name);
        }
        self.nodes.remove(path);
    }

    fn resolve(&self, path: &str) -> String {
        let mut parts: Vec<&str> = if path.starts_with('/') {
            Vec::new()
        } else {
            self.cwd.split('/').filter(|s| !s.is_empty()).collect()
        };

        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                name => parts.push(name),
            }
        }

        format!("/{}", parts.join("/"))
    }

    fn check(&self, operation: &'static str, path: &str) -> TransportResult<()> {
        if self
            .failures
            .iter()
            .any(|(op, failing)| *op == operation && failing == path)
        {
            return Err(TransportError::new(format!("550 {operation} {path} refused")));
        }
        Ok(())
    }

    fn listing_line(&self, name: &str, node: &Node) -> String {
        match (self.windows, node) {
            (true, Node::Directory(_)) => format!("02-16-24  01:54PM       <DIR>          {name}"),
            (true, Node::File(data)) => format!("02-16-24  01:54PM {:>18} {name}", data.len()),
            (false, Node::Directory(_)) => {
                format!("drwxr-xr-x    2 ftp      ftp          4096 Feb 16 13:54 {name}")
            }
            (false, Node::File(data)) => {
                format!("-rw-r--r--    1 ftp      ftp {:>12} Feb 16 13:54 {name}", data.len())
            }
            (true, Node::Link(target)) => format!("02-16-24  01:54PM {:>18} {name}", target.len()),
            (false, Node::Link(target)) => format!(
                "lrwxrwxrwx    1 ftp      ftp {:>12} Feb 16 13:54 {name} -> {target}",
                target.len()
            ),
        }
    }

    /// Contents of the file at `path`, following one link.
    fn read(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(path) {
            Some(Node::File(data)) => Some(data.as_slice()),
            Some(Node::Link(target)) => {
                let (parent, _) = split(path);
                let resolved = if target.starts_with('/') {
                    target.clone()
                } else {
                    join_abs(&parent, target)
                };
                self.content(&resolved)
            }
            _ => None,
        }
    }

    fn require_dir(&self, path: &str) -> TransportResult<()> {
        self.directory(path).map(|_| ())
    }

    fn directory(&self, path: &str) -> TransportResult<Vec<String>> {
        match self.nodes.get(path) {
            Some(Node::Directory(children)) => Ok(children.clone()),
            _ => Err(TransportError::new(format!("550 {path}: no such directory"))),
        }
    }
}

fn join_abs(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn split(path: &str) -> (String, &str) {
    match path.rsplit_once('/') {
        Some(("", name)) => ("/".to_owned(), name),
        Some((parent, name)) => (parent.to_owned(), name),
        None => ("/".to_owned(), path),
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn connect(
        &mut self,
        host: &str,
        _port: u16,
        _timeout: Duration,
        _secure: bool,
    ) -> TransportResult<()> {
        if host == "unreachable.invalid" {
            return Err(TransportError::new("could not resolve host"));
        }
        self.closed = false;
        Ok(())
    }

    async fn login(&mut self, username: &str, password: &str) -> TransportResult<()> {
        if username == USER && password == PASSWORD {
            Ok(())
        } else {
            Err(TransportError::new("530 Login incorrect"))
        }
    }

    async fn set_passive_mode(&mut self, passive: bool) -> TransportResult<()> {
        self.passive = Some(passive);
        Ok(())
    }

    async fn change_directory(&mut self, path: &str) -> TransportResult<()> {
        let target = self.resolve(path);
        self.check("cd", &target)?;
        self.require_dir(&target)?;
        self.cwd = target;
        Ok(())
    }

    async fn print_working_directory(&mut self) -> TransportResult<String> {
        Ok(self.cwd.clone())
    }

    async fn raw_list(&mut self, path: &str) -> TransportResult<Vec<String>> {
        let target = self.resolve(path);
        self.check("list", &target)?;
        let children = self.directory(&target)?;

        let mut lines = Vec::new();
        if !self.windows {
            lines.push(format!("total {}", children.len()));
        }
        if self.list_pseudo {
            lines.push(self.listing_line(".", &Node::Directory(Vec::new())));
            lines.push(self.listing_line("..", &Node::Directory(Vec::new())));
        }
        for name in &children {
            let node = &self.nodes[&join_abs(&target, name)];
            lines.push(self.listing_line(name, node));
        }
        Ok(lines)
    }

    async fn name_list(&mut self, path: &str) -> TransportResult<Vec<String>> {
        let target = self.resolve(path);
        self.check("nlist", &target)?;
        self.directory(&target)
    }

    async fn make_directory(&mut self, name: &str) -> TransportResult<()> {
        let target = self.resolve(name);
        self.check("mkdir", &target)?;
        if self.nodes.contains_key(&target) {
            return Err(TransportError::new(format!("550 {target}: exists")));
        }
        let (parent, leaf) = split(&target);
        self.require_dir(&parent)?;
        self.attach(&parent, leaf);
        self.nodes.insert(target.clone(), Node::Directory(Vec::new()));
        self.journal.push(format!("mkdir {target}"));
        Ok(())
    }

    async fn remove_directory(&mut self, path: &str) -> TransportResult<()> {
        let target = self.resolve(path);
        self.check("rmdir", &target)?;
        if !self.directory(&target)?.is_empty() {
            return Err(TransportError::new(format!("550 {target}: not empty")));
        }
        self.detach(&target);
        self.journal.push(format!("rmdir {target}"));
        Ok(())
    }

    async fn delete_file(&mut self, path: &str) -> TransportResult<()> {
        let target = self.resolve(path);
        self.check("delete", &target)?;
        if self.content(&target).is_none() && !self.is_link(&target) {
            return Err(TransportError::new(format!("550 {target}: no such file")));
        }
        self.detach(&target);
        self.journal.push(format!("delete {target}"));
        Ok(())
    }

    async fn rename(&mut self, from: &str, to: &str) -> TransportResult<()> {
        let source = self.resolve(from);
        let destination = self.resolve(to);
        self.check("rename", &source)?;
        if self.is_dir(&source) {
            return Err(TransportError::new("550 renaming directories is not supported"));
        }
        let node = self
            .nodes
            .get(&source)
            .cloned()
            .ok_or_else(|| TransportError::new(format!("550 {source}: no such file")))?;
        self.detach(&source);
        let (parent, leaf) = split(&destination);
        self.attach(&parent, leaf);
        self.nodes.insert(destination, node);
        Ok(())
    }

    async fn change_permissions(&mut self, path: &str, mode: Permissions) -> TransportResult<()> {
        let target = self.resolve(path);
        self.check("chmod", &target)?;
        self.permissions.insert(target, mode.bits());
        Ok(())
    }

    async fn upload_stream(
        &mut self,
        path: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        _mode: TransferMode,
    ) -> TransportResult<()> {
        let target = self.resolve(path);
        self.check("upload", &target)?;
        let (parent, leaf) = split(&target);
        self.require_dir(&parent)?;

        let mut data = Vec::new();
        source.read_to_end(&mut data).await?;

        self.attach(&parent, leaf);
        self.nodes.insert(target.clone(), Node::File(data));
        self.journal.push(format!("upload {target}"));
        Ok(())
    }

    async fn download_stream(
        &mut self,
        path: &str,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
        _mode: TransferMode,
    ) -> TransportResult<()> {
        let target = self.resolve(path);
        self.check("download", &target)?;
        let data = self
            .read(&target)
            .ok_or_else(|| TransportError::new(format!("550 {target}: no such file")))?
            .to_vec();

        sink.write_all(&data).await?;
        sink.flush().await?;
        Ok(())
    }

    async fn size(&mut self, path: &str) -> TransportResult<i64> {
        let target = self.resolve(path);
        Ok(self
            .content(&target)
            .map_or(-1, |data| i64::try_from(data.len()).unwrap_or(i64::MAX)))
    }

    async fn system_type(&mut self) -> TransportResult<String> {
        Ok(self.system_type.clone())
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.closed = true;
        Ok(())
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn options() -> ConnectOptions {
    ConnectOptions {
        username: USER.to_owned(),
        password: PASSWORD.to_owned(),
        ..ConnectOptions::default()
    }
}

pub async fn connected(transport: MemoryTransport) -> anyhow::Result<FtpClient<MemoryTransport>> {
    init_logger();
    let mut client = FtpClient::new(transport, options());
    client.connect().await?;
    Ok(client)
}

/// A small remote project: two files, a nested directory and an empty one.
pub fn sample_tree(root: &str) -> MemoryTransport {
    MemoryTransport::unix()
        .file(&format!("{root}/file.txt"), b"top level")
        .file(&format!("{root}/sub1/file1.txt"), b"first")
        .file(&format!("{root}/sub1/file2.txt"), b"second")
        .dir(&format!("{root}/sub_empty"))
}
