use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use super::{error::Error, ClientResult, FtpClient};
use crate::protocol::TransferMode;

const DIR_MODIFY: &str = "20240101000000";

enum Node {
    Dir,
    File { data: Vec<u8>, modify: String },
}

/// In-memory FTP server tree used by the tests
pub(crate) struct MemoryFtp {
    nodes: BTreeMap<String, Node>,
    raw_lines: BTreeMap<String, Vec<String>>,
    failing: BTreeSet<String>,
    cwd: String,
    pub retrieved: Vec<(String, TransferMode)>,
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(pos) => &path[..pos],
        None => "/",
    }
}

impl MemoryFtp {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        let _ = nodes.insert("/".to_owned(), Node::Dir);

        Self {
            nodes,
            raw_lines: BTreeMap::new(),
            failing: BTreeSet::new(),
            cwd: "/".to_owned(),
            retrieved: Vec::new(),
        }
    }

    fn resolve(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }

        let absolute = if path.starts_with('/') {
            path.to_owned()
        } else {
            format!("{}/{}", self.cwd.trim_end_matches('/'), path)
        };

        let trimmed = absolute.trim_end_matches('/');
        Some(if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() })
    }

    pub fn add_dir(&mut self, path: &str) {
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current = format!("{current}/{part}");
            let _ = self.nodes.entry(current.clone()).or_insert(Node::Dir);
        }
    }

    pub fn add_file(&mut self, path: &str, data: &[u8], modify: &str) {
        self.add_dir(parent(path));
        let _ = self.nodes.insert(
            path.to_owned(),
            Node::File {
                data: data.to_vec(),
                modify: modify.to_owned(),
            },
        );
    }

    /// Appends a verbatim line to the listing of `dir`
    pub fn add_raw_line(&mut self, dir: &str, line: &str) {
        self.raw_lines
            .entry(dir.to_owned())
            .or_default()
            .push(line.to_owned());
    }

    /// Makes every `RETR` of `path` fail halfway through the transfer
    pub fn fail_retrieve(&mut self, path: &str) {
        let _ = self.failing.insert(path.to_owned());
    }
}

#[async_trait]
impl FtpClient for MemoryFtp {
    async fn pwd(&mut self) -> ClientResult<String> {
        Ok(self.cwd.clone())
    }

    async fn cwd(&mut self, path: &str) -> ClientResult<()> {
        match self.resolve(path) {
            Some(dir) if matches!(self.nodes.get(&dir), Some(Node::Dir)) => {
                self.cwd = dir;
                Ok(())
            }
            _ => Err(Error::Ftp(format!("550 {path}: No such directory"))),
        }
    }

    async fn list(&mut self, path: &str) -> ClientResult<Vec<String>> {
        let dir = match self.resolve(path) {
            Some(dir) if matches!(self.nodes.get(&dir), Some(Node::Dir)) => dir,
            _ => return Err(Error::Ftp(format!("550 {path}: No such directory"))),
        };

        let mut lines = vec![
            format!("type=cdir;modify={DIR_MODIFY}; ."),
            format!("type=pdir;modify={DIR_MODIFY}; .."),
        ];

        for (child, node) in &self.nodes {
            if child == &dir || parent(child) != dir {
                continue;
            }

            let name = &child[child.rfind('/').map_or(0, |pos| pos + 1)..];
            lines.push(match node {
                Node::Dir => format!("type=dir;modify={DIR_MODIFY}; {name}"),
                Node::File { data, modify } => {
                    format!("type=file;size={};modify={modify}; {name}", data.len())
                }
            });
        }

        if let Some(raw) = self.raw_lines.get(&dir) {
            lines.extend(raw.iter().cloned());
        }

        Ok(lines)
    }

    async fn retrieve(&mut self, path: &str, mode: TransferMode, local: &Path) -> ClientResult<u64> {
        self.retrieved.push((path.to_owned(), mode));

        let data = match self.resolve(path).and_then(|file| self.nodes.get(&file)) {
            Some(Node::File { data, .. }) => data,
            _ => return Err(Error::Ftp(format!("550 {path}: No such file"))),
        };

        if self.failing.contains(path) {
            tokio::fs::write(local, &data[..data.len() / 2]).await?;
            return Err(Error::Ftp(format!("451 {path}: Transfer aborted")));
        }

        tokio::fs::write(local, data).await?;
        Ok(data.len() as u64)
    }
}
