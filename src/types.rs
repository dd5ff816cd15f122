use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Metadata captured for one regular file at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Display name; lossy for names that are not valid UTF-8.
    pub name: String,
    /// Full path as enumerated, exact even when `name` is lossy.
    pub path: PathBuf,
    pub modified: DateTime<Local>,
    pub size: u64,
    /// Hex SHA-256, present only when hashing was requested.
    pub digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub files: Vec<FileRecord>,
    pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    #[must_use]
    pub fn new(path: PathBuf, files: Vec<FileRecord>) -> Self {
        DirectoryNode {
            path,
            files,
            children: Vec::new(),
        }
    }

    /// Every node of the tree in pre-order, starting with `self`.
    pub fn walk(&self) -> impl Iterator<Item = &DirectoryNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.walk().map(|n| n.files.len()).sum()
    }

    /// Number of descendant directories, not counting `self`.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.walk().count() - 1
    }

    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.walk()
            .flat_map(|n| n.files.iter())
            .map(|f| f.size)
            .sum()
    }
}
