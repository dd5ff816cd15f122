use crate::error::{IndexError, Result};
use crate::scanner::{list_files, list_subdirectories};
use crate::types::{DirectoryNode, FileRecord};
use log::{info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
    /// Compute a SHA-256 digest for every listed file.
    pub with_digest: bool,
}

/// Build the directory tree rooted at `root` without hashing file contents.
pub fn build_index(root: &Path) -> Result<DirectoryNode> {
    build_index_with(root, &IndexOptions::default())
}

/// Build the directory tree rooted at `root`.
///
/// The root is made absolute and validated before anything is listed. The
/// walk is depth-first pre-order over an explicit stack, so tree depth is
/// bounded by memory rather than by the call stack. Symlinks to directories
/// are walked like directories; a link cycle never terminates.
///
/// A subdirectory whose contents cannot be enumerated because access is
/// denied becomes an empty node and the walk moves on to its siblings. Every
/// other failure aborts the walk, including access denied on the root itself
/// and failures reading or hashing an individual file.
pub fn build_index_with(root: &Path, options: &IndexOptions) -> Result<DirectoryNode> {
    let root_path = resolve_root(root)?;

    let (files, subdirs) = scan_level(&root_path, options)?;
    info!("indexed {}", root_path.display());
    let root_node = DirectoryNode::new(root_path, files);

    // Descendant i lives at arena index i + 1; the root is index 0.
    let mut descendants: Vec<(usize, DirectoryNode)> = Vec::new();
    let mut pending: Vec<(usize, PathBuf)> = subdirs.into_iter().rev().map(|p| (0, p)).collect();

    while let Some((parent, path)) = pending.pop() {
        let (files, subdirs) = match scan_level(&path, options) {
            Ok(level) => level,
            Err(err) if err.is_permission_denied() && err.path() == path.as_path() => {
                warn!("skipping unreadable directory {}", path.display());
                (Vec::new(), Vec::new())
            }
            Err(err) => return Err(err),
        };
        info!("indexed {}", path.display());

        let index = descendants.len() + 1;
        pending.extend(subdirs.into_iter().rev().map(|p| (index, p)));
        descendants.push((parent, DirectoryNode::new(path, files)));
    }

    Ok(assemble(root_node, descendants))
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    let path = std::path::absolute(root).map_err(|err| IndexError::io(root, err))?;

    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => Ok(path),
        Ok(_) => Err(IndexError::InvalidPath {
            path,
            reason: "not a directory",
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(IndexError::InvalidPath {
            path,
            reason: "does not exist",
        }),
        Err(err) => Err(IndexError::io(&path, err)),
    }
}

/// One directory's files followed by its subdirectory paths.
fn scan_level(path: &Path, options: &IndexOptions) -> Result<(Vec<FileRecord>, Vec<PathBuf>)> {
    let files = list_files(path, options.with_digest)?;
    let subdirs = list_subdirectories(path)?;
    Ok((files, subdirs))
}

/// Attach every descendant to its parent. Parents always sit at lower arena
/// indices than their children, so draining from the back finishes each node
/// before it is moved. Children arrive last-first and are reversed on the way.
fn assemble(mut root: DirectoryNode, mut descendants: Vec<(usize, DirectoryNode)>) -> DirectoryNode {
    while let Some((parent, mut node)) = descendants.pop() {
        node.children.reverse();
        match parent.checked_sub(1) {
            Some(i) => descendants[i].1.children.push(node),
            None => root.children.push(node),
        }
    }
    root.children.reverse();
    root
}
