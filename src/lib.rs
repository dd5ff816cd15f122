//! Snapshot a directory tree with per-file size, modification time and an
//! optional SHA-256 digest, then render it as text lines.

pub mod digest;
pub mod error;
pub mod render;
pub mod scanner;
pub mod stats;
pub mod tree;
pub mod types;

pub use digest::compute_sha256;
pub use error::{IndexError, Result};
pub use render::{format_record, render};
pub use scanner::list_files;
pub use tree::{IndexOptions, build_index, build_index_with};
pub use types::{DirectoryNode, FileRecord};
