use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IndexError {
    #[must_use]
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            IndexError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            IndexError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Map a walkdir failure, preferring the path walkdir reports over `fallback`.
    #[must_use]
    pub fn walk(fallback: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(fallback).to_path_buf();
        match err.into_io_error() {
            Some(source) => IndexError::io(&path, source),
            // Loop errors only arise when following links, which the scanner never does.
            None => IndexError::Io {
                path,
                source: io::Error::other("filesystem loop detected"),
            },
        }
    }

    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, IndexError::PermissionDenied { .. })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            IndexError::InvalidPath { path, .. }
            | IndexError::PermissionDenied { path }
            | IndexError::Io { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_maps_permission_denied() {
        let err = IndexError::io(
            Path::new("/locked"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(err.is_permission_denied());
        assert_eq!(err.path(), Path::new("/locked"));
        assert_eq!(err.to_string(), "permission denied: /locked");
    }

    #[test]
    fn test_io_keeps_other_kinds() {
        let err = IndexError::io(Path::new("/gone"), io::Error::from(io::ErrorKind::NotFound));
        assert!(!err.is_permission_denied());
        assert!(matches!(err, IndexError::Io { ref source, .. } if source.kind() == io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("/gone: "));
    }

    #[test]
    fn test_invalid_path_message_names_path() {
        let err = IndexError::InvalidPath {
            path: PathBuf::from("/nope"),
            reason: "does not exist",
        };
        assert_eq!(err.to_string(), "invalid path /nope: does not exist");
    }
}
