use crate::digest::compute_sha256;
use crate::error::{IndexError, Result};
use crate::types::FileRecord;
use chrono::{DateTime, Local};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Entries directly inside `dir`, in filesystem enumeration order.
/// Links are never followed, so symlinks show up with their own file type.
fn read_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .map(|entry| entry.map_err(|err| IndexError::walk(dir, err)))
        .collect()
}

/// Records for the regular files directly inside `dir` (not recursive).
///
/// With `with_digest` every record carries a SHA-256 digest, and the first
/// file that cannot be hashed fails the whole listing.
pub fn list_files(dir: &Path, with_digest: bool) -> Result<Vec<FileRecord>> {
    debug!("listing files in {}", dir.display());

    read_entries(dir)?
        .iter()
        .filter(|e| e.file_type().is_file())
        .map(|e| file_record(e, with_digest))
        .collect()
}

/// Paths of the directories directly inside `dir`, including symlinks that
/// resolve to a directory. Linked paths are kept as `dir/name`, unresolved.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_entries(dir)?
        .into_iter()
        .filter(is_directory)
        .map(DirEntry::into_path)
        .collect())
}

fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        || (entry.path_is_symlink() && fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()))
}

fn file_record(entry: &DirEntry, with_digest: bool) -> Result<FileRecord> {
    let path = entry.path();

    let metadata = entry.metadata().map_err(|err| IndexError::walk(path, err))?;
    let modified: DateTime<Local> = metadata
        .modified()
        .map_err(|err| IndexError::io(path, err))?
        .into();

    let digest = if with_digest {
        Some(compute_sha256(path)?)
    } else {
        None
    };

    Ok(FileRecord {
        name: entry.file_name().to_string_lossy().to_string(),
        path: path.to_path_buf(),
        modified,
        size: metadata.len(),
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        fs::write(dir.path().join("b.bin"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("nested.txt"), b"nested").unwrap();
        dir
    }

    fn names(records: &[FileRecord]) -> Vec<String> {
        let mut names: Vec<_> = records.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_list_files_is_one_level() {
        let dir = fixture();
        let records = list_files(dir.path(), false).unwrap();

        assert_eq!(names(&records), vec!["a.txt", "b.bin"]);
        let a = records.iter().find(|r| r.name == "a.txt").unwrap();
        assert_eq!(a.size, 5);
    }

    #[test]
    fn test_list_files_without_digest_never_hashes() {
        let dir = fixture();
        let records = list_files(dir.path(), false).unwrap();
        assert!(records.iter().all(|r| r.digest.is_none()));
    }

    #[test]
    fn test_list_files_with_digest_always_hashes() {
        let dir = fixture();
        let records = list_files(dir.path(), true).unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            let digest = record.digest.as_deref().unwrap();
            assert_eq!(digest, compute_sha256(&dir.path().join(&record.name)).unwrap());
        }
    }

    #[test]
    fn test_list_files_is_deterministic() {
        let dir = fixture();
        let first = list_files(dir.path(), true).unwrap();
        let second = list_files(dir.path(), true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_subdirectories() {
        let dir = fixture();
        fs::create_dir(dir.path().join("other")).unwrap();

        let mut subdirs = list_subdirectories(dir.path()).unwrap();
        subdirs.sort();
        assert_eq!(
            subdirs,
            vec![dir.path().join("other"), dir.path().join("sub")]
        );
    }

    #[test]
    fn test_record_path_is_full_path() {
        let dir = fixture();
        let records = list_files(dir.path(), false).unwrap();
        for record in &records {
            assert_eq!(record.path, dir.path().join(&record.name));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_listed() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("link_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        // File links are not regular files
        let records = list_files(dir.path(), false).unwrap();
        assert_eq!(names(&records), vec!["a.txt", "b.bin"]);

        let mut subdirs = list_subdirectories(dir.path()).unwrap();
        subdirs.sort();
        assert_eq!(
            subdirs,
            vec![dir.path().join("link_dir"), dir.path().join("sub")]
        );
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let err = list_files(&missing, false).unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
        assert_eq!(err.path(), missing.as_path());
    }
}
