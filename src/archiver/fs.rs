//! Filesystem capability used by the archiver.
//!
//! Relocation and listing go through [`FileSystem`] so the copy-then-delete
//! logic can run against [`StdFs`] (real disk) or an in-memory fake in tests.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::common::errors::{ArchiveError, ArchiveResult};

/// What a directory entry is, without following directory symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Sockets, fifos, symlinks to directories, dangling symlinks
    Other,
}

/// One immediate child of a listed directory
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub modified: Option<SystemTime>,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Immediate children of `dir`, in the order the host returns them
    fn list_entries(&self, dir: &Path) -> ArchiveResult<Vec<DirEntry>>;

    fn create_dir_all(&self, path: &Path) -> ArchiveResult<()>;

    /// Copy one file, overwriting `to` if present. Returns bytes copied.
    fn copy_file(&self, from: &Path, to: &Path) -> ArchiveResult<u64>;

    fn remove_dir_all(&self, path: &Path) -> ArchiveResult<()>;

    /// Absolute form of an existing `path` with every symlink resolved
    fn canonicalize(&self, path: &Path) -> ArchiveResult<PathBuf>;

    /// Total logical size of every file under `path`
    fn tree_size(&self, path: &Path) -> u64;
}

/// The host filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_entries(&self, dir: &Path) -> ArchiveResult<Vec<DirEntry>> {
        let read = std::fs::read_dir(dir).map_err(|e| ArchiveError::io(dir, e))?;
        let mut entries = Vec::new();

        for entry in read {
            let entry = entry.map_err(|e| ArchiveError::io(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| ArchiveError::io(&path, e))?;

            // File symlinks are copied as their target's content; directory
            // symlinks are never traversed.
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_symlink() {
                match std::fs::metadata(&path) {
                    Ok(m) if m.is_file() => EntryKind::File,
                    _ => EntryKind::Other,
                }
            } else {
                EntryKind::Other
            };

            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                kind,
                modified,
            });
        }

        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> ArchiveResult<()> {
        std::fs::create_dir_all(path).map_err(|e| ArchiveError::io(path, e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ArchiveResult<u64> {
        std::fs::copy(from, to).map_err(|e| ArchiveError::io(from, e))
    }

    fn remove_dir_all(&self, path: &Path) -> ArchiveResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| ArchiveError::io(path, e))
    }

    fn canonicalize(&self, path: &Path) -> ArchiveResult<PathBuf> {
        std::fs::canonicalize(path).map_err(|e| ArchiveError::io(path, e))
    }

    fn tree_size(&self, path: &Path) -> u64 {
        WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
            .sum()
    }
}
