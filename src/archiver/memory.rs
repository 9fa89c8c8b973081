//! In-memory [`FileSystem`] used by the archiver's unit tests

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::fs::{DirEntry, EntryKind, FileSystem};
use crate::common::errors::{ArchiveError, ArchiveResult};
use crate::common::safety;

#[derive(Debug, Clone)]
enum Node {
    Dir { modified: SystemTime },
    File { data: Vec<u8>, modified: SystemTime },
}

/// In-memory filesystem for exercising relocation without touching disk.
///
/// Paths are absolute; `/` always exists. Listing order is lexical. There
/// are no symlinks, so canonicalizing only resolves `.` and `..`.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    fail_copies: RefCell<BTreeSet<PathBuf>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            PathBuf::from("/"),
            Node::Dir {
                modified: SystemTime::now(),
            },
        );
        Self {
            nodes: RefCell::new(nodes),
            fail_copies: RefCell::new(BTreeSet::new()),
        }
    }

    /// Add a directory (and missing parents) with the given modification time
    pub fn add_dir(&self, path: impl AsRef<Path>, modified: SystemTime) -> &Self {
        let path = path.as_ref();
        self.ensure_parents(path);
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::Dir { modified });
        self
    }

    /// Add a file (and missing parents)
    pub fn add_file(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> &Self {
        let path = path.as_ref();
        self.ensure_parents(path);
        self.nodes.borrow_mut().insert(
            path.to_path_buf(),
            Node::File {
                data: data.into(),
                modified: SystemTime::now(),
            },
        );
        self
    }

    /// Make every later copy of `path` fail with a permission error
    pub fn fail_copy_of(&self, path: impl AsRef<Path>) -> &Self {
        self.fail_copies
            .borrow_mut()
            .insert(path.as_ref().to_path_buf());
        self
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File { data, .. }) => Some(data.clone()),
            _ => None,
        }
    }

    /// Every file under `root` as (relative path, contents), sorted
    pub fn snapshot(&self, root: impl AsRef<Path>) -> Vec<(PathBuf, Vec<u8>)> {
        let root = root.as_ref();
        self.nodes
            .borrow()
            .iter()
            .filter_map(|(path, node)| match node {
                Node::File { data, .. } => path
                    .strip_prefix(root)
                    .ok()
                    .map(|rel| (rel.to_path_buf(), data.clone())),
                Node::Dir { .. } => None,
            })
            .collect()
    }

    fn ensure_parents(&self, path: &Path) {
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir {
                modified: SystemTime::now(),
            });
        }
    }

    fn not_found(path: &Path) -> ArchiveError {
        ArchiveError::io(path, io::Error::new(io::ErrorKind::NotFound, "no such file or directory"))
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir { .. }))
    }

    fn list_entries(&self, dir: &Path) -> ArchiveResult<Vec<DirEntry>> {
        let nodes = self.nodes.borrow();
        match nodes.get(dir) {
            Some(Node::Dir { .. }) => {}
            Some(Node::File { .. }) => {
                return Err(ArchiveError::io(
                    dir,
                    io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
                ))
            }
            None => return Err(Self::not_found(dir)),
        }

        Ok(nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, node)| {
                let (kind, modified) = match node {
                    Node::Dir { modified } => (EntryKind::Dir, *modified),
                    Node::File { modified, .. } => (EntryKind::File, *modified),
                };
                DirEntry {
                    name: path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string(),
                    path: path.clone(),
                    kind,
                    modified: Some(modified),
                }
            })
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> ArchiveResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        let mut missing: Vec<&Path> = Vec::new();
        for ancestor in path.ancestors() {
            match nodes.get(ancestor) {
                Some(Node::Dir { .. }) => break,
                Some(Node::File { .. }) => {
                    return Err(ArchiveError::io(
                        ancestor,
                        io::Error::new(io::ErrorKind::AlreadyExists, "file exists"),
                    ))
                }
                None => missing.push(ancestor),
            }
        }
        for dir in missing {
            nodes.insert(
                dir.to_path_buf(),
                Node::Dir {
                    modified: SystemTime::now(),
                },
            );
        }
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ArchiveResult<u64> {
        if self.fail_copies.borrow().contains(from) {
            return Err(ArchiveError::io(
                from,
                io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            ));
        }

        let mut nodes = self.nodes.borrow_mut();
        let data = match nodes.get(from) {
            Some(Node::File { data, .. }) => data.clone(),
            Some(Node::Dir { .. }) => {
                return Err(ArchiveError::io(
                    from,
                    io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
                ))
            }
            None => return Err(Self::not_found(from)),
        };

        let parent_is_dir = to
            .parent()
            .map(|p| matches!(nodes.get(p), Some(Node::Dir { .. })))
            .unwrap_or(false);
        if !parent_is_dir || matches!(nodes.get(to), Some(Node::Dir { .. })) {
            return Err(Self::not_found(to));
        }

        let len = data.len() as u64;
        nodes.insert(
            to.to_path_buf(),
            Node::File {
                data,
                modified: SystemTime::now(),
            },
        );
        Ok(len)
    }

    fn remove_dir_all(&self, path: &Path) -> ArchiveResult<()> {
        let mut nodes = self.nodes.borrow_mut();
        if !matches!(nodes.get(path), Some(Node::Dir { .. })) {
            return Err(Self::not_found(path));
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> ArchiveResult<PathBuf> {
        let resolved = safety::normalize(path);
        if resolved.is_absolute() && self.nodes.borrow().contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(Self::not_found(path))
        }
    }

    fn tree_size(&self, path: &Path) -> u64 {
        self.nodes
            .borrow()
            .iter()
            .filter(|(p, _)| p.starts_with(path))
            .map(|(_, node)| match node {
                Node::File { data, .. } => data.len() as u64,
                Node::Dir { .. } => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_listing_is_immediate_children_only() {
        let fs = MemoryFs::new();
        fs.add_file("/games/Old/bin/game.exe", "x");
        fs.add_file("/games/New/readme.txt", "y");

        let names: Vec<String> = fs
            .list_entries(Path::new("/games"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["New".to_string(), "Old".to_string()]);
    }

    #[test]
    fn test_memory_copy_requires_parent_dir() {
        let fs = MemoryFs::new();
        fs.add_file("/a/f.txt", "data");
        assert!(fs.copy_file(Path::new("/a/f.txt"), Path::new("/b/f.txt")).is_err());

        fs.create_dir_all(Path::new("/b")).unwrap();
        assert_eq!(
            fs.copy_file(Path::new("/a/f.txt"), Path::new("/b/f.txt")).unwrap(),
            4
        );
        assert_eq!(fs.read("/b/f.txt").unwrap(), b"data");
    }

    #[test]
    fn test_memory_remove_dir_all_keeps_siblings() {
        let fs = MemoryFs::new();
        fs.add_file("/games/Old/a", "1");
        fs.add_file("/games/Older/b", "2");

        fs.remove_dir_all(Path::new("/games/Old")).unwrap();
        assert!(!fs.exists(Path::new("/games/Old")));
        assert!(!fs.exists(Path::new("/games/Old/a")));
        assert!(fs.exists(Path::new("/games/Older/b")));
    }

    #[test]
    fn test_memory_tree_size() {
        let fs = MemoryFs::new();
        fs.add_file("/g/x", "12345");
        fs.add_file("/g/sub/y", "123");
        assert_eq!(fs.tree_size(Path::new("/g")), 8);
    }

    #[test]
    fn test_memory_canonicalize() {
        let fs = MemoryFs::new();
        fs.add_dir("/games/Old", SystemTime::now());

        assert_eq!(
            fs.canonicalize(Path::new("/games/./Old/../Old")).unwrap(),
            PathBuf::from("/games/Old")
        );
        assert!(fs.canonicalize(Path::new("/games/New")).is_err());
        assert!(fs.canonicalize(Path::new("Old")).is_err());
    }
}
