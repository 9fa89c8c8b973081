use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::fs::{EntryKind, FileSystem};
use crate::common::errors::{ArchiveError, ArchiveResult};
use crate::common::format;
use crate::common::safety;

/// Result of a completed copy-then-delete
#[derive(Debug, Clone, Serialize)]
pub struct Relocation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Where `source` lands when relocated under `destination_parent`.
///
/// `real_source` names the directory when `source` itself does not, as
/// with `.` or `..`.
pub fn destination_for(
    source: &Path,
    real_source: &Path,
    destination_parent: &Path,
) -> ArchiveResult<PathBuf> {
    let name = safety::normalize(source)
        .file_name()
        .or_else(|| real_source.file_name())
        .map(|n| n.to_os_string())
        .ok_or_else(|| ArchiveError::Protected {
            path: real_source.to_path_buf(),
        })?;
    Ok(destination_parent.join(name))
}

/// Resolve a path that may not exist yet: canonicalize its deepest existing
/// ancestor and re-attach the missing tail.
fn resolve_partial<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        let probe = if ancestor.as_os_str().is_empty() {
            Path::new(".")
        } else {
            ancestor
        };
        if let Ok(real) = fs.canonicalize(probe) {
            let tail = path.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return safety::normalize(&real.join(tail));
        }
    }
    safety::normalize(path)
}

/// Check everything that can be checked before a single byte is copied.
///
/// Overlap is judged on resolved paths, so a relative path or a symlink
/// naming the destination is caught as well.
pub fn validate<F: FileSystem + ?Sized>(
    fs: &F,
    source: &Path,
    destination_parent: &Path,
) -> ArchiveResult<PathBuf> {
    if safety::is_protected(source) {
        return Err(ArchiveError::Protected {
            path: source.to_path_buf(),
        });
    }
    if !fs.exists(source) {
        return Err(ArchiveError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    if !fs.is_dir(source) {
        return Err(ArchiveError::NotADirectory {
            path: source.to_path_buf(),
        });
    }

    let real_source = fs.canonicalize(source)?;
    if safety::is_protected(&real_source) {
        return Err(ArchiveError::Protected { path: real_source });
    }

    let destination = destination_for(source, &real_source, destination_parent)?;
    let real_destination = destination_for(
        source,
        &real_source,
        &resolve_partial(fs, destination_parent),
    )?;
    if safety::is_within(&real_destination, &real_source) {
        return Err(ArchiveError::Overlap {
            source_path: source.to_path_buf(),
            destination,
        });
    }
    Ok(destination)
}

/// Move a directory tree to `destination_parent/<name>`.
///
/// The whole tree is copied first; the source is removed only once the
/// copy has returned without error. A failed copy leaves the source intact
/// and whatever was already copied in place at the destination.
pub fn relocate<F: FileSystem + ?Sized>(
    fs: &F,
    source: &Path,
    destination_parent: &Path,
) -> ArchiveResult<Relocation> {
    relocate_with_progress(fs, source, destination_parent, None)
}

/// [`relocate`], ticking `progress` once per copied file
pub fn relocate_with_progress<F: FileSystem + ?Sized>(
    fs: &F,
    source: &Path,
    destination_parent: &Path,
    progress: Option<&ProgressBar>,
) -> ArchiveResult<Relocation> {
    let destination = validate(fs, source, destination_parent)?;

    tracing::info!(
        source = %source.display(),
        destination = %destination_parent.display(),
        "Copying directory..."
    );

    let mut relocation = Relocation {
        source: source.to_path_buf(),
        destination: destination.clone(),
        files_copied: 0,
        bytes_copied: 0,
    };
    copy_tree(fs, source, &destination, &mut relocation, progress)?;

    tracing::info!(
        files = relocation.files_copied,
        bytes = relocation.bytes_copied,
        path = %source.display(),
        "Finished copying files, deleting source directory"
    );

    fs.remove_dir_all(source)?;

    tracing::info!(path = %source.display(), "Directory deleted");

    Ok(relocation)
}

fn copy_tree<F: FileSystem + ?Sized>(
    fs: &F,
    src: &Path,
    dst: &Path,
    stats: &mut Relocation,
    progress: Option<&ProgressBar>,
) -> ArchiveResult<()> {
    fs.create_dir_all(dst)?;

    let entries = fs.list_entries(src)?;

    for entry in entries.iter().filter(|e| e.kind != EntryKind::Dir) {
        if entry.kind == EntryKind::Other {
            return Err(ArchiveError::io(
                &entry.path,
                std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "not a regular file or directory",
                ),
            ));
        }

        let target = dst.join(&entry.name);
        stats.bytes_copied += fs.copy_file(&entry.path, &target)?;
        stats.files_copied += 1;

        if let Some(pb) = progress {
            pb.set_message(format::truncate(&entry.name, 40));
            pb.inc(1);
        }
    }

    for entry in entries.iter().filter(|e| e.kind == EntryKind::Dir) {
        copy_tree(fs, &entry.path, &dst.join(&entry.name), stats, progress)?;
    }

    Ok(())
}
