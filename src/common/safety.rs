use std::path::{Component, Path, PathBuf};

/// Root-level paths that must never be relocated.
const PROTECTED_PATHS: &[&str] = &["/", "/home", "/Users", "/Volumes", "/mnt", "/media"];

/// Check if a path is protected and should never be moved or deleted
pub fn is_protected(path: &Path) -> bool {
    let path = normalize(path);

    if path.parent().is_none() {
        return true;
    }

    if PROTECTED_PATHS.iter().any(|p| path == Path::new(p)) {
        return true;
    }

    if let Some(home) = dirs::home_dir() {
        if path == normalize(&home) {
            return true;
        }
    }

    false
}

/// True when `candidate` is `root` or lies beneath it.
///
/// Comparison is lexical after resolving `.` and `..`, so it works for
/// destinations that do not exist yet.
pub fn is_within(candidate: &Path, root: &Path) -> bool {
    normalize(candidate).starts_with(normalize(root))
}

/// Lexically normalize a path: drop `.` and resolve `..` against prior components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
