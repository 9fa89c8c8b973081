use std::path::PathBuf;
use thiserror::Error;

/// Typed errors for archive and restore operations.
/// `anyhow` wraps these at the CLI boundary; inside the library
/// they let callers tell a rejected call apart from a failed copy.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Caller passed a blank argument
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// The tree to relocate does not exist
    #[error("Source directory does not exist or could not be found: '{}'", .path.display())]
    SourceMissing { path: PathBuf },

    /// The path to relocate is a file, not a directory
    #[error("Not a directory: '{}'", .path.display())]
    NotADirectory { path: PathBuf },

    /// Destination would be the source itself or nested inside it
    #[error("Refusing to relocate '{}' into itself ('{}')", .source_path.display(), .destination.display())]
    Overlap {
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// Path must never be moved (filesystem root, home directory)
    #[error("Refusing to relocate protected path: '{}'", .path.display())]
    Protected { path: PathBuf },

    /// File system operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the call was rejected before anything was touched
    pub fn is_rejection(&self) -> bool {
        matches!(self, ArchiveError::InvalidArgument { .. })
    }
}

pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
