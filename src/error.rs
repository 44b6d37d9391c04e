//! Error kinds produced by the walk, hashing and collection stages.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a scan. Carried inside a [`FileResult`](crate::FileResult) while it travels
/// through the pipeline, and returned by [`scan_dir`](crate::scan_dir) on fail-fast abort.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Open or read failure while hashing (or verifying) a file.
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Traversal failure that is neither a missing path nor a permission problem (e.g. loop, dangling root).
    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

impl ScanError {
    /// Wrap an I/O error raised while reading `path`.
    pub fn io(path: &Path, source: io::Error) -> Self {
        ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify a walkdir failure by its underlying io kind.
    pub fn from_walk(err: walkdir::Error) -> Self {
        let kind = err.io_error().map(io::Error::kind);
        match (kind, err.path().map(Path::to_path_buf)) {
            (Some(io::ErrorKind::NotFound), Some(path)) => ScanError::PathNotFound(path),
            (Some(io::ErrorKind::PermissionDenied), Some(path)) => ScanError::PermissionDenied(path),
            _ => ScanError::Walk(err),
        }
    }
}
