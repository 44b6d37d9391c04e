//! Path and filter utilities

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::types::FileResult;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Dot-names are hidden, except `.` and `..`.
pub fn is_hidden_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.len() > 1 && bytes[0] == b'.' && bytes != b".."
}

/// Bytewise comparison of the OS string (not per-component, not locale-aware).
pub fn cmp_path_bytes(a: &Path, b: &Path) -> Ordering {
    a.as_os_str()
        .as_encoded_bytes()
        .cmp(b.as_os_str().as_encoded_bytes())
}

/// Canonical result order: digest bytes ascending, then path bytes ascending.
pub fn canonical_order(a: &FileResult, b: &FileResult) -> Ordering {
    a.digest
        .cmp(&b.digest)
        .then_with(|| cmp_path_bytes(&a.path, &b.path))
}

/// True if the process is running with effective uid 0 (e.g. via sudo). Root ignores file modes.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}

/// Check that `path` is an existing directory and canonicalize it.
pub fn check_root_and_canonicalize(path: &Path) -> Result<PathBuf, ScanError> {
    if path.as_os_str().is_empty() {
        return Err(ScanError::InvalidArgument("root path is empty".to_string()));
    }
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::PathNotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
        _ => ScanError::io(path, e),
    })?;
    if !meta.is_dir() {
        return Err(ScanError::InvalidArgument(format!(
            "not a directory: {}",
            path.display()
        )));
    }
    path.canonicalize().map_err(|e| ScanError::io(path, e))
}
