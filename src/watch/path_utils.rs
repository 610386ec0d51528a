// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Base name of `path`, byte-for-byte as the OS reports it.
///
/// Watched files are identified by base name alone, because raw events may
/// carry a different absolute prefix than the path the caller configured
/// (relative paths, symlinked directories, `/private/var` on macOS).
///
/// Returns `None` for paths without a final component, e.g. `/` or `..`.
pub fn base_name(path: &Path) -> Option<OsString> {
    path.file_name().map(|n| n.to_os_string())
}

/// Directory containing `path`.
///
/// A bare file name (parent = "") maps to the current directory "."
pub fn containing_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
