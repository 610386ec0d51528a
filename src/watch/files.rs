// src/watch/files.rs

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Display, Path, PathBuf};

use crate::errors::{Result, WatchError};
use crate::watch::path_utils::{base_name, containing_dir};

/// One file in the fixed watch set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    path: PathBuf,
    name: OsString,
}

impl WatchedFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = base_name(&path).ok_or_else(|| WatchError::InvalidPath(path.clone()))?;
        Ok(Self { path, name })
    }

    /// Path exactly as the caller supplied it.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name; the identity used for event matching and the hash store.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Base name for log output.
    pub fn display_name(&self) -> Display<'_> {
        Path::new(&self.name).display()
    }

    pub fn dir(&self) -> PathBuf {
        containing_dir(&self.path)
    }
}

/// Ordered, fixed set of watched files.
///
/// Construction fails fast if two paths share a base name: events are matched
/// by base name only, so such files would be indistinguishable.
#[derive(Debug, Clone, Default)]
pub struct WatchedFiles {
    files: Vec<WatchedFile>,
}

impl WatchedFiles {
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut files: Vec<WatchedFile> = Vec::new();
        let mut seen: HashMap<OsString, PathBuf> = HashMap::new();

        for path in paths {
            let file = WatchedFile::new(path)?;
            if let Some(first) = seen.get(file.name()) {
                return Err(WatchError::DuplicateBaseName {
                    name: file.name().to_string_lossy().into_owned(),
                    first: first.clone(),
                    second: file.path().to_path_buf(),
                });
            }
            seen.insert(file.name().to_os_string(), file.path().to_path_buf());
            files.push(file);
        }

        Ok(Self { files })
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First watched file whose base name equals the base name of `event_path`.
    pub fn match_event_path(&self, event_path: &Path) -> Option<&WatchedFile> {
        let name = base_name(event_path)?;
        self.files.iter().find(|f| f.name() == name.as_os_str())
    }

    /// Containing directories, deduplicated, in first-seen order.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for file in &self.files {
            let dir = file.dir();
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}
