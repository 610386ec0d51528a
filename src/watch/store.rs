// src/watch/store.rs

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::watch::files::WatchedFiles;
use crate::watch::hash::{compute_file_digest, Digest};
use crate::watch::path_utils::base_name;

/// Last-known digest per watched file, keyed by base name.
///
/// Owned by exactly one watcher loop; entries are created on initial
/// population and overwritten when a change is detected, never removed.
#[derive(Debug, Default)]
pub struct HashStore {
    digests: HashMap<OsString, Digest>,
}

impl HashStore {
    pub fn new() -> Self {
        Self {
            digests: HashMap::new(),
        }
    }

    /// Hash the initial state of every watched file.
    ///
    /// Files that cannot be read are logged and left out, so their first
    /// successful read later counts as a change.
    pub fn populate(fs: &dyn FileSystem, files: &WatchedFiles) -> Self {
        let mut store = Self::new();

        for file in files.iter() {
            match compute_file_digest(fs, file.path()) {
                Ok(digest) => {
                    info!(file = %file.display_name(), digest = %digest, "hashed watched file");
                    store.digests.insert(file.name().to_os_string(), digest);
                }
                Err(err) => {
                    warn!(file = %file.display_name(), error = %err, "error reading file");
                }
            }
        }

        store
    }

    pub fn get(&self, name: impl AsRef<OsStr>) -> Option<&Digest> {
        self.digests.get(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Whether the current content of `path` differs from the stored digest.
    ///
    /// On a difference (or no stored digest) the entry is updated and `true`
    /// returned. A read failure is logged and returns `false`, leaving the
    /// previous entry in place.
    pub fn has_changed(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        let Some(name) = base_name(path) else {
            warn!(?path, "cannot check path without a file name");
            return false;
        };

        let label = Path::new(&name).display();

        let digest = match compute_file_digest(fs, path) {
            Ok(d) => d,
            Err(err) => {
                warn!(file = %label, error = %err, "error reading file");
                return false;
            }
        };

        if self.digests.get(&name) == Some(&digest) {
            debug!(file = %label, "content unchanged");
            return false;
        }

        info!(file = %label, digest = %digest, "content changed");
        self.digests.insert(name, digest);
        true
    }
}
