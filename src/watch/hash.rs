// src/watch/hash.rs

use std::fmt;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;

use crate::errors::{Result, WatchError};
use crate::fs::FileSystem;

/// 256-bit content digest of a file at its last observation.
///
/// Only equality is meaningful; there is no ordering between digests.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; blake3::OUT_LEN]);

impl Digest {
    /// Digest of an in-memory byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; blake3::OUT_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, as written to the logs.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl From<blake3::Hash> for Digest {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Read the whole file and compute its digest.
///
/// A file that cannot be opened or read yields [`WatchError::Read`], never a
/// zero digest, so "cannot read" is never confused with "empty".
pub fn compute_file_digest(fs: &dyn FileSystem, path: &Path) -> Result<Digest> {
    let read_err = |source: std::io::Error| WatchError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut hasher = Hasher::new();
    let mut file = fs.open_read(path).map_err(read_err)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}
