// src/fs/mod.rs

//! Read-only filesystem seam used by the hasher.
//!
//! Watchers only ever need to read the raw bytes of a watched file, so the
//! trait is deliberately narrow. Tests swap in [`mock::MockFileSystem`] to
//! drive read failures and content changes without touching the disk.

use std::fmt::Debug;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Open a file for streaming reads.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(file))
    }
}
