//! Byte access behind a trait so assembly can be tested without disk

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only access to the raw bytes of referenced asset files
pub trait AssetSource {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads assets from the filesystem
#[derive(Debug, Default)]
pub struct FileSource;

impl AssetSource for FileSource {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory asset map, used by tests and embedding hosts
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }
}

impl AssetSource for MemorySource {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such asset: {}", path.display()),
            )
        })
    }
}
