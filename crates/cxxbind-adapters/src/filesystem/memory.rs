//! In-memory filesystem adapter for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use cxxbind_core::application::ports::Filesystem;
use cxxbind_core::error::CxxbindResult;

/// In-memory filesystem for testing. Clones share the same file map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a file so it `exists()` as an input.
    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.inner.write() {
            files.insert(path.into(), content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let files = self.inner.read().ok()?;
        files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .inner
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }
}

impl Filesystem for MemoryFilesystem {
    fn write_file(&self, path: &Path, content: &str) -> CxxbindResult<()> {
        if let Ok(mut files) = self.inner.write() {
            files.insert(path.to_path_buf(), content.to_string());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let fs = MemoryFilesystem::new();
        let clone = fs.clone();
        fs.write_file(Path::new("/out/a.ts"), "content").unwrap();
        assert!(clone.exists(Path::new("/out/a.ts")));
        assert_eq!(clone.read_file(Path::new("/out/a.ts")).as_deref(), Some("content"));
    }

    #[test]
    fn seeded_inputs_exist() {
        let fs = MemoryFilesystem::new();
        fs.seed("/src/engine.h", "class Engine {};");
        assert!(fs.exists(Path::new("/src/engine.h")));
        assert_eq!(fs.list_files(), vec![PathBuf::from("/src/engine.h")]);
    }
}
