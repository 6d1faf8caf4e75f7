// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use super::ArtifactStore;
use crate::errors::Result;

/// In-memory [`ArtifactStore`] with settable per-path timestamps.
///
/// Clones share state, so tests can keep a handle and mutate entries while
/// a scheduler holds another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    mtimes: Arc<Mutex<HashMap<PathBuf, SystemTime>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update an entry with an mtime of `UNIX_EPOCH + secs`.
    ///
    /// Tests express relative ages as plain second offsets.
    pub fn touch_at(&self, path: impl AsRef<Path>, secs: u64) {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        self.mtimes
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), mtime);
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.mtimes.lock().unwrap().remove(path.as_ref());
    }
}

impl ArtifactStore for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.mtimes.lock().unwrap().contains_key(path)
    }

    fn modified_time(&self, path: &Path) -> Result<Option<SystemTime>> {
        Ok(self.mtimes.lock().unwrap().get(path).copied())
    }
}
