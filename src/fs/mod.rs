// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;

use crate::errors::Result;

pub mod mock;

/// The slice of the filesystem the engine needs for staleness checks.
///
/// Artifacts are never read; existence and last-modified timestamps are the
/// whole contract.
pub trait ArtifactStore: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;

    /// Last-modified timestamp, or `None` if the path does not exist.
    fn modified_time(&self, path: &Path) -> Result<Option<SystemTime>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl ArtifactStore for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified_time(&self, path: &Path) -> Result<Option<SystemTime>> {
        match fs::metadata(path) {
            Ok(meta) => {
                let mtime = meta
                    .modified()
                    .with_context(|| format!("reading mtime of {:?}", path))?;
                Ok(Some(mtime))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
