//! Native filesystem runtime.
//!
//! Wraps blocking `std::fs` calls in `tokio::task::spawn_blocking` so a graph
//! rebuild never stalls the async executor it runs on.

// NativeRuntime is the one place allowed to call std::fs
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Runtime backed by the operating system filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

fn map_io(path: &Path, action: &str, e: std::io::Error) -> RuntimeError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
    }
}

/// Usable entry names of a listing. A failed entry or a non UTF-8 name is
/// left out; the rest of the directory is kept.
fn entry_names<I>(dir: &Path, entries: I) -> Vec<String>
where
    I: IntoIterator<Item = std::io::Result<OsString>>,
{
    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(name) => match name.into_string() {
                Ok(name) => names.push(name),
                Err(name) => {
                    tracing::debug!(dir = %dir.display(), name = ?name, "skipping non UTF-8 entry");
                }
            },
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
            }
        }
    }
    names
}

async fn blocking<T, F>(f: F) -> RuntimeResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RuntimeResult<T> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let path: PathBuf = path.to_path_buf();

        blocking(move || {
            let entries = std::fs::read_dir(&path).map_err(|e| map_io(&path, "read directory", e))?;
            Ok(entry_names(&path, entries.map(|entry| entry.map(|e| e.file_name()))))
        })
        .await
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path: PathBuf = path.to_path_buf();

        blocking(move || {
            let metadata =
                std::fs::metadata(&path).map_err(|e| map_io(&path, "get metadata for", e))?;

            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64);

            Ok(FileMetadata {
                size: metadata.len(),
                is_dir: metadata.is_dir(),
                is_file: metadata.is_file(),
                modified,
            })
        })
        .await
    }

    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path: PathBuf = path.to_path_buf();

        blocking(move || std::fs::read(&path).map_err(|e| map_io(&path, "read", e))).await
    }
}
