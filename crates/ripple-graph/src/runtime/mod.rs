//! Host filesystem abstraction.
//!
//! The graph engine never touches `std::fs` directly. Everything it needs from
//! the host (directory listing, stat and file reads) goes through the
//! [`Runtime`] trait, so the same builder runs against the real filesystem
//! ([`NativeRuntime`]) or an in-memory tree in tests.

pub mod native;

pub use native::NativeRuntime;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File or directory does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// File metadata
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Whether this is a file
    pub is_file: bool,
    /// Last modified timestamp (milliseconds since epoch)
    pub modified: Option<u64>,
}

/// Filesystem capability required from the host.
///
/// Implementations must be cheap to share behind an `Arc`; the graph builder
/// holds one for its whole lifetime.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// List the entry names of a directory (names only, not full paths).
    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>>;

    /// Stat a path.
    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Read a file's raw bytes.
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;
}
