//! In-memory runtime for tests.
//!
//! `MemoryRuntime` keeps a virtual project tree in memory and counts how often
//! the engine lists directories and reads files, which is how cache and
//! single-flight behavior is observed without timing tricks. Every
//! `read_dir` yields to the scheduler once so concurrent callers interleave the
//! way they would on real I/O.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[derive(Debug)]
pub struct MemoryRuntime {
    root: PathBuf,
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
    unreadable: RwLock<BTreeSet<PathBuf>>,
    read_dir_calls: AtomicUsize,
    read_file_calls: AtomicUsize,
}

impl MemoryRuntime {
    /// Create an empty project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut dirs = BTreeSet::new();
        dirs.insert(root.clone());
        Self {
            root,
            files: RwLock::new(BTreeMap::new()),
            dirs: RwLock::new(dirs),
            unreadable: RwLock::new(BTreeSet::new()),
            read_dir_calls: AtomicUsize::new(0),
            read_file_calls: AtomicUsize::new(0),
        }
    }

    /// Create a project from `(root-relative path, content)` pairs.
    pub fn with_files(root: impl Into<PathBuf>, files: &[(&str, &str)]) -> Self {
        let runtime = Self::new(root);
        for (path, content) in files {
            runtime.add_file(path, content);
        }
        runtime
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add or overwrite a file, creating its parent directories.
    pub fn add_file(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        let mut dirs = self.dirs.write();
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if !dir.starts_with(&self.root) {
                break;
            }
            dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.write().insert(path, content.as_bytes().to_vec());
    }

    pub fn remove_file(&self, relative: &str) {
        self.files.write().remove(&self.root.join(relative));
    }

    /// Make a directory fail every listing with an I/O error.
    pub fn deny_dir(&self, relative: &str) {
        let path = self.root.join(relative);
        self.dirs.write().insert(path.clone());
        self.unreadable.write().insert(path);
    }

    pub fn read_dir_calls(&self) -> usize {
        self.read_dir_calls.load(Ordering::SeqCst)
    }

    pub fn read_file_calls(&self) -> usize {
        self.read_file_calls.load(Ordering::SeqCst)
    }

    fn child_name(dir: &Path, candidate: &Path) -> Option<String> {
        let rest = candidate.strip_prefix(dir).ok()?;
        match rest.components().next()? {
            Component::Normal(name) => name.to_str().map(String::from),
            _ => None,
        }
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        self.read_dir_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.unreadable.read().contains(path) {
            return Err(RuntimeError::Io(format!(
                "Permission denied: {}",
                path.display()
            )));
        }
        if !self.dirs.read().contains(path) {
            return Err(RuntimeError::FileNotFound(path.to_path_buf()));
        }

        let mut names = BTreeSet::new();
        for file in self.files.read().keys() {
            if let Some(name) = Self::child_name(path, file) {
                names.insert(name);
            }
        }
        for dir in self.dirs.read().iter() {
            if dir.as_path() != path {
                if let Some(name) = Self::child_name(path, dir) {
                    names.insert(name);
                }
            }
        }

        Ok(names.into_iter().collect())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        if let Some(content) = self.files.read().get(path) {
            return Ok(FileMetadata {
                size: content.len() as u64,
                is_dir: false,
                is_file: true,
                modified: Some(0),
            });
        }
        if self.dirs.read().contains(path) {
            return Ok(FileMetadata {
                size: 0,
                is_dir: true,
                is_file: false,
                modified: Some(0),
            });
        }
        Err(RuntimeError::FileNotFound(path.to_path_buf()))
    }

    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.read_file_calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }
}
