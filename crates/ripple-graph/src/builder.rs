//! Cached graph construction.
//!
//! [`GraphBuilder`] is the graph service: it owns the configuration, the host
//! runtime and the current snapshot. `build_graph` serves the cached snapshot
//! while it is younger than the configured TTL, otherwise it walks, parses and
//! resolves the project and swaps in a new snapshot as a whole.
//!
//! Rebuilds are single-flight. Callers that arrive while a rebuild is running
//! wait for it and then take its result instead of walking the tree again.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::config::GraphConfig;
use crate::graph::{DependencyGraph, DependencyNode, GraphStats};
use crate::parser::{parse_exports, parse_imports};
use crate::resolver::PathResolver;
use crate::runtime::{NativeRuntime, Runtime};
use crate::walker::SourceFileWalker;
use crate::{Error, Result};

#[derive(Debug)]
pub struct GraphBuilder {
    config: GraphConfig,
    runtime: Arc<dyn Runtime>,
    resolver: PathResolver,
    walker: SourceFileWalker,
    cache: RwLock<Option<Arc<DependencyGraph>>>,
    rebuild_lock: Mutex<()>,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig, runtime: Arc<dyn Runtime>) -> Self {
        let resolver = PathResolver::new(config.root.clone());
        let walker = SourceFileWalker::new(&config);
        Self {
            config,
            runtime,
            resolver,
            walker,
            cache: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Builder over the operating system filesystem.
    pub fn native(config: GraphConfig) -> Self {
        Self::new(config, Arc::new(NativeRuntime::new()))
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Last published snapshot, if any. Never triggers a build.
    pub fn get_graph(&self) -> Option<Arc<DependencyGraph>> {
        self.cache.read().clone()
    }

    /// Drop the cached snapshot so the next request rebuilds.
    pub fn invalidate(&self) {
        self.cache.write().take();
    }

    fn fresh_graph(&self) -> Option<Arc<DependencyGraph>> {
        self.get_graph()
            .filter(|graph| graph.is_fresh(self.config.cache_ttl()))
    }

    /// Return the dependency graph, rebuilding it when stale or forced.
    ///
    /// Fails only when the configured root is not a readable directory;
    /// unreadable files and directories inside it are skipped.
    pub async fn build_graph(&self, force_rebuild: bool) -> Result<Arc<DependencyGraph>> {
        let requested_at = Instant::now();

        if !force_rebuild {
            if let Some(graph) = self.fresh_graph() {
                tracing::debug!(files = graph.file_count(), "serving cached dependency graph");
                return Ok(graph);
            }
        }

        let _guard = self.rebuild_lock.lock().await;

        // A rebuild that finished while we waited is newer than this request
        if let Some(graph) = self.get_graph() {
            if graph.built_at() >= requested_at {
                tracing::debug!(
                    files = graph.file_count(),
                    "reusing dependency graph from concurrent rebuild"
                );
                return Ok(graph);
            }
        }

        let graph = Arc::new(self.rebuild().await?);
        *self.cache.write() = Some(Arc::clone(&graph));
        Ok(graph)
    }

    async fn rebuild(&self) -> Result<DependencyGraph> {
        let started = Instant::now();
        let root = self.resolver.root();

        match self.runtime.metadata(root).await {
            Ok(metadata) if metadata.is_dir => {}
            Ok(_) => {
                return Err(Error::InvalidRoot {
                    path: root.to_path_buf(),
                    reason: "not a directory".to_string(),
                });
            }
            Err(e) => {
                return Err(Error::InvalidRoot {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }

        let files = self.walker.walk(self.runtime.as_ref(), root).await;
        let mut nodes = Vec::with_capacity(files.len());
        for file in &files {
            if let Some(node) = self.parse_key(file).await {
                nodes.push(node);
            }
        }

        let graph = DependencyGraph::from_nodes(nodes, self.resolver.clone());
        tracing::info!(
            files = graph.file_count(),
            edges = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dependency graph rebuilt"
        );
        Ok(graph)
    }

    /// Parse one file into a node. `None` when it is missing, not a regular
    /// file, or unreadable.
    pub async fn parse_file(&self, file: impl AsRef<Path>) -> Option<DependencyNode> {
        let key = self.resolver.normalize_path(file);
        self.parse_key(&key).await
    }

    async fn parse_key(&self, key: &str) -> Option<DependencyNode> {
        let path = self.resolver.absolute(key);

        match self.runtime.metadata(&path).await {
            Ok(metadata) if metadata.is_file => {}
            Ok(_) => return None,
            Err(e) => {
                tracing::debug!(file = key, error = %e, "skipping file");
                return None;
            }
        }

        let bytes = match self.runtime.read_file(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(file = key, error = %e, "skipping unreadable file");
                return None;
            }
        };

        let content = String::from_utf8_lossy(&bytes);
        Some(DependencyNode::new(
            key,
            parse_imports(&content),
            parse_exports(&content),
        ))
    }

    /// Graph key for a file path.
    pub fn normalize_path(&self, file: impl AsRef<Path>) -> String {
        self.resolver.normalize_path(file)
    }

    /// Resolve a specifier against the cached snapshot's nodes. Without a
    /// snapshot nothing is known and the extensionless path comes back.
    pub fn resolve_import_path(&self, importer: &str, specifier: &str) -> String {
        match self.get_graph() {
            Some(graph) => graph.resolve(importer, specifier),
            None => self
                .resolver
                .resolve_import_path(importer, specifier, |_| false),
        }
    }

    /// Counts over the cached snapshot; zeros before the first build.
    pub fn get_graph_stats(&self) -> GraphStats {
        self.get_graph()
            .map(|graph| graph.stats())
            .unwrap_or_default()
    }
}
