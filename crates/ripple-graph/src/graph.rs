//! Immutable dependency graph snapshot.
//!
//! A [`DependencyGraph`] is assembled in one pass from parsed nodes: the
//! reverse `dependents` index is derived inside [`DependencyGraph::from_nodes`]
//! so a published graph never holds a forward edge without its reverse edge.
//! Rebuilding produces a new snapshot; existing ones are never mutated.

use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::export::ExportReference;
use crate::import::ImportReference;
use crate::resolver::PathResolver;

/// Parsed imports and exports of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Root-relative graph key.
    pub file: String,
    pub imports: Vec<ImportReference>,
    pub exports: Vec<ExportReference>,
}

impl DependencyNode {
    pub fn new(
        file: impl Into<String>,
        imports: Vec<ImportReference>,
        exports: Vec<ExportReference>,
    ) -> Self {
        Self {
            file: file.into(),
            imports,
            exports,
        }
    }

    pub fn exports_symbol(&self, name: &str) -> bool {
        self.exports.iter().any(|e| e.name == name)
    }
}

/// Aggregate counts over a graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub file_count: usize,
    pub total_imports: usize,
    pub total_exports: usize,
    /// `None` until a graph has been built.
    pub last_built: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: FxHashMap<String, DependencyNode>,
    dependents: FxHashMap<String, BTreeSet<String>>,
    resolver: PathResolver,
    last_built: DateTime<Utc>,
    built_at: Instant,
}

impl DependencyGraph {
    /// Assemble a snapshot, deriving the reverse index from every relative
    /// import of every node.
    pub fn from_nodes<I>(nodes: I, resolver: PathResolver) -> Self
    where
        I: IntoIterator<Item = DependencyNode>,
    {
        let nodes: FxHashMap<String, DependencyNode> = nodes
            .into_iter()
            .map(|node| (node.file.clone(), node))
            .collect();

        let mut dependents: FxHashMap<String, BTreeSet<String>> = FxHashMap::default();
        for node in nodes.values() {
            for import in node.imports.iter().filter(|i| i.is_relative()) {
                let target = resolver
                    .resolve_import_path(&node.file, &import.source, |key| nodes.contains_key(key));
                dependents
                    .entry(target)
                    .or_default()
                    .insert(node.file.clone());
            }
        }

        Self {
            nodes,
            dependents,
            resolver,
            last_built: Utc::now(),
            built_at: Instant::now(),
        }
    }

    pub fn nodes(&self) -> &FxHashMap<String, DependencyNode> {
        &self.nodes
    }

    pub fn node(&self, file: &str) -> Option<&DependencyNode> {
        self.nodes.get(file)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.nodes.contains_key(file)
    }

    /// Reverse index: file key to the files importing it.
    pub fn dependents(&self) -> &FxHashMap<String, BTreeSet<String>> {
        &self.dependents
    }

    /// Files that import `file` directly.
    pub fn dependents_of(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.dependents.get(file)
    }

    /// Resolve an import specifier written in `importer` against this graph.
    pub fn resolve(&self, importer: &str, specifier: &str) -> String {
        self.resolver
            .resolve_import_path(importer, specifier, |key| self.nodes.contains_key(key))
    }

    /// Graph keys `file` imports through relative specifiers.
    pub fn dependencies_of(&self, file: &str) -> Vec<String> {
        let Some(node) = self.nodes.get(file) else {
            return Vec::new();
        };
        let targets: BTreeSet<String> = node
            .imports
            .iter()
            .filter(|i| i.is_relative())
            .map(|i| self.resolve(file, &i.source))
            .collect();
        targets.into_iter().collect()
    }

    /// Every file that reaches `file` through one or more imports, sorted.
    /// The file itself is excluded even when it sits on a cycle.
    pub fn transitive_dependents(&self, file: &str) -> Vec<String> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(file);

        while let Some(current) = queue.pop_front() {
            if let Some(importers) = self.dependents.get(current) {
                for importer in importers {
                    if importer != file && seen.insert(importer.as_str()) {
                        queue.push_back(importer.as_str());
                    }
                }
            }
        }

        let mut result: Vec<String> = seen.into_iter().map(String::from).collect();
        result.sort();
        result
    }

    pub fn file_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of (importer, target) pairs in the reverse index.
    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(BTreeSet::len).sum()
    }

    pub fn last_built(&self) -> DateTime<Utc> {
        self.last_built
    }

    pub(crate) fn built_at(&self) -> Instant {
        self.built_at
    }

    /// A graph is fresh while its age is below `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.built_at.elapsed() < ttl
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            file_count: self.file_count(),
            total_imports: self.nodes.values().map(|n| n.imports.len()).sum(),
            total_exports: self.nodes.values().map(|n| n.exports.len()).sum(),
            last_built: Some(self.last_built),
        }
    }
}
