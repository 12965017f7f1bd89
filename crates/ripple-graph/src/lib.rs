//! # ripple-graph
//!
//! Import/export dependency graphs and change-impact analysis for
//! JavaScript/TypeScript projects.
//!
//! ## Overview
//!
//! `ripple-graph` answers one question cheaply: *if this file's exports
//! change, which files break?* It provides:
//!
//! - **Source walking**: every `.ts/.tsx/.js/.jsx/.mjs/.cjs` file under a
//!   root, skipping `node_modules`, `dist`, `build`, `.git`, `coverage`, `.next`
//! - **Line-oriented parsing**: named, default, namespace and side-effect
//!   imports; function, class, interface, type, enum, variable, list,
//!   re-export and default exports
//! - **Approximate resolution**: relative specifiers resolved against known
//!   files with extension and `index` probing; bare specifiers stay external
//! - **Cached snapshots**: an immutable graph with forward nodes and a reverse
//!   dependents index, refreshed after a TTL and rebuilt single-flight
//! - **Impact analysis**: removed exports and changed function arity mapped
//!   to the importers that observe them
//!
//! ## Architecture
//!
//! ```text
//!  ChangeImpactAnalyzer
//!          │
//!          ▼
//!  GraphBuilder ── cache: Arc<DependencyGraph>, TTL, single-flight lock
//!          │
//!          ├──▶ SourceFileWalker   (which files)
//!          ├──▶ parser             (imports/exports per file)
//!          ├──▶ PathResolver       (specifier ─▶ graph key)
//!          └──▶ dyn Runtime        (host filesystem)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ripple_graph::{ChangeImpactAnalyzer, GraphBuilder, GraphConfig};
//!
//! # async fn run() -> ripple_graph::Result<()> {
//! let builder = Arc::new(GraphBuilder::native(GraphConfig::load("./my-app")?));
//! let graph = builder.build_graph(false).await?;
//! println!("{} files", graph.file_count());
//!
//! let analyzer = ChangeImpactAnalyzer::new(Arc::clone(&builder));
//! let changes = analyzer
//!     .detect_breaking_changes(
//!         "src/a.ts",
//!         "export function foo(a, b) {}",
//!         "export function bar() {}",
//!     )
//!     .await?;
//! for change in changes {
//!     println!("{:?} {} -> {:?}", change.change_type, change.symbol, change.affected_files);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! Parsing works one line at a time. Multi-line import/export statements,
//! dynamic `import()`, `require()`, `export *` and destructured exports are
//! not recognized. Resolution ignores `tsconfig` paths and packages. Both
//! are approximations chosen for speed; results under-report rather than
//! fail.

pub mod builder;
pub mod config;
pub mod export;
pub mod graph;
pub mod impact;
pub mod import;
pub mod logging;
pub mod parser;
pub mod resolver;
pub mod runtime;
pub mod walker;

pub use builder::GraphBuilder;
pub use config::GraphConfig;
pub use export::{ExportKind, ExportReference};
pub use graph::{DependencyGraph, DependencyNode, GraphStats};
pub use impact::{BreakingChange, ChangeImpactAnalyzer, ChangeType};
pub use import::{ImportReference, ImportType, is_relative_specifier};
pub use parser::{parse_exports, parse_imports};
pub use resolver::PathResolver;
pub use runtime::{FileMetadata, NativeRuntime, Runtime, RuntimeError, RuntimeResult};
pub use walker::SourceFileWalker;

#[cfg(any(test, feature = "test-utils"))]
pub use runtime::test_utils::MemoryRuntime;

use std::path::PathBuf;

/// Error types for graph operations.
///
/// Problems inside the project (unreadable files, unparseable lines,
/// unresolvable imports) are never errors; they are skipped. These variants
/// cover caller misuse only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The project root is missing or not a directory.
    #[error("Invalid project root '{}': {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;
