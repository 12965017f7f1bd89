//! Breaking-change detection for edits to a single file.
//!
//! The exported surface of the old and new content is diffed and every
//! change is matched against the graph's reverse index to find importers
//! that can observe it. Two kinds of change are reported:
//!
//! - **removed**: an export name present before and absent after;
//! - **signature-changed**: an exported function whose declaration line,
//!   looked up at the same line number in both versions, has a different
//!   number of comma-separated tokens. This is a coarse heuristic; it misses
//!   changes that keep the arity and any declaration that moved lines.
//!
//! Namespace imports count as referencing every export of their source.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::builder::GraphBuilder;
use crate::export::ExportReference;
use crate::graph::DependencyGraph;
use crate::parser::parse_exports;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    Removed,
    SignatureChanged,
}

/// An export change that affects at least one importing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakingChange {
    pub file: String,
    pub symbol: String,
    pub change_type: ChangeType,
    /// Importing files, sorted.
    pub affected_files: Vec<String>,
    pub suggestion: String,
}

impl BreakingChange {
    fn new(file: &str, symbol: &str, change_type: ChangeType, affected_files: Vec<String>) -> Self {
        let count = affected_files.len();
        let suggestion = match change_type {
            ChangeType::Removed => format!(
                "'{symbol}' is no longer exported from {file}; update the {count} importing file(s) or restore the export"
            ),
            ChangeType::SignatureChanged => format!(
                "the parameters of '{symbol}' in {file} changed; review call sites in the {count} importing file(s)"
            ),
        };
        Self {
            file: file.to_string(),
            symbol: symbol.to_string(),
            change_type,
            affected_files,
            suggestion,
        }
    }
}

/// Files importing `target` whose imports can observe `symbol`, sorted.
///
/// Only the direct dependents recorded for `target` are inspected, and each
/// is reported once however many of its imports match.
pub fn importers_of(graph: &DependencyGraph, target: &str, symbol: &str) -> Vec<String> {
    let Some(dependents) = graph.dependents_of(target) else {
        return Vec::new();
    };

    dependents
        .iter()
        .filter(|dependent| {
            graph.node(dependent).is_some_and(|node| {
                node.imports.iter().any(|import| {
                    import.is_relative()
                        && import.references(symbol)
                        && graph.resolve(dependent, &import.source) == target
                })
            })
        })
        .cloned()
        .collect()
}

/// Number of comma-separated tokens on a line.
pub fn comma_token_count(line: &str) -> usize {
    line.split(',').count()
}

#[derive(Debug, Clone)]
pub struct ChangeImpactAnalyzer {
    builder: Arc<GraphBuilder>,
}

impl ChangeImpactAnalyzer {
    pub fn new(builder: Arc<GraphBuilder>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    /// Files importing `file` that reference `symbol`, building the graph
    /// first if there is no fresh snapshot.
    pub async fn find_files_importing(&self, file: &str, symbol: &str) -> Result<Vec<String>> {
        let graph = self.builder.build_graph(false).await?;
        let target = self.builder.normalize_path(file);
        Ok(importers_of(&graph, &target, symbol))
    }

    /// Compare two versions of `file` and report export changes that break
    /// at least one importer.
    pub async fn detect_breaking_changes(
        &self,
        file: &str,
        old_content: &str,
        new_content: &str,
    ) -> Result<Vec<BreakingChange>> {
        let old_exports = parse_exports(old_content);
        let new_exports = parse_exports(new_content);

        let removed = removed_exports(&old_exports, &new_exports);
        let changed = changed_signatures(&old_exports, &new_exports, old_content, new_content);
        if removed.is_empty() && changed.is_empty() {
            return Ok(Vec::new());
        }

        let graph = self.builder.build_graph(false).await?;
        let target = self.builder.normalize_path(file);

        let candidates = removed
            .into_iter()
            .map(|name| (name, ChangeType::Removed))
            .chain(
                changed
                    .into_iter()
                    .map(|name| (name, ChangeType::SignatureChanged)),
            );

        let mut changes = Vec::new();
        for (symbol, change_type) in candidates {
            let affected = importers_of(&graph, &target, symbol);
            if affected.is_empty() {
                continue;
            }
            tracing::debug!(
                file = %target,
                symbol,
                ?change_type,
                affected = affected.len(),
                "breaking change detected"
            );
            changes.push(BreakingChange::new(&target, symbol, change_type, affected));
        }

        Ok(changes)
    }
}

/// Old export names missing from the new version, once each, in old order.
fn removed_exports<'a>(old: &'a [ExportReference], new: &[ExportReference]) -> Vec<&'a str> {
    let current: BTreeSet<&str> = new.iter().map(|e| e.name.as_str()).collect();
    let mut seen = BTreeSet::new();
    old.iter()
        .map(|e| e.name.as_str())
        .filter(|name| !current.contains(name) && seen.insert(*name))
        .collect()
}

/// Function exports kept in both versions whose declaration line changed
/// token count, once each, in old order.
fn changed_signatures<'a>(
    old: &'a [ExportReference],
    new: &[ExportReference],
    old_content: &str,
    new_content: &str,
) -> Vec<&'a str> {
    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();
    let mut seen = BTreeSet::new();

    old.iter()
        .filter(|export| export.is_function())
        .filter(|export| {
            new.iter()
                .any(|candidate| candidate.name == export.name && candidate.is_function())
        })
        .filter(|export| {
            let index = export.line.saturating_sub(1);
            match (old_lines.get(index), new_lines.get(index)) {
                (Some(before), Some(after)) => {
                    comma_token_count(before) != comma_token_count(after)
                }
                // The line vanished; nothing comparable on it
                _ => false,
            }
        })
        .map(|export| export.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_exports_are_deduplicated() {
        let old = parse_exports("export function f(a) {}\nexport function f(a, b) {}\nexport const g = 1;");
        let new = parse_exports("export const g = 1;");
        assert_eq!(removed_exports(&old, &new), vec!["f"]);
    }

    #[test]
    fn signature_heuristic_compares_same_line() {
        let old_src = "export function bar(a) {}";
        let new_src = "export function bar(a, b) {}";
        let old = parse_exports(old_src);
        let new = parse_exports(new_src);
        assert_eq!(changed_signatures(&old, &new, old_src, new_src), vec!["bar"]);
    }

    #[test]
    fn signature_heuristic_ignores_moved_declarations() {
        let old_src = "export function bar(a) {}";
        let new_src = "// moved\nexport function bar(a, b) {}";
        let old = parse_exports(old_src);
        let new = parse_exports(new_src);
        assert!(changed_signatures(&old, &new, old_src, new_src).is_empty());
    }

    #[test]
    fn non_function_exports_have_no_signature() {
        let old_src = "export const x = [1];";
        let new_src = "export const x = [1, 2];";
        let old = parse_exports(old_src);
        let new = parse_exports(new_src);
        assert!(changed_signatures(&old, &new, old_src, new_src).is_empty());
    }

    #[test]
    fn token_count() {
        assert_eq!(comma_token_count("function f() {}"), 1);
        assert_eq!(comma_token_count("function f(a, b, c) {}"), 3);
    }
}
