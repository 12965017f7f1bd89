//! Source file enumeration.
//!
//! Lists every file under the project root whose extension is configured,
//! skipping excluded directories. A directory that cannot be listed (and an
//! entry that cannot be stat'ed) is left out of the result and logged at
//! `debug`; it never fails the walk.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::config::GraphConfig;
use crate::resolver::to_key;
use crate::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct SourceFileWalker {
    extensions: FxHashSet<String>,
    excluded_dirs: FxHashSet<String>,
    exclude: Vec<String>,
}

impl SourceFileWalker {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            excluded_dirs: config.excluded_dirs.iter().cloned().collect(),
            exclude: config
                .exclude
                .iter()
                .map(|e| e.trim_matches('/').to_string())
                .collect(),
        }
    }

    /// Whether a directory (by name and root-relative key) is skipped.
    pub fn is_excluded_dir(&self, name: &str, key: &str) -> bool {
        self.excluded_dirs.contains(name)
            || self
                .exclude
                .iter()
                .any(|pattern| pattern == name || pattern == key)
    }

    /// Whether a file name carries one of the collected extensions.
    pub fn is_source_file(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }

    /// Enumerate source files under `root` as sorted root-relative keys.
    pub async fn walk(&self, runtime: &dyn Runtime, root: &Path) -> Vec<String> {
        let mut files = Vec::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        queue.push_back(root.to_path_buf());

        while let Some(dir) = queue.pop_front() {
            let entries = match runtime.read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                    continue;
                }
            };

            for name in entries {
                let path = dir.join(&name);
                let metadata = match runtime.metadata(&path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "skipping entry");
                        continue;
                    }
                };

                // Keys are relative to the walk root whether or not it is absolute
                let key = match path.strip_prefix(root) {
                    Ok(relative) => to_key(relative),
                    Err(_) => to_key(&path),
                };
                if metadata.is_dir {
                    if !self.is_excluded_dir(&name, &key) {
                        queue.push_back(path);
                    }
                } else if metadata.is_file && self.is_source_file(&name) {
                    files.push(key);
                }
            }
        }

        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_utils::MemoryRuntime;

    fn walker(config: &GraphConfig) -> SourceFileWalker {
        SourceFileWalker::new(config)
    }

    #[tokio::test]
    async fn collects_source_files_recursively() {
        let runtime = MemoryRuntime::with_files(
            "/project",
            &[
                ("index.ts", ""),
                ("src/a.tsx", ""),
                ("src/lib/b.mjs", ""),
                ("src/lib/c.cjs", ""),
                ("README.md", ""),
                ("src/styles.css", ""),
            ],
        );
        let config = GraphConfig::new("/project");

        let files = walker(&config)
            .walk(&runtime, Path::new("/project"))
            .await;

        assert_eq!(
            files,
            vec!["index.ts", "src/a.tsx", "src/lib/b.mjs", "src/lib/c.cjs"]
        );
    }

    #[tokio::test]
    async fn skips_default_excluded_directories() {
        let runtime = MemoryRuntime::with_files(
            "/project",
            &[
                ("src/a.ts", ""),
                ("node_modules/react/index.js", ""),
                ("dist/bundle.js", ""),
                ("build/out.js", ""),
                (".git/hooks/pre-commit.js", ""),
                ("coverage/lcov.js", ""),
                (".next/server.js", ""),
                ("packages/x/node_modules/y.js", ""),
            ],
        );
        let config = GraphConfig::new("/project");

        let files = walker(&config)
            .walk(&runtime, Path::new("/project"))
            .await;

        assert_eq!(files, vec!["src/a.ts"]);
    }

    #[tokio::test]
    async fn honors_caller_exclusions_by_name_and_path() {
        let runtime = MemoryRuntime::with_files(
            "/project",
            &[
                ("src/a.ts", ""),
                ("src/generated/g.ts", ""),
                ("src/legacy/l.ts", ""),
                ("lib/legacy/keep.ts", ""),
            ],
        );
        let config = GraphConfig::new("/project").with_exclude(["generated", "src/legacy"]);

        let files = walker(&config)
            .walk(&runtime, Path::new("/project"))
            .await;

        assert_eq!(files, vec!["lib/legacy/keep.ts", "src/a.ts"]);
    }

    #[tokio::test]
    async fn relative_root_yields_root_relative_keys() {
        let runtime = MemoryRuntime::with_files(
            "./my-app",
            &[("a.ts", ""), ("src/b.ts", "")],
        );
        let config = GraphConfig::new("./my-app");

        let files = walker(&config)
            .walk(&runtime, Path::new("./my-app"))
            .await;

        assert_eq!(files, vec!["a.ts", "src/b.ts"]);
    }

    #[tokio::test]
    async fn unreadable_directory_is_omitted() {
        let runtime = MemoryRuntime::with_files(
            "/project",
            &[("src/a.ts", ""), ("secret/b.ts", "")],
        );
        runtime.deny_dir("secret");
        let config = GraphConfig::new("/project");

        let files = walker(&config)
            .walk(&runtime, Path::new("/project"))
            .await;

        assert_eq!(files, vec!["src/a.ts"]);
    }

    #[tokio::test]
    async fn missing_root_yields_nothing() {
        let runtime = MemoryRuntime::new("/project");
        let config = GraphConfig::new("/elsewhere");

        let files = walker(&config)
            .walk(&runtime, Path::new("/elsewhere"))
            .await;

        assert!(files.is_empty());
    }
}
