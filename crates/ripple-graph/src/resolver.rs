//! Import specifier resolution.
//!
//! Approximates module resolution against the set of files already known to
//! the graph instead of probing the filesystem: a relative specifier is joined
//! onto its importer's directory, normalized, and, when extensionless, matched
//! against `<path>.{ts,tsx,js,jsx}` and then `<path>/index.{ts,tsx,js,jsx}`.
//! Bare specifiers (`react`, `@scope/pkg`) are external and returned as-is.

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

use crate::import::is_relative_specifier;

/// Extensions probed for extensionless relative specifiers, in order.
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Maps import specifiers and file paths to graph keys.
///
/// Graph keys are root-relative, `/`-separated paths such as `src/a.ts`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `specifier` as written in `importer` to a graph key.
    ///
    /// `is_known` reports whether a key names a node of the graph being built.
    /// When no probe candidate is known the normalized extensionless path is
    /// returned anyway; it just never matches a node.
    pub fn resolve_import_path<F>(&self, importer: &str, specifier: &str, is_known: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        if !is_relative_specifier(specifier) {
            return specifier.to_string();
        }

        let importer_dir = Path::new(importer).parent().unwrap_or(Path::new(""));
        let resolved = to_key(&importer_dir.join(specifier).clean());

        if Path::new(&resolved).extension().is_some() {
            return resolved;
        }

        let direct = RESOLVE_EXTENSIONS
            .iter()
            .filter(|_| !resolved.is_empty())
            .map(|ext| format!("{resolved}.{ext}"));
        let index = RESOLVE_EXTENSIONS.iter().map(|ext| {
            if resolved.is_empty() {
                format!("index.{ext}")
            } else {
                format!("{resolved}/index.{ext}")
            }
        });

        direct
            .chain(index)
            .find(|candidate| is_known(candidate.as_str()))
            .unwrap_or(resolved)
    }

    /// Convert a file path to its graph key.
    ///
    /// Absolute paths under the root become root-relative; relative paths
    /// pass through unchanged apart from separator normalization. Absolute
    /// paths outside the root are kept as they are.
    pub fn normalize_path(&self, file: impl AsRef<Path>) -> String {
        let file = file.as_ref();
        if file.is_absolute() {
            if let Ok(relative) = file.clean().strip_prefix(self.root.clean()) {
                return to_key(relative);
            }
        }
        to_key(file)
    }

    /// Absolute location of a graph key on disk.
    pub fn absolute(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

/// Render a path as a `/`-separated key. `.` collapses to the empty key.
pub(crate) fn to_key(path: &Path) -> String {
    let mut key = String::new();
    for component in path.components() {
        let part = match component {
            Component::CurDir => continue,
            Component::RootDir => {
                key.push('/');
                continue;
            }
            Component::Prefix(prefix) => prefix.as_os_str().to_string_lossy(),
            Component::ParentDir => "..".into(),
            Component::Normal(name) => name.to_string_lossy(),
        };
        if !key.is_empty() && !key.ends_with('/') {
            key.push('/');
        }
        key.push_str(&part);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known<'a>(keys: &'a [&'a str]) -> impl Fn(&str) -> bool + 'a {
        move |candidate| keys.iter().any(|key| *key == candidate)
    }

    #[test]
    fn bare_specifiers_are_returned_unchanged() {
        let resolver = PathResolver::new("/project");
        assert_eq!(
            resolver.resolve_import_path("src/a.ts", "react", known(&[])),
            "react"
        );
        assert_eq!(
            resolver.resolve_import_path("src/a.ts", "@scope/pkg/sub", known(&[])),
            "@scope/pkg/sub"
        );
    }

    #[test]
    fn probes_extensions_in_order() {
        let resolver = PathResolver::new("/project");
        let keys = ["src/a.tsx", "src/a.js"];
        assert_eq!(
            resolver.resolve_import_path("src/b.ts", "./a", known(&keys)),
            "src/a.tsx"
        );
    }

    #[test]
    fn direct_file_wins_over_index() {
        let resolver = PathResolver::new("/project");
        let keys = ["src/utils/index.ts", "src/utils.js"];
        assert_eq!(
            resolver.resolve_import_path("src/b.ts", "./utils", known(&keys)),
            "src/utils.js"
        );
    }

    #[test]
    fn falls_back_to_index_files() {
        let resolver = PathResolver::new("/project");
        let keys = ["src/utils/index.jsx"];
        assert_eq!(
            resolver.resolve_import_path("src/b.ts", "./utils", known(&keys)),
            "src/utils/index.jsx"
        );
    }

    #[test]
    fn resolves_parent_directories() {
        let resolver = PathResolver::new("/project");
        let keys = ["lib/shared.ts"];
        assert_eq!(
            resolver.resolve_import_path("src/deep/b.ts", "../../lib/shared", known(&keys)),
            "lib/shared.ts"
        );
    }

    #[test]
    fn importer_at_root_resolves_siblings() {
        let resolver = PathResolver::new("/project");
        assert_eq!(
            resolver.resolve_import_path("b.ts", "./a", known(&["a.ts"])),
            "a.ts"
        );
        assert_eq!(
            resolver.resolve_import_path("b.ts", ".", known(&["index.ts"])),
            "index.ts"
        );
    }

    #[test]
    fn explicit_extension_is_kept() {
        let resolver = PathResolver::new("/project");
        assert_eq!(
            resolver.resolve_import_path("src/b.ts", "./a.js", known(&["src/a.ts"])),
            "src/a.js"
        );
    }

    #[test]
    fn unresolved_returns_extensionless_path() {
        let resolver = PathResolver::new("/project");
        assert_eq!(
            resolver.resolve_import_path("src/b.ts", "./missing", known(&[])),
            "src/missing"
        );
    }

    #[test]
    fn normalize_strips_root() {
        let resolver = PathResolver::new("/project");
        assert_eq!(resolver.normalize_path("/project/src/a.ts"), "src/a.ts");
        assert_eq!(resolver.normalize_path("/project/./src/../a.ts"), "a.ts");
    }

    #[test]
    fn normalize_passes_relative_paths_through() {
        let resolver = PathResolver::new("/project");
        assert_eq!(resolver.normalize_path("src/a.ts"), "src/a.ts");
        assert_eq!(resolver.normalize_path("./src/a.ts"), "src/a.ts");
    }

    #[test]
    fn normalize_keeps_paths_outside_root() {
        let resolver = PathResolver::new("/project");
        assert_eq!(resolver.normalize_path("/elsewhere/a.ts"), "/elsewhere/a.ts");
    }
}
