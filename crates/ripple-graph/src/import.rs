use serde::{Deserialize, Serialize};

/// Whether a module specifier is relative (`./x`, `../x`, `.`). Only these are
/// resolved against the graph; everything else is an external package.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// Syntactic form of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportType {
    /// `import { a, b as c } from 'm'`
    Named,
    /// `import X from 'm'`
    Default,
    /// `import * as X from 'm'`
    Namespace,
    /// `import 'm'`
    SideEffect,
}

impl ImportType {
    /// Namespace imports reach the whole export surface of their source.
    pub fn references_all_exports(&self) -> bool {
        matches!(self, ImportType::Namespace)
    }
}

/// One parsed import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReference {
    /// Module specifier exactly as written (`./utils`, `react`).
    pub source: String,
    /// Names as the source module exports them. Local aliases are dropped,
    /// default imports record `default`, namespace imports record the local
    /// binding and side-effect imports record nothing.
    pub specifiers: Vec<String>,
    pub import_type: ImportType,
    /// 1-based line number.
    pub line: usize,
}

impl ImportReference {
    pub fn new(
        source: impl Into<String>,
        specifiers: Vec<String>,
        import_type: ImportType,
        line: usize,
    ) -> Self {
        Self {
            source: source.into(),
            specifiers,
            import_type,
            line,
        }
    }

    /// Relative specifiers are the only ones resolved against the graph.
    pub fn is_relative(&self) -> bool {
        is_relative_specifier(&self.source)
    }

    /// Whether this import can observe `symbol` from its source module.
    pub fn references(&self, symbol: &str) -> bool {
        self.import_type.references_all_exports() || self.specifiers.iter().any(|s| s == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_specifiers() {
        for specifier in [".", "./a", "../lib/b", ".hidden"] {
            assert!(is_relative_specifier(specifier), "{specifier}");
        }
        for specifier in ["react", "@scope/pkg", "node:path", "/abs/path"] {
            assert!(!is_relative_specifier(specifier), "{specifier}");
        }

        let import = ImportReference::new("../util", vec!["x".into()], ImportType::Named, 1);
        assert!(import.is_relative());
        assert!(import.references("x"));
        assert!(!import.references("y"));
    }
}
