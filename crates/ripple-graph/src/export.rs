use serde::{Deserialize, Serialize};

/// Declaration kind behind an export.
///
/// Named export lists (`export { a, b }`) and re-exports carry `Const`, since
/// the declaration they point at is not visible on the exporting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    Function,
    Class,
    Interface,
    Type,
    Const,
    Enum,
    Default,
}

/// One exported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReference {
    /// Exported name; `default` for default exports.
    pub name: String,
    pub kind: ExportKind,
    /// 1-based line number.
    pub line: usize,
    pub is_re_export: bool,
    /// Module a re-export forwards from.
    pub original_source: Option<String>,
}

impl ExportReference {
    pub fn new(name: impl Into<String>, kind: ExportKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
            is_re_export: false,
            original_source: None,
        }
    }

    pub fn re_export(name: impl Into<String>, line: usize, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ExportKind::Const,
            line,
            is_re_export: true,
            original_source: Some(source.into()),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self.kind, ExportKind::Default)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ExportKind::Function)
    }
}
