//! Line-oriented import/export extraction.
//!
//! Each line is matched on its own against a small set of regular
//! expressions. This is deliberately not a JavaScript parser: statements that
//! span several lines, dynamic `import()`, `require()` and computed or
//! destructured exports are not recognized. A line that matches nothing simply
//! contributes nothing.
//!
//! Names are recorded from opposite sides of `as` depending on direction:
//!
//! - imports keep the *source-side* name (`import { a as b }` records `a`), so
//!   lookups match what the imported module actually exports;
//! - export lists and re-exports keep the *exported-side* name
//!   (`export { a as b } from './m'` records `b`), which is what importers of
//!   this module see.

use std::sync::LazyLock;

use regex::Regex;

use crate::export::{ExportKind, ExportReference};
use crate::import::{ImportReference, ImportType};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

static NAMESPACE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*import\s+(?:[\w$]+\s*,\s*)?\*\s+as\s+([\w$]+)\s+from\s+['"]([^'"]+)['"]"#)
});
static NAMED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"^\s*import\s+(?:type\s+)?(?:([\w$]+)\s*,\s*)?\{([^}]*)\}\s*from\s+['"]([^'"]+)['"]"#,
    )
});
static DEFAULT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*import\s+(?:type\s+)?([\w$]+)\s+from\s+['"]([^'"]+)['"]"#)
});
static SIDE_EFFECT_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^\s*import\s+['"]([^'"]+)['"]"#));

static RE_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*export\s+(?:type\s+)?\{([^}]*)\}\s*from\s+['"]([^'"]+)['"]"#)
});
static EXPORT_LIST: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^\s*export\s+(?:type\s+)?\{([^}]*)\}"#));
static DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| compile(r#"^\s*export\s+default\b"#));
static FUNCTION_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*export\s+(?:declare\s+)?(?:async\s+)?function\s*\*?\s*([\w$]+)"#)
});
static CLASS_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*export\s+(?:declare\s+)?(?:abstract\s+)?class\s+([\w$]+)"#)
});
static INTERFACE_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^\s*export\s+(?:declare\s+)?interface\s+([\w$]+)"#));
static ENUM_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*export\s+(?:declare\s+)?(?:const\s+)?enum\s+([\w$]+)"#)
});
static TYPE_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^\s*export\s+(?:declare\s+)?type\s+([\w$]+)"#));
static VARIABLE_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"^\s*export\s+(?:declare\s+)?(?:const|let|var)\s+([\w$]+)"#)
});

/// Which side of an `a as b` clause to keep.
#[derive(Clone, Copy)]
enum AliasSide {
    Source,
    Exported,
}

/// Split a `{ ... }` clause body into names.
fn split_clause(body: &str, side: AliasSide) -> Vec<String> {
    body.split(',')
        .filter_map(|part| {
            let part = part.trim();
            let part = part.strip_prefix("type ").map(str::trim).unwrap_or(part);
            if part.is_empty() {
                return None;
            }

            let mut halves = part.splitn(2, " as ");
            let source = halves.next().map(str::trim).unwrap_or_default();
            let name = match (side, halves.next().map(str::trim)) {
                (AliasSide::Exported, Some(alias)) if !alias.is_empty() => alias,
                _ => source,
            };

            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.trim_start().starts_with(keyword)
}

fn parse_import_line(line: &str, line_no: usize) -> Option<ImportReference> {
    if let Some(caps) = NAMESPACE_IMPORT.captures(line) {
        return Some(ImportReference::new(
            &caps[2],
            vec![caps[1].to_string()],
            ImportType::Namespace,
            line_no,
        ));
    }

    if let Some(caps) = NAMED_IMPORT.captures(line) {
        let mut specifiers = Vec::new();
        if caps.get(1).is_some() {
            specifiers.push("default".to_string());
        }
        specifiers.extend(split_clause(&caps[2], AliasSide::Source));
        return Some(ImportReference::new(
            &caps[3],
            specifiers,
            ImportType::Named,
            line_no,
        ));
    }

    if let Some(caps) = DEFAULT_IMPORT.captures(line) {
        return Some(ImportReference::new(
            &caps[2],
            vec!["default".to_string()],
            ImportType::Default,
            line_no,
        ));
    }

    SIDE_EFFECT_IMPORT
        .captures(line)
        .map(|caps| ImportReference::new(&caps[1], Vec::new(), ImportType::SideEffect, line_no))
}

/// Extract every single-line import statement from `content`, in source order.
pub fn parse_imports(content: &str) -> Vec<ImportReference> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| starts_with_keyword(line, "import"))
        .filter_map(|(idx, line)| parse_import_line(line, idx + 1))
        .collect()
}

fn parse_export_line(line: &str, line_no: usize, out: &mut Vec<ExportReference>) {
    if let Some(caps) = RE_EXPORT.captures(line) {
        let source = &caps[2];
        out.extend(
            split_clause(&caps[1], AliasSide::Exported)
                .into_iter()
                .map(|name| ExportReference::re_export(name, line_no, source)),
        );
        return;
    }

    if let Some(caps) = EXPORT_LIST.captures(line) {
        out.extend(
            split_clause(&caps[1], AliasSide::Exported)
                .into_iter()
                .map(|name| ExportReference::new(name, ExportKind::Const, line_no)),
        );
        return;
    }

    if DEFAULT_EXPORT.is_match(line) {
        out.push(ExportReference::new("default", ExportKind::Default, line_no));
        return;
    }

    // Enum precedes the variable pattern so `export const enum E` is an enum
    let declarations: [(&LazyLock<Regex>, ExportKind); 6] = [
        (&FUNCTION_EXPORT, ExportKind::Function),
        (&CLASS_EXPORT, ExportKind::Class),
        (&INTERFACE_EXPORT, ExportKind::Interface),
        (&ENUM_EXPORT, ExportKind::Enum),
        (&TYPE_EXPORT, ExportKind::Type),
        (&VARIABLE_EXPORT, ExportKind::Const),
    ];

    for (pattern, kind) in declarations {
        if let Some(caps) = pattern.captures(line) {
            out.push(ExportReference::new(&caps[1], kind, line_no));
            return;
        }
    }
}

/// Extract every single-line export from `content`, in source order.
///
/// A list export yields one record per name, all sharing the line number.
pub fn parse_exports(content: &str) -> Vec<ExportReference> {
    let mut exports = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if starts_with_keyword(line, "export") {
            parse_export_line(line, idx + 1, &mut exports);
        }
    }
    exports
}
