use crate::{ExportKind, ImportType, parse_exports, parse_imports};

#[test]
fn parses_named_imports_with_source_side_names() {
    let imports = parse_imports("import { a, b as c } from './m';");

    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].source, "./m");
    assert_eq!(imports[0].import_type, ImportType::Named);
    assert_eq!(imports[0].specifiers, vec!["a", "b"]);
    assert_eq!(imports[0].line, 1);
}

#[test]
fn parses_default_namespace_and_side_effect_imports() {
    let source = "\
import React from 'react';
import * as utils from \"./utils\";
import './polyfills';
";
    let imports = parse_imports(source);

    assert_eq!(imports.len(), 3);

    assert_eq!(imports[0].import_type, ImportType::Default);
    assert_eq!(imports[0].source, "react");
    assert_eq!(imports[0].specifiers, vec!["default"]);

    assert_eq!(imports[1].import_type, ImportType::Namespace);
    assert_eq!(imports[1].source, "./utils");
    assert_eq!(imports[1].specifiers, vec!["utils"]);
    assert_eq!(imports[1].line, 2);

    assert_eq!(imports[2].import_type, ImportType::SideEffect);
    assert_eq!(imports[2].source, "./polyfills");
    assert!(imports[2].specifiers.is_empty());
}

#[test]
fn mixed_default_and_named_import_is_named() {
    let imports = parse_imports("import React, { useState as useS, useEffect } from 'react';");

    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].import_type, ImportType::Named);
    assert_eq!(imports[0].specifiers, vec!["default", "useState", "useEffect"]);
}

#[test]
fn type_only_imports_are_parsed_like_values() {
    let imports = parse_imports(
        "import type { Props } from './types';\nimport { type State, render } from './view';",
    );

    assert_eq!(imports[0].specifiers, vec!["Props"]);
    assert_eq!(imports[1].specifiers, vec!["State", "render"]);
}

#[test]
fn multi_line_and_dynamic_imports_are_not_recognized() {
    let source = "\
import {
  a,
  b,
} from './m';
const lazy = import('./lazy');
const cjs = require('./cjs');
";
    assert!(parse_imports(source).is_empty());
}

#[test]
fn parses_declaration_exports() {
    let source = "\
export function plain(a, b) {}
export async function load() {}
export class Widget {}
export abstract class Base {}
export interface Props {}
export type Id = string;
export const MAX = 10;
export let counter = 0;
export var legacy = 1;
export enum Color { Red }
export const enum Flag { On }
";
    let exports = parse_exports(source);
    let summary: Vec<(&str, ExportKind, usize)> = exports
        .iter()
        .map(|e| (e.name.as_str(), e.kind, e.line))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("plain", ExportKind::Function, 1),
            ("load", ExportKind::Function, 2),
            ("Widget", ExportKind::Class, 3),
            ("Base", ExportKind::Class, 4),
            ("Props", ExportKind::Interface, 5),
            ("Id", ExportKind::Type, 6),
            ("MAX", ExportKind::Const, 7),
            ("counter", ExportKind::Const, 8),
            ("legacy", ExportKind::Const, 9),
            ("Color", ExportKind::Enum, 10),
            ("Flag", ExportKind::Enum, 11),
        ]
    );
    assert!(exports.iter().all(|e| !e.is_re_export));
}

#[test]
fn parses_default_export() {
    let exports = parse_exports("export default function App() {}");

    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].name, "default");
    assert_eq!(exports[0].kind, ExportKind::Default);
    assert!(exports[0].is_default());
    assert!(!parse_exports("export function App() {}")[0].is_default());
}

#[test]
fn export_list_uses_exported_side_names() {
    let exports = parse_exports("export { a, b as c };");

    let names: Vec<&str> = exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c"]);
    assert!(exports.iter().all(|e| !e.is_re_export && e.line == 1));
}

#[test]
fn re_exports_record_source_and_exported_names() {
    let exports = parse_exports("export { a as b, c } from './inner';");

    assert_eq!(exports.len(), 2);
    assert_eq!(exports[0].name, "b");
    assert_eq!(exports[1].name, "c");
    for export in &exports {
        assert!(export.is_re_export);
        assert_eq!(export.original_source.as_deref(), Some("./inner"));
    }
}

#[test]
fn alias_direction_differs_between_import_and_re_export() {
    let line = "{ original as renamed } from './m';";
    let imports = parse_imports(&format!("import {line}"));
    let exports = parse_exports(&format!("export {line}"));

    assert_eq!(imports[0].specifiers, vec!["original"]);
    assert_eq!(exports[0].name, "renamed");
}

#[test]
fn star_exports_and_commented_lines_are_ignored() {
    let source = "\
export * from './all';
// export const hidden = 1;
/* export function alsoHidden() {} */
";
    assert!(parse_exports(source).is_empty());
}

#[test]
fn windows_line_endings_keep_line_numbers() {
    let exports = parse_exports("const a = 1;\r\nexport const b = 2;\r\n");

    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].name, "b");
    assert_eq!(exports[0].line, 2);
}
