//! `import`/`export ... from` extraction for TypeScript, TSX, and JS
//! (spec §4.3).

use super::RawImport;

pub fn extract(root: &tree_sitter::Node, source: &str) -> Vec<RawImport> {
    let mut imports = Vec::new();
    walk(root, source, &mut imports);
    imports
}

fn walk(node: &tree_sitter::Node, source: &str, out: &mut Vec<RawImport>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_statement" => {
                if let Some(import) = extract_import(&child, source) {
                    out.push(import);
                }
            }
            "export_statement" => {
                if let Some(import) = extract_reexport(&child, source) {
                    out.push(import);
                } else {
                    walk(&child, source, out);
                }
            }
            _ => walk(&child, source, out),
        }
    }
}

fn extract_import(node: &tree_sitter::Node, source: &str) -> Option<RawImport> {
    let specifier = string_literal_of(node, source)?;

    let items = node
        .children(&mut node.walk())
        .find(|c| c.kind() == "import_clause")
        .map(|clause| {
            clause
                .children(&mut clause.walk())
                .filter_map(|c| match c.kind() {
                    "identifier" => c.utf8_text(source.as_bytes()).ok().map(str::to_string),
                    "import_specifier" => c
                        .child_by_field_name("name")
                        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                        .map(str::to_string),
                    "namespace_import" => c.utf8_text(source.as_bytes()).ok().map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(RawImport {
        specifier,
        items,
        line: node.start_position().row as u32 + 1,
    })
}

/// `export { x } from "mod"` / `export * from "mod"` carry the same
/// cross-file dependency as an import and are counted identically.
fn extract_reexport(node: &tree_sitter::Node, source: &str) -> Option<RawImport> {
    let specifier = string_literal_of(node, source)?;
    Some(RawImport {
        specifier,
        items: vec![],
        line: node.start_position().row as u32 + 1,
    })
}

fn string_literal_of(node: &tree_sitter::Node, source: &str) -> Option<String> {
    node.children(&mut node.walk())
        .find(|c| c.kind() == "string")
        .and_then(|s| s.utf8_text(source.as_bytes()).ok())
        .map(|s| s.trim_matches('"').trim_matches('\'').trim_matches('`').to_string())
}
