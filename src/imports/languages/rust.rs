//! `use` declaration extraction, including `crate::`/`self::`/`super::`
//! paths (spec §4.3).

use super::RawImport;

pub fn extract(root: &tree_sitter::Node, source: &str) -> Vec<RawImport> {
    let mut imports = Vec::new();
    walk(root, source, &mut imports);
    imports
}

fn walk(node: &tree_sitter::Node, source: &str, out: &mut Vec<RawImport>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "use_declaration" {
            if let Some(import) = extract_use(&child, source) {
                out.push(import);
            }
        } else {
            walk(&child, source, out);
        }
    }
}

fn extract_use(node: &tree_sitter::Node, source: &str) -> Option<RawImport> {
    let text = node.utf8_text(source.as_bytes()).ok()?;
    let specifier = text
        .trim_start_matches("pub(crate) use ")
        .trim_start_matches("pub use ")
        .trim_start_matches("use ")
        .trim_end_matches(';')
        .trim()
        .to_string();

    let items = if let Some(brace) = specifier.find('{') {
        specifier[brace + 1..]
            .trim_end_matches('}')
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        vec![]
    };

    Some(RawImport {
        specifier,
        items,
        line: node.start_position().row as u32 + 1,
    })
}
