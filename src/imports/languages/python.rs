//! `import` / `from ... import` extraction (spec §4.3).

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
            "import_from_statement" => {
                if let Some(import) = extract_import_from(&child, source) {
                    out.push(import);
                }
            }
            "block" | "module" => walk(&child, source, out),
            _ => walk(&child, source, out),
        }
    }
}

fn extract_import(node: &tree_sitter::Node, source: &str) -> Option<RawImport> {
    let dotted = node
        .children(&mut node.walk())
        .find(|c| c.kind() == "dotted_name" || c.kind() == "aliased_import")
        .and_then(|c| c.utf8_text(source.as_bytes()).ok())?;

    Some(RawImport {
        specifier: dotted.to_string(),
        items: vec![],
        line: node.start_position().row as u32 + 1,
    })
}

fn extract_import_from(node: &tree_sitter::Node, source: &str) -> Option<RawImport> {
    let module = node
        .child_by_field_name("module_name")
        .and_then(|m| m.utf8_text(source.as_bytes()).ok())?
        .to_string();

    let items: Vec<String> = node
        .children(&mut node.walk())
        .filter_map(|c| match c.kind() {
            "dotted_name" | "aliased_import" => c.utf8_text(source.as_bytes()).ok().map(str::to_string),
            "import_from_specifier" => c
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                .map(str::to_string),
            _ => None,
        })
        .filter(|s| s != &module)
        .collect();

    Some(RawImport {
        specifier: module,
        items,
        line: node.start_position().row as u32 + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::LANGUAGE.into()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn extracts_bare_import() {
        let source = "import os\n";
        let tree = parse(source);
        let imports = extract(&tree.root_node(), source);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "os");
    }

    #[test]
    fn extracts_from_import_with_items() {
        let source = "from app.core import settings, utils\n";
        let tree = parse(source);
        let imports = extract(&tree.root_node(), source);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "app.core");
        assert_eq!(imports[0].items, vec!["settings", "utils"]);
    }
}
