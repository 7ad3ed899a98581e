//! Per-language import extraction, dispatched on file extension (spec §9:
//! "polymorphic over a capability set `{tokenize, resolve_specifier}`").

mod python;
mod rust;
mod typescript;

use tree_sitter::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    Rust,
    TypeScript,
    Python,
}

impl SupportedLanguage {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "rs" => Some(Self::Rust),
            "ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Self::TypeScript),
            "py" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }
}

/// One statically-extracted import: the raw specifier text plus the
/// imported item names when the language's syntax exposes them.
#[derive(Debug, Clone)]
pub struct RawImport {
    pub specifier: String,
    pub items: Vec<String>,
    pub line: u32,
}

/// Walk a parsed file's tree and pull out every import/use declaration.
pub fn extract_imports(language: SupportedLanguage, root: &tree_sitter::Node, source: &str) -> Vec<RawImport> {
    match language {
        SupportedLanguage::Rust => rust::extract(root, source),
        SupportedLanguage::TypeScript => typescript::extract(root, source),
        SupportedLanguage::Python => python::extract(root, source),
    }
}
