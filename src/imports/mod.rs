//! Multi-language static import extraction and cross-component dependency
//! inference (spec §4.3).

mod languages;
mod resolver;

pub use languages::SupportedLanguage;
pub use resolver::PathAliasTable;

use crate::types::{build_component_paths, find_owning_component, Manifest};
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tree_sitter::Parser;
use walkdir::WalkDir;

/// Repeated specifiers (a shared util imported from dozens of files)
/// would otherwise re-walk the filesystem once per call site; bounded so
/// memory stays flat on very large scans.
const SPECIFIER_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, Clone)]
pub struct ImportWarning {
    pub file: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportScanResult {
    /// Cross-component edges with direct import evidence.
    pub import_deps: HashSet<(String, String)>,
    /// Edges observed in imports but absent from the manifest's `deps`.
    pub missing_deps: Vec<(String, String)>,
    /// Manifest `deps` entries with no import evidence.
    pub extra_deps: Vec<(String, String)>,
    pub total_files_scanned: usize,
    pub total_imports_scanned: usize,
    pub components_with_source: HashSet<String>,
}

/// Scan every file under every component's owned path(s), extract its
/// imports, resolve each to a file, and infer the cross-component
/// dependency edges actually exercised. Malformed/unreadable files are
/// recorded as warnings and skipped — never aborts the scan (spec §4.3).
pub fn scan_imports(repo_root: &Path, manifest: &Manifest) -> (ImportScanResult, Vec<ImportWarning>) {
    let mut result = ImportScanResult::default();
    let mut warnings = Vec::new();
    let entries = build_component_paths(manifest, repo_root);
    let aliases = PathAliasTable::discover(repo_root);

    let mut parsers: HashMap<SupportedLanguage, Parser> = HashMap::new();
    let mut specifier_cache: LruCache<(String, PathBuf), Option<PathBuf>> =
        LruCache::new(NonZeroUsize::new(SPECIFIER_CACHE_CAPACITY).unwrap());

    for (component_name, component) in &manifest.components {
        for owned in crate::types::component_paths(&component.path) {
            let root = repo_root.join(&owned);
            if !root.exists() {
                continue;
            }

            for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                    continue;
                };
                let Some(language) = SupportedLanguage::from_extension(ext) else {
                    continue;
                };

                let Ok(source) = std::fs::read_to_string(path) else {
                    warnings.push(ImportWarning {
                        file: path.to_path_buf(),
                        message: "failed to read file as UTF-8".to_string(),
                    });
                    continue;
                };

                let parser = parsers.entry(language).or_insert_with(|| {
                    let mut p = Parser::new();
                    p.set_language(&language.tree_sitter_language())
                        .expect("tree-sitter language grammar is statically linked");
                    p
                });

                let Some(tree) = parser.parse(&source, None) else {
                    warnings.push(ImportWarning {
                        file: path.to_path_buf(),
                        message: "tree-sitter failed to produce a parse tree".to_string(),
                    });
                    continue;
                };

                result.total_files_scanned += 1;
                result.components_with_source.insert(component_name.clone());

                let raw_imports = languages::extract_imports(language, &tree.root_node(), &source);
                result.total_imports_scanned += raw_imports.len();

                for raw in raw_imports {
                    let source_dir = path.parent().unwrap_or(path).to_path_buf();
                    let cache_key = (raw.specifier.clone(), source_dir);
                    let resolved = if let Some(cached) = specifier_cache.get(&cache_key) {
                        cached.clone()
                    } else {
                        let resolved = resolver::resolve_specifier(&raw.specifier, path, &aliases, repo_root);
                        specifier_cache.put(cache_key, resolved.clone());
                        resolved
                    };
                    let Some(resolved) = resolved else {
                        continue;
                    };
                    let Some(target_component) = find_owning_component(&resolved, &entries, repo_root) else {
                        continue;
                    };
                    if &target_component != component_name {
                        result.import_deps.insert((component_name.clone(), target_component));
                    }
                }
            }
        }
    }

    for (from, to) in &result.import_deps {
        let declared = manifest
            .components
            .get(from)
            .map(|c| c.deps.contains(to))
            .unwrap_or(false);
        if !declared {
            result.missing_deps.push((from.clone(), to.clone()));
        }
    }
    result.missing_deps.sort();

    for (name, component) in &manifest.components {
        for dep in &component.deps {
            if !result.import_deps.contains(&(name.clone(), dep.clone())) {
                result.extra_deps.push((name.clone(), dep.clone()));
            }
        }
    }
    result.extra_deps.sort();

    (result, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, PathSpec, Stability};
    use std::collections::HashMap;

    fn manifest() -> Manifest {
        let mut components = HashMap::new();
        components.insert(
            "auth".to_string(),
            Component {
                path: PathSpec::Single("src/auth".into()),
                deps: vec!["core".into()],
                docs: vec![],
                tags: vec![],
                test: None,
                env: vec![],
                stability: Stability::Active,
            },
        );
        components.insert(
            "core".to_string(),
            Component {
                path: PathSpec::Single("src/core".into()),
                deps: vec![],
                docs: vec![],
                tags: vec![],
                test: None,
                env: vec![],
                stability: Stability::Active,
            },
        );
        components.insert(
            "api".to_string(),
            Component {
                path: PathSpec::Single("src/api".into()),
                deps: vec![],
                docs: vec![],
                tags: vec![],
                test: None,
                env: vec![],
                stability: Stability::Active,
            },
        );
        Manifest {
            version: "1".into(),
            components,
        }
    }

    #[test]
    fn infers_missing_and_extra_deps() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/auth")).unwrap();
        std::fs::create_dir_all(dir.path().join("src/core")).unwrap();
        std::fs::create_dir_all(dir.path().join("src/api")).unwrap();

        std::fs::write(dir.path().join("src/core/mod.rs"), "pub fn core() {}\n").unwrap();
        std::fs::write(
            dir.path().join("src/auth/mod.rs"),
            "use crate::core::core;\nuse crate::api::widget;\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("src/api/mod.rs"), "pub fn widget() {}\n").unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname=\"x\"\n").unwrap();

        let manifest = manifest();
        let (result, warnings) = scan_imports(dir.path(), &manifest);

        assert!(warnings.is_empty());
        assert!(result.import_deps.contains(&("auth".to_string(), "api".to_string())));
        assert!(result.missing_deps.contains(&("auth".to_string(), "api".to_string())));
        assert!(!result.missing_deps.contains(&("auth".to_string(), "core".to_string())));
    }

    #[test]
    fn unreadable_extensionless_files_are_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/core")).unwrap();
        std::fs::write(dir.path().join("src/core/NOTES"), "not source").unwrap();

        let manifest = manifest();
        let (result, warnings) = scan_imports(dir.path(), &manifest);

        assert_eq!(result.total_files_scanned, 0);
        assert!(warnings.is_empty());
    }
}
