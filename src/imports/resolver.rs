//! Specifier resolution: path aliases, relative resolution, and mapping
//! resolved files back to owning components (spec §4.3).

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CANDIDATE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "py", "rs"];

/// A single `paths` alias pattern, already split at its `*` wildcard
/// (absent when the pattern has no wildcard).
#[derive(Debug, Clone)]
struct AliasPattern {
    prefix: String,
    suffix: String,
    targets: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PathAliasTable {
    aliases: Vec<AliasPattern>,
    base_url: PathBuf,
}

impl PathAliasTable {
    /// Load `tsconfig.json` (or `jsconfig.json`) beside the manifest,
    /// following its `extends` chain, and flatten `compilerOptions.paths`
    /// into a lookup table rooted at `compilerOptions.baseUrl`.
    pub fn discover(repo_root: &Path) -> Self {
        for name in ["tsconfig.json", "jsconfig.json"] {
            let path = repo_root.join(name);
            if path.is_file() {
                if let Some(table) = Self::load_chain(&path, repo_root) {
                    return table;
                }
            }
        }
        Self::default()
    }

    fn load_chain(path: &Path, repo_root: &Path) -> Option<Self> {
        let mut merged_paths: HashMap<String, Vec<String>> = HashMap::new();
        let mut base_url = repo_root.to_path_buf();
        let mut current = path.to_path_buf();
        let mut visited = std::collections::HashSet::new();

        loop {
            if !visited.insert(current.clone()) {
                break; // cyclic extends chain
            }
            let contents = std::fs::read_to_string(&current).ok()?;
            let json: Value = serde_json::from_str(&contents).ok()?;

            if let Some(opts) = json.get("compilerOptions") {
                if let Some(url) = opts.get("baseUrl").and_then(Value::as_str) {
                    base_url = current.parent().unwrap_or(repo_root).join(url);
                }
                if let Some(paths) = opts.get("paths").and_then(Value::as_object) {
                    for (pattern, targets) in paths {
                        let targets: Vec<String> = targets
                            .as_array()
                            .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
                            .unwrap_or_default();
                        merged_paths.entry(pattern.clone()).or_insert(targets);
                    }
                }
            }

            match json.get("extends").and_then(Value::as_str) {
                Some(parent_rel) => {
                    let parent_path = current.parent().unwrap_or(repo_root).join(parent_rel);
                    current = if parent_path.extension().is_some() {
                        parent_path
                    } else {
                        parent_path.with_extension("json")
                    };
                }
                None => break,
            }
        }

        let aliases = merged_paths
            .into_iter()
            .map(|(pattern, targets)| {
                let (prefix, suffix) = match pattern.find('*') {
                    Some(idx) => (pattern[..idx].to_string(), pattern[idx + 1..].to_string()),
                    None => (pattern.clone(), String::new()),
                };
                AliasPattern { prefix, suffix, targets }
            })
            .collect();

        Some(Self { aliases, base_url })
    }

    /// Expand `specifier` against every matching alias pattern, producing
    /// zero or more candidate paths relative to `base_url`.
    fn expand(&self, specifier: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for alias in &self.aliases {
            if let Some(matched) = specifier
                .strip_prefix(alias.prefix.as_str())
                .and_then(|rest| rest.strip_suffix(alias.suffix.as_str()))
            {
                for target in &alias.targets {
                    let expanded = target.replace('*', matched);
                    candidates.push(self.base_url.join(expanded));
                }
            }
        }
        candidates
    }
}

/// Resolve one import specifier to an absolute file on disk, following
/// spec §4.3's four-step order. Returns `None` when the specifier is
/// external (unresolvable package) — not an error, just not a component
/// dependency.
pub fn resolve_specifier(
    specifier: &str,
    source_file: &Path,
    aliases: &PathAliasTable,
    repo_root: &Path,
) -> Option<PathBuf> {
    for candidate in aliases.expand(specifier) {
        if let Some(resolved) = resolve_with_extensions(&candidate) {
            return Some(resolved);
        }
    }

    if specifier.starts_with('.') {
        let base = source_file.parent().unwrap_or(repo_root).join(specifier);
        return resolve_with_extensions(&base);
    }

    if specifier.starts_with("crate::") || specifier.starts_with("self::") || specifier.starts_with("super::") {
        return resolve_rust_module_path(specifier, source_file, repo_root);
    }

    resolve_workspace_package(specifier, repo_root)
}

fn resolve_with_extensions(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }
    for ext in CANDIDATE_EXTENSIONS {
        let with_ext = base.with_extension(ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    for ext in CANDIDATE_EXTENSIONS {
        let index = base.join(format!("index.{ext}"));
        if index.is_file() {
            return Some(index);
        }
        let mod_rs = base.join("mod.rs");
        if *ext == "rs" && mod_rs.is_file() {
            return Some(mod_rs);
        }
    }
    None
}

/// Best-effort mapping of a `crate::`/`self::`/`super::` path to a file
/// under the crate root containing `source_file`. Each prefix anchors
/// the remaining segments at a different base module: `crate::` at the
/// crate root, `self::` at `source_file`'s own module, `super::` (one or
/// more, chained) at an ancestor of it — not all three at the crate
/// root, which would mis-resolve any relative path.
fn resolve_rust_module_path(specifier: &str, source_file: &Path, repo_root: &Path) -> Option<PathBuf> {
    let crate_root = find_crate_src_root(source_file, repo_root)?;
    let mut tokens: Vec<&str> = specifier.split("::").collect();
    if tokens.is_empty() {
        return None;
    }

    let mut base = match tokens[0] {
        "crate" => {
            tokens.remove(0);
            Vec::new()
        }
        "self" => {
            tokens.remove(0);
            module_path_segments(source_file, &crate_root)
        }
        "super" => {
            let mut base = module_path_segments(source_file, &crate_root);
            while tokens.first() == Some(&"super") {
                base.pop();
                tokens.remove(0);
            }
            base
        }
        _ => return None,
    };

    base.extend(tokens.iter().map(|s| s.to_string()));

    // The last segment may name an item (function, type) rather than a
    // module file, so walk from the full path down to its base module,
    // trying each prefix as a module file.
    for len in (0..=base.len()).rev() {
        let relative: PathBuf = base[..len].iter().collect();
        if let Some(resolved) = resolve_with_extensions(&crate_root.join(&relative)) {
            return Some(resolved);
        }
    }
    None
}

/// The module path of `source_file` relative to `crate_root`, e.g.
/// `src/a/b.rs` → `["a", "b"]`, `src/a/mod.rs` → `["a"]`, `src/lib.rs` →
/// `[]` — collapsing `mod.rs`/`lib.rs`/`main.rs` into their parent
/// module rather than treating them as a named submodule.
fn module_path_segments(source_file: &Path, crate_root: &Path) -> Vec<String> {
    let Ok(relative) = source_file.strip_prefix(crate_root) else {
        return Vec::new();
    };
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    if let Some(last) = segments.last().cloned() {
        let stem = Path::new(&last).file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        if stem == "mod" || stem == "lib" || stem == "main" {
            segments.pop();
        } else if let Some(last_mut) = segments.last_mut() {
            *last_mut = stem;
        }
    }

    segments
}

fn find_crate_src_root(source_file: &Path, repo_root: &Path) -> Option<PathBuf> {
    let mut dir = source_file.parent()?;
    loop {
        if dir.join("Cargo.toml").is_file() {
            return Some(dir.join("src"));
        }
        if dir == repo_root {
            break;
        }
        dir = dir.parent()?;
    }
    None
}

/// A package-style specifier (`@scope/name`, `lodash`) resolves against a
/// discoverable workspace package graph (an npm/yarn/pnpm workspace
/// listing, or a Cargo workspace member); otherwise it is external.
fn resolve_workspace_package(specifier: &str, repo_root: &Path) -> Option<PathBuf> {
    let package_name = specifier.split('/').next()?;
    let candidate = repo_root.join("packages").join(package_name).join("src");
    if candidate.is_dir() {
        return Some(candidate);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_specifier_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.ts"), "").unwrap();
        std::fs::write(dir.path().join("src/b.ts"), "import \"./a\";").unwrap();

        let aliases = PathAliasTable::default();
        let resolved = resolve_specifier("./a", &dir.path().join("src/b.ts"), &aliases, dir.path());

        assert_eq!(resolved, Some(dir.path().join("src/a.ts")));
    }

    #[test]
    fn resolves_index_file_for_directory_specifier() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/widgets")).unwrap();
        std::fs::write(dir.path().join("src/widgets/index.ts"), "").unwrap();

        let aliases = PathAliasTable::default();
        let resolved = resolve_specifier(
            "./widgets",
            &dir.path().join("src/main.ts"),
            &aliases,
            dir.path(),
        );

        assert_eq!(resolved, Some(dir.path().join("src/widgets/index.ts")));
    }

    #[test]
    fn external_package_specifier_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let aliases = PathAliasTable::default();
        let resolved = resolve_specifier("react", &dir.path().join("src/main.ts"), &aliases, dir.path());
        assert!(resolved.is_none());
    }

    #[test]
    fn alias_pattern_expands_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/app/widgets")).unwrap();
        std::fs::write(dir.path().join("src/app/widgets/button.ts"), "").unwrap();
        std::fs::write(
            dir.path().join("tsconfig.json"),
            r#"{"compilerOptions": {"baseUrl": ".", "paths": {"@app/*": ["src/app/*"]}}}"#,
        )
        .unwrap();

        let aliases = PathAliasTable::discover(dir.path());
        let resolved = resolve_specifier(
            "@app/widgets/button",
            &dir.path().join("src/main.ts"),
            &aliases,
            dir.path(),
        );

        assert_eq!(resolved, Some(dir.path().join("src/app/widgets/button.ts")));
    }

    #[test]
    fn rust_crate_path_resolves_via_cargo_toml_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname=\"x\"").unwrap();
        std::fs::create_dir_all(dir.path().join("src/types")).unwrap();
        std::fs::write(dir.path().join("src/types/mod.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "").unwrap();

        let aliases = PathAliasTable::default();
        let resolved = resolve_specifier("crate::types", &dir.path().join("src/lib.rs"), &aliases, dir.path());

        assert_eq!(resolved, Some(dir.path().join("src/types/mod.rs")));
    }

    #[test]
    fn rust_self_path_resolves_relative_to_current_module() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname=\"x\"").unwrap();
        std::fs::create_dir_all(dir.path().join("src/types")).unwrap();
        std::fs::write(dir.path().join("src/types/mod.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/types/ownership.rs"), "").unwrap();

        let aliases = PathAliasTable::default();
        // From within `types::mod`, `self::ownership` is a sibling module,
        // not `src/ownership.rs`.
        let resolved = resolve_specifier(
            "self::ownership",
            &dir.path().join("src/types/mod.rs"),
            &aliases,
            dir.path(),
        );

        assert_eq!(resolved, Some(dir.path().join("src/types/ownership.rs")));
    }

    #[test]
    fn rust_super_path_resolves_one_level_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname=\"x\"").unwrap();
        std::fs::create_dir_all(dir.path().join("src/types")).unwrap();
        std::fs::write(dir.path().join("src/types/mod.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/manifest.rs"), "").unwrap();

        let aliases = PathAliasTable::default();
        // From within `types::mod`, `super::manifest` is the crate-root
        // sibling `src/manifest.rs`, not `src/types/manifest.rs`.
        let resolved = resolve_specifier(
            "super::manifest",
            &dir.path().join("src/types/mod.rs"),
            &aliases,
            dir.path(),
        );

        assert_eq!(resolved, Some(dir.path().join("src/manifest.rs")));
    }

    #[test]
    fn rust_chained_super_walks_multiple_levels() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname=\"x\"").unwrap();
        std::fs::create_dir_all(dir.path().join("src/a/b")).unwrap();
        std::fs::write(dir.path().join("src/a/b/mod.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/a/mod.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/sibling.rs"), "").unwrap();

        let aliases = PathAliasTable::default();
        // From `a::b`, `super::super::sibling` walks up two modules to
        // the crate root.
        let resolved = resolve_specifier(
            "super::super::sibling",
            &dir.path().join("src/a/b/mod.rs"),
            &aliases,
            dir.path(),
        );

        assert_eq!(resolved, Some(dir.path().join("src/sibling.rs")));
    }

    #[test]
    fn rust_self_from_non_mod_file_resolves_to_sibling_submodule_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nname=\"x\"").unwrap();
        std::fs::create_dir_all(dir.path().join("src/cochange")).unwrap();
        std::fs::write(dir.path().join("src/cochange/git.rs"), "").unwrap();
        std::fs::write(dir.path().join("src/cochange/hotspots.rs"), "").unwrap();

        let aliases = PathAliasTable::default();
        let resolved = resolve_specifier(
            "self::hotspots",
            &dir.path().join("src/cochange/git.rs"),
            &aliases,
            dir.path(),
        );

        assert_eq!(resolved, None);
    }
}
