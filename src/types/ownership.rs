//! Longest-prefix file-to-component ownership lookup (spec §4.1).

use super::manifest::{Manifest, PathSpec};
use std::path::{Path, PathBuf};

/// Normalize a component's `path` field to a list, regardless of whether
/// the manifest author wrote a bare string or a list.
pub fn component_paths(path: &PathSpec) -> Vec<String> {
    match path {
        PathSpec::Single(p) => vec![p.clone()],
        PathSpec::Multiple(paths) => paths.clone(),
    }
}

/// One component-owned directory, flattened out of the manifest and ready
/// for prefix matching against absolute, lexically-normalized file paths.
#[derive(Debug, Clone)]
pub struct ComponentPathEntry {
    pub component: String,
    pub path: PathBuf,
}

/// Flatten every component's owned paths into entries sorted by descending
/// path-component count, so the first prefix match found is the longest —
/// resolving overlapping ownership (e.g. `src/api` vs `src/api/internal`)
/// in favor of the more specific component.
pub fn build_component_paths(manifest: &Manifest, repo_root: &Path) -> Vec<ComponentPathEntry> {
    let mut entries: Vec<ComponentPathEntry> = manifest
        .components
        .iter()
        .flat_map(|(name, component)| {
            component_paths(&component.path)
                .into_iter()
                .map(|p| ComponentPathEntry {
                    component: name.clone(),
                    path: normalize(&repo_root.join(&p)),
                })
        })
        .collect();

    entries.sort_by(|a, b| b.path.components().count().cmp(&a.path.components().count()));
    entries
}

/// Lexically normalize a path (resolve `.`/`..` components) without
/// touching the filesystem — ownership lookups must work for files that
/// don't exist yet (e.g. planned writes).
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Find the component owning `file_path`, using the longest matching
/// owned-directory prefix. `file_path` may be relative to `repo_root` or
/// absolute; both are normalized before comparison. Returns `None` when no
/// component owns the file.
pub fn find_owning_component(file_path: &Path, entries: &[ComponentPathEntry], repo_root: &Path) -> Option<String> {
    let target = if file_path.is_absolute() {
        normalize(file_path)
    } else {
        normalize(&repo_root.join(file_path))
    };

    entries
        .iter()
        .find(|entry| target == entry.path || target.starts_with(&entry.path))
        .map(|entry| entry.component.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::manifest::{Component, Stability};
    use std::collections::HashMap;

    fn manifest_with(components: Vec<(&str, &str)>) -> Manifest {
        let mut map = HashMap::new();
        for (name, path) in components {
            map.insert(
                name.to_string(),
                Component {
                    path: PathSpec::Single(path.to_string()),
                    deps: vec![],
                    docs: vec![],
                    tags: vec![],
                    test: None,
                    env: vec![],
                    stability: Stability::Active,
                },
            );
        }
        Manifest {
            version: "1".into(),
            components: map,
        }
    }

    #[test]
    fn longest_prefix_wins_over_shorter_parent() {
        let manifest = manifest_with(vec![("api", "src/api"), ("api-internal", "src/api/internal")]);
        let root = Path::new("/repo");
        let entries = build_component_paths(&manifest, root);
        let owner = find_owning_component(Path::new("src/api/internal/handler.rs"), &entries, root);
        assert_eq!(owner.as_deref(), Some("api-internal"));
    }

    #[test]
    fn shallower_file_falls_back_to_parent_component() {
        let manifest = manifest_with(vec![("api", "src/api"), ("api-internal", "src/api/internal")]);
        let root = Path::new("/repo");
        let entries = build_component_paths(&manifest, root);
        let owner = find_owning_component(Path::new("src/api/lib.rs"), &entries, root);
        assert_eq!(owner.as_deref(), Some("api"));
    }

    #[test]
    fn unowned_file_returns_none() {
        let manifest = manifest_with(vec![("api", "src/api")]);
        let root = Path::new("/repo");
        let entries = build_component_paths(&manifest, root);
        let owner = find_owning_component(Path::new("docs/readme.md"), &entries, root);
        assert!(owner.is_none());
    }

    #[test]
    fn absolute_and_relative_paths_agree() {
        let manifest = manifest_with(vec![("api", "src/api")]);
        let root = Path::new("/repo");
        let entries = build_component_paths(&manifest, root);
        let relative = find_owning_component(Path::new("src/api/mod.rs"), &entries, root);
        let absolute = find_owning_component(Path::new("/repo/src/api/mod.rs"), &entries, root);
        assert_eq!(relative, absolute);
    }

    #[test]
    fn dot_dot_components_are_normalized_away() {
        let manifest = manifest_with(vec![("api", "src/api")]);
        let root = Path::new("/repo");
        let entries = build_component_paths(&manifest, root);
        let owner = find_owning_component(Path::new("src/other/../api/mod.rs"), &entries, root);
        assert_eq!(owner.as_deref(), Some("api"));
    }
}
