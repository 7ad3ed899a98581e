//! Doc discovery and touch-scoped doc resolution (spec §4.2).

use crate::types::{component_paths, Manifest, PathSpec, Touches};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocVisibility {
    /// `README.md` at a component root — loaded for both reads and writes.
    Public,
    /// Everything else — loaded only when the component is written.
    Private,
}

#[derive(Debug, Clone)]
pub struct Doc {
    pub path: PathBuf,
    pub component: String,
    pub visibility: DocVisibility,
}

/// Discover every doc belonging to `component`, unioned with its explicit
/// `docs:` entries, deduplicated by canonical path.
pub fn discover_docs(repo_root: &Path, component_name: &str, manifest: &Manifest) -> Vec<Doc> {
    let Some(component) = manifest.components.get(component_name) else {
        return Vec::new();
    };

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut docs = Vec::new();

    for root in discovery_roots(repo_root, &component.path) {
        let readme = root.join("README.md");
        if readme.is_file() && seen.insert(readme.clone()) {
            docs.push(Doc {
                path: readme,
                component: component_name.to_string(),
                visibility: DocVisibility::Public,
            });
        }

        let docs_dir = root.join("docs");
        if docs_dir.is_dir() {
            if let Ok(entries) = std::fs::read_dir(&docs_dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("md") && seen.insert(path.clone()) {
                        docs.push(Doc {
                            path,
                            component: component_name.to_string(),
                            visibility: DocVisibility::Private,
                        });
                    }
                }
            }
        }
    }

    for explicit in &component.docs {
        let path = repo_root.join(explicit);
        if seen.insert(path.clone()) {
            let visibility = if path.file_name().and_then(|n| n.to_str()) == Some("README.md") {
                DocVisibility::Public
            } else {
                DocVisibility::Private
            };
            docs.push(Doc {
                path,
                component: component_name.to_string(),
                visibility,
            });
        }
    }

    docs
}

/// `P`, the parent of `P` when its last segment is `src`, and any `src`
/// child of `P` — the three discovery roots per owned path (spec §4.2).
fn discovery_roots(repo_root: &Path, path_spec: &PathSpec) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for p in component_paths(path_spec) {
        let base = repo_root.join(&p);
        roots.push(base.clone());

        if base.file_name().and_then(|n| n.to_str()) == Some("src") {
            if let Some(parent) = base.parent() {
                roots.push(parent.to_path_buf());
            }
        }

        let src_child = base.join("src");
        if src_child.is_dir() {
            roots.push(src_child);
        }
    }
    roots
}

/// Docs relevant to a task's declared touches: all docs owned by any
/// `writes` component, plus public-only docs owned by any `reads`
/// component (spec §4.2).
pub fn resolve_docs_for_touches(repo_root: &Path, manifest: &Manifest, touches: &Touches) -> Vec<Doc> {
    let mut resolved = Vec::new();

    for component in &touches.writes {
        resolved.extend(discover_docs(repo_root, component, manifest));
    }

    for component in &touches.reads {
        if touches.writes.contains(component) {
            continue;
        }
        resolved.extend(
            discover_docs(repo_root, component, manifest)
                .into_iter()
                .filter(|doc| doc.visibility == DocVisibility::Public),
        );
    }

    resolved
}
