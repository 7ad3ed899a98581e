//! Invalidation cascade: reverse-BFS over the component dependency graph
//! (spec §4.2, §9 — iterative, not recursive, to bound stack depth on
//! large monorepos).

use crate::types::Manifest;
use std::collections::{HashMap, HashSet, VecDeque};

/// From `changed`, return the closure of components transitively
/// dependent on any of them (including the input set itself). `A depends
/// on B` in the manifest means a change to `B` must cascade to `A`, so the
/// BFS walks the reverse adjacency (B → A).
pub fn invalidation_cascade(manifest: &Manifest, changed: &[String]) -> Vec<String> {
    let mut reverse_deps: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, component) in &manifest.components {
        for dep in &component.deps {
            reverse_deps.entry(dep.as_str()).or_default().push(name.as_str());
        }
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    for name in changed {
        if visited.insert(name.clone()) {
            queue.push_back(name.clone());
        }
    }

    while let Some(name) = queue.pop_front() {
        if let Some(dependents) = reverse_deps.get(name.as_str()) {
            for &dependent in dependents {
                if visited.insert(dependent.to_string()) {
                    queue.push_back(dependent.to_string());
                }
            }
        }
    }

    let mut result: Vec<String> = visited.into_iter().collect();
    result.sort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, PathSpec, Stability};
    use std::collections::HashMap;

    fn manifest() -> Manifest {
        let mut components = HashMap::new();
        for (name, deps) in [("core", vec![]), ("auth", vec!["core"]), ("api", vec!["auth"]), ("web", vec!["api"])] {
            components.insert(
                name.to_string(),
                Component {
                    path: PathSpec::Single(format!("src/{name}")),
                    deps: deps.into_iter().map(String::from).collect(),
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
            components,
        }
    }

    #[test]
    fn cascade_includes_transitive_dependents() {
        let manifest = manifest();
        let result = invalidation_cascade(&manifest, &["core".to_string()]);
        assert_eq!(result, vec!["api", "auth", "core", "web"]);
    }

    #[test]
    fn cascade_includes_input_set() {
        let manifest = manifest();
        let result = invalidation_cascade(&manifest, &["web".to_string()]);
        assert_eq!(result, vec!["web"]);
    }

    #[test]
    fn cascade_from_leaf_dependent_is_isolated() {
        let manifest = manifest();
        let result = invalidation_cascade(&manifest, &["api".to_string()]);
        assert_eq!(result, vec!["api", "web"]);
    }
}
