//! Manifest schema (spec §3.1) and its validating parser.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Active,
    Experimental,
}

impl Default for Stability {
    fn default() -> Self {
        Self::Active
    }
}

/// One or more directory paths a component owns. Deserializes from either
/// a bare string or a list, normalized to a list by [`crate::types::component_paths`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub path: PathSpec,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub test: Option<String>,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub stability: Stability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub components: HashMap<String, Component>,
}

impl Manifest {
    /// Parse and fully validate a manifest file (YAML). Fails with
    /// `ManifestInvalid` on schema violation, duplicate component paths
    /// that can't resolve ownership, or a cyclic dependency graph.
    pub fn parse(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::parse_str(&contents)
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_yaml::from_str(contents).map_err(|e| CoreError::ManifestInvalid {
                reason: format!("schema violation: {e}"),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        for (name, component) in &self.components {
            for dep in &component.deps {
                if !self.components.contains_key(dep) {
                    return Err(CoreError::ManifestInvalid {
                        reason: format!("component {name:?} depends on unknown component {dep:?}"),
                    });
                }
            }
        }
        if let Some(cycle) = self.find_dependency_cycle() {
            return Err(CoreError::ManifestInvalid {
                reason: format!(
                    "dependency graph has a cycle among components: {}",
                    cycle.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Kahn's algorithm over the `deps` adjacency. Returns `None` when the
    /// graph is acyclic; otherwise returns the residual (unreachable-via-
    /// topological-drain) component names — the cycle membership.
    ///
    /// Kahn's is used instead of Tarjan because the failure mode needs to
    /// report the residual set, which Kahn exposes directly as "nodes never
    /// drained" (spec §9).
    pub fn find_dependency_cycle(&self) -> Option<Vec<String>> {
        let mut in_degree: HashMap<&str, usize> =
            self.components.keys().map(|k| (k.as_str(), 0)).collect();
        for component in self.components.values() {
            for dep in &component.deps {
                if let Some(count) = in_degree.get_mut(dep.as_str()) {
                    *count += 1;
                }
            }
        }

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&name, _)| name)
            .collect();
        let mut drained: HashSet<&str> = HashSet::new();

        while let Some(name) = queue.pop_front() {
            drained.insert(name);
            if let Some(component) = self.components.get(name) {
                for dep in &component.deps {
                    if let Some(count) = in_degree.get_mut(dep.as_str()) {
                        *count -= 1;
                        if *count == 0 {
                            queue.push_back(dep.as_str());
                        }
                    }
                }
            }
        }

        let residual: Vec<String> = self
            .components
            .keys()
            .filter(|name| !drained.contains(name.as_str()))
            .cloned()
            .collect();

        if residual.is_empty() {
            None
        } else {
            Some(residual)
        }
    }

    /// Resolve a list of refs (component names or tags) to component names.
    /// Names take precedence over tags when ambiguous. Unknown refs are an
    /// error (spec §4.1).
    pub fn resolve_component_refs(&self, refs: &[String]) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        let mut seen = HashSet::new();

        for r in refs {
            if self.components.contains_key(r) {
                if seen.insert(r.clone()) {
                    resolved.push(r.clone());
                }
                continue;
            }

            let by_tag: Vec<&String> = self
                .components
                .iter()
                .filter(|(_, c)| c.tags.iter().any(|t| t == r))
                .map(|(name, _)| name)
                .collect();

            if by_tag.is_empty() {
                return Err(CoreError::UnknownRef {
                    reference: r.clone(),
                });
            }

            for name in by_tag {
                if seen.insert(name.clone()) {
                    resolved.push(name.clone());
                }
            }
        }

        resolved.sort();
        Ok(resolved)
    }
}
