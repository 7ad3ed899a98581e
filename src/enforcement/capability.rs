//! Capability enforcement: did a task only write the components it
//! declared (spec §4.8).

use crate::types::{build_component_paths, find_owning_component, Manifest, Touches};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CapabilityViolation {
    pub path: String,
    /// `None` when the path doesn't resolve to any component at all;
    /// `Some("expected-via-resolution")` when it resolves to a component
    /// that just isn't in the declared write set.
    pub declared_component: Option<String>,
    pub actual_component: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CapabilityReport {
    pub valid: bool,
    pub violations: Vec<CapabilityViolation>,
}

/// Checks every path a task modified against its declared `writes` set.
/// A file outside every component is a violation only when the task
/// declared a non-empty write set (an empty write set is a declared
/// touch-nothing contract and tolerates writes outside any component).
pub fn verify_capabilities(
    manifest: &Manifest,
    touches: &Touches,
    modified_paths: &[String],
    repo_root: &Path,
) -> CapabilityReport {
    let entries = build_component_paths(manifest, repo_root);
    let mut violations = Vec::new();

    for path in modified_paths {
        let actual_component = find_owning_component(Path::new(path), &entries, repo_root);

        match &actual_component {
            None => {
                if !touches.writes.is_empty() {
                    violations.push(CapabilityViolation {
                        path: path.clone(),
                        declared_component: None,
                        actual_component: None,
                    });
                }
            }
            Some(component) => {
                if !touches.writes.contains(component) {
                    violations.push(CapabilityViolation {
                        path: path.clone(),
                        declared_component: Some("expected-via-resolution".to_string()),
                        actual_component: Some(component.clone()),
                    });
                }
            }
        }
    }

    CapabilityReport {
        valid: violations.is_empty(),
        violations,
    }
}
