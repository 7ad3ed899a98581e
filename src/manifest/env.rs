//! Required-environment-variable checking for a set of components (spec §4.2).

use crate::types::Manifest;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
pub struct EnvCheck {
    pub set: Vec<String>,
    pub missing: Vec<String>,
}

/// Union the `env` lists of `component_names`, then partition against
/// `environment` into present (`set`) and absent (`missing`).
pub fn check_env(manifest: &Manifest, component_names: &[String], environment: &HashMap<String, String>) -> EnvCheck {
    let mut required: BTreeSet<String> = BTreeSet::new();
    for name in component_names {
        if let Some(component) = manifest.components.get(name) {
            required.extend(component.env.iter().cloned());
        }
    }

    let mut set = Vec::new();
    let mut missing = Vec::new();
    for var in required {
        if environment.contains_key(&var) {
            set.push(var);
        } else {
            missing.push(var);
        }
    }

    EnvCheck { set, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, PathSpec, Stability};
    use std::collections::HashMap;

    fn manifest() -> Manifest {
        let mut components = HashMap::new();
        components.insert(
            "api".to_string(),
            Component {
                path: PathSpec::Single("src/api".into()),
                deps: vec![],
                docs: vec![],
                tags: vec![],
                test: None,
                env: vec!["API_KEY".into(), "DATABASE_URL".into()],
                stability: Stability::Active,
            },
        );
        Manifest {
            version: "1".into(),
            components,
        }
    }

    #[test]
    fn partitions_set_and_missing() {
        let manifest = manifest();
        let mut environment = HashMap::new();
        environment.insert("API_KEY".to_string(), "secret".to_string());

        let result = check_env(&manifest, &["api".to_string()], &environment);

        assert_eq!(result.set, vec!["API_KEY"]);
        assert_eq!(result.missing, vec!["DATABASE_URL"]);
    }

    #[test]
    fn unknown_component_contributes_nothing() {
        let manifest = manifest();
        let result = check_env(&manifest, &["ghost".to_string()], &HashMap::new());
        assert!(result.set.is_empty());
        assert!(result.missing.is_empty());
    }
}
