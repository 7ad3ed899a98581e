//! Graphviz DOT rendering of the component dependency graph (ambient
//! supplement — spec.md describes "dep-graph rendering" in §4.2's
//! responsibility list without pinning a format).

use crate::types::Manifest;
use std::fmt::Write as _;

/// Render the manifest's `deps` edges as a Graphviz DOT digraph, one node
/// per component, labeled with its stability.
pub fn render_dependency_graph(manifest: &Manifest) -> String {
    let mut out = String::new();
    writeln!(out, "digraph components {{").unwrap();

    let mut names: Vec<&String> = manifest.components.keys().collect();
    names.sort();

    for name in &names {
        let component = &manifest.components[*name];
        writeln!(out, "  \"{name}\" [label=\"{name}\\n{:?}\"];", component.stability).unwrap();
    }

    for name in &names {
        let component = &manifest.components[*name];
        let mut deps = component.deps.clone();
        deps.sort();
        for dep in deps {
            writeln!(out, "  \"{name}\" -> \"{dep}\";").unwrap();
        }
    }

    writeln!(out, "}}").unwrap();
    out
}
