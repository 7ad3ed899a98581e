//! Public facade that composes every other analysis into the single
//! queryable structure downstream consumers work against: the manifest,
//! the co-change graph, the import scan, and (optionally) the coupling
//! matrix (spec §3.6, §4).

use crate::cochange::{self, CoChangeGraph};
use crate::config::VarpConfig;
use crate::coupling::{self, CouplingMatrix, Thresholds};
use crate::error::{GitAvailability, Result};
use crate::imports::{self, ImportScanResult, ImportWarning};
use crate::types::{build_component_paths, find_owning_component, Manifest};
use std::path::Path;

/// Whether [`build_codebase_graph`] also computes the coupling matrix,
/// which needs both the import scan and the co-change graph and is the
/// most expensive of the composed analyses.
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    pub include_coupling: bool,
    pub coupling_thresholds: Thresholds,
}

/// `{ manifest, co_change, imports, coupling? }` (spec §3.6). Every field
/// is a plain value, not a handle — the graph owns a snapshot of the
/// analyses taken at assembly time; it does not re-read the filesystem on
/// query.
#[derive(Debug, Clone)]
pub struct CodebaseGraph {
    pub manifest: Manifest,
    pub co_change: CoChangeGraph,
    pub git_availability: GitAvailability,
    pub imports: ImportScanResult,
    pub import_warnings: Vec<ImportWarning>,
    pub coupling: Option<CouplingMatrix>,
}

/// Assemble the composite graph: scan imports, analyze co-change, and
/// (when requested) classify the coupling matrix from the other two.
/// Degrades gracefully rather than erroring when git is unavailable
/// (spec §7) — callers inspect `git_availability` to tell a genuinely
/// empty co-change graph from a repo with no git history to read.
pub fn build_codebase_graph(
    repo_root: &Path,
    manifest: &Manifest,
    config: &VarpConfig,
    options: GraphOptions,
) -> Result<CodebaseGraph> {
    let (imports, import_warnings) = imports::scan_imports(repo_root, manifest);
    let (co_change, git_availability) = cochange::analyze_cochange(repo_root, &config.cochange)?;

    let coupling = options.include_coupling.then(|| {
        coupling::build_coupling_matrix(&co_change, &imports, manifest, &options.coupling_thresholds, repo_root)
    });

    Ok(CodebaseGraph {
        manifest: manifest.clone(),
        co_change,
        git_availability,
        imports,
        import_warnings,
        coupling,
    })
}

impl CodebaseGraph {
    /// The component owning `file_path`, or `None` if it falls outside
    /// every declared component path.
    pub fn owning_component(&self, file_path: &Path, repo_root: &Path) -> Option<String> {
        let entries = build_component_paths(&self.manifest, repo_root);
        find_owning_component(file_path, &entries, repo_root)
    }

    /// Components with at least one import or coupling edge to
    /// `component`, in either direction.
    pub fn related_components(&self, component: &str) -> Vec<String> {
        let mut related = std::collections::BTreeSet::new();

        for (from, to) in &self.imports.import_deps {
            if from == component {
                related.insert(to.clone());
            } else if to == component {
                related.insert(from.clone());
            }
        }

        if let Some(matrix) = &self.coupling {
            for entry in coupling::component_coupling_profile(matrix, component) {
                related.insert(if entry.a == component { entry.b.clone() } else { entry.a.clone() });
            }
        }

        related.into_iter().collect()
    }
}
