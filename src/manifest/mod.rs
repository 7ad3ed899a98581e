//! Manifest-level responsibilities that sit above the raw schema: doc
//! discovery and freshness, dependency-graph validation and cascade, env
//! checking, and dep-graph rendering (spec §4.2).

mod cascade;
mod cache;
mod docs;
mod env;
mod freshness;
mod render;

pub use cache::ManifestCache;
pub use cascade::invalidation_cascade;
pub use docs::{discover_docs, resolve_docs_for_touches, Doc, DocVisibility};
pub use env::{check_env, EnvCheck};
pub use freshness::{acknowledge_freshness, compute_freshness, warm_staleness, DocFreshness};
pub use render::render_dependency_graph;

use crate::error::Result;
use crate::types::Manifest;
use std::path::Path;

/// Parse and validate a manifest file. Thin wrapper kept at the module
/// boundary named in the public contract (spec §4.1); the schema and
/// cycle-detection logic live on [`Manifest`] itself.
pub fn parse_manifest(path: &Path) -> Result<Manifest> {
    Manifest::parse(path)
}

/// `valid` iff Kahn's algorithm over the `deps` adjacency drains every
/// component (spec §4.2, §8 property 2).
pub fn validate_dependency_graph(manifest: &Manifest) -> Result<()> {
    match manifest.find_dependency_cycle() {
        None => Ok(()),
        Some(cycle) => Err(crate::error::CoreError::ManifestInvalid {
            reason: format!("dependency graph has a cycle among components: {}", cycle.join(", ")),
        }),
    }
}
