//! Structural/behavioral coupling classification (spec §4.5).

use crate::cochange::CoChangeGraph;
use crate::imports::ImportScanResult;
use crate::types::{find_owning_component, Manifest};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    ExplicitModule,
    StableInterface,
    HiddenCoupling,
    Unrelated,
}

#[derive(Debug, Clone)]
pub struct CouplingEntry {
    pub a: String,
    pub b: String,
    pub structural_weight: f64,
    pub behavioral_weight: f64,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default)]
pub struct Thresholds {
    pub structural: Option<f64>,
    pub behavioral: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct CouplingMatrix {
    pub entries: Vec<CouplingEntry>,
    pub structural_threshold: f64,
    pub behavioral_threshold: f64,
}

/// Combine import and co-change signals into a classified matrix,
/// auto-calibrating any unset threshold to the median of non-zero values
/// on that axis (spec §4.5).
pub fn build_coupling_matrix(
    co_change: &CoChangeGraph,
    imports: &ImportScanResult,
    manifest: &Manifest,
    thresholds: &Thresholds,
    repo_root: &Path,
) -> CouplingMatrix {
    let entries_by_path = build_component_index(manifest, repo_root);

    let mut structural: HashMap<(String, String), f64> = HashMap::new();
    for (from, to) in &imports.import_deps {
        let key = pair_key(from, to);
        *structural.entry(key).or_default() += 1.0;
    }

    let mut behavioral: HashMap<(String, String), f64> = HashMap::new();
    for ((file_a, file_b), weight) in &co_change.edges {
        let Some(component_a) = find_owning_component(Path::new(file_a), &entries_by_path, repo_root) else {
            continue;
        };
        let Some(component_b) = find_owning_component(Path::new(file_b), &entries_by_path, repo_root) else {
            continue;
        };
        if component_a == component_b {
            continue;
        }
        let key = pair_key(&component_a, &component_b);
        *behavioral.entry(key).or_default() += weight.weight;
    }

    let mut all_pairs: Vec<(String, String)> = structural.keys().cloned().collect();
    for key in behavioral.keys() {
        if !structural.contains_key(key) {
            all_pairs.push(key.clone());
        }
    }
    all_pairs.sort();

    let structural_threshold = thresholds.structural.unwrap_or_else(|| median_nonzero(structural.values()));
    let behavioral_threshold = thresholds.behavioral.unwrap_or_else(|| median_nonzero(behavioral.values()));

    let entries = all_pairs
        .into_iter()
        .map(|(a, b)| {
            let structural_weight = *structural.get(&(a.clone(), b.clone())).unwrap_or(&0.0);
            let behavioral_weight = *behavioral.get(&(a.clone(), b.clone())).unwrap_or(&0.0);
            let classification = classify(structural_weight, behavioral_weight, structural_threshold, behavioral_threshold);
            CouplingEntry {
                a,
                b,
                structural_weight,
                behavioral_weight,
                classification,
            }
        })
        .collect();

    CouplingMatrix {
        entries,
        structural_threshold,
        behavioral_threshold,
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn build_component_index(manifest: &Manifest, repo_root: &Path) -> Vec<crate::types::ComponentPathEntry> {
    crate::types::build_component_paths(manifest, repo_root)
}

fn median_nonzero<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let mut sorted: Vec<f64> = values.copied().filter(|v| *v > 0.0).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn classify(structural: f64, behavioral: f64, structural_threshold: f64, behavioral_threshold: f64) -> Classification {
    let high_structural = structural > structural_threshold;
    let high_behavioral = behavioral > behavioral_threshold;
    match (high_structural, high_behavioral) {
        (true, true) => Classification::ExplicitModule,
        (true, false) => Classification::StableInterface,
        (false, true) => Classification::HiddenCoupling,
        (false, false) => Classification::Unrelated,
    }
}

/// All `hidden_coupling` entries, sorted by behavioral weight descending
/// (spec §4.5 — the highest-value architectural finding).
pub fn find_hidden_coupling(matrix: &CouplingMatrix) -> Vec<&CouplingEntry> {
    let mut entries: Vec<&CouplingEntry> = matrix
        .entries
        .iter()
        .filter(|e| e.classification == Classification::HiddenCoupling)
        .collect();
    entries.sort_by(|a, b| b.behavioral_weight.partial_cmp(&a.behavioral_weight).unwrap());
    entries
}

/// Every entry involving `component`.
pub fn component_coupling_profile<'a>(matrix: &'a CouplingMatrix, component: &str) -> Vec<&'a CouplingEntry> {
    matrix
        .entries
        .iter()
        .filter(|e| e.a == component || e.b == component)
        .collect()
}
