//! Git co-change analysis: graduated pair weighting, noise filtering, and
//! an incremental on-disk cache (spec §4.4).

mod cache;
mod git;
mod hotspots;

pub use cache::{select_strategy, CacheFile, Strategy};
pub use git::Commit;
pub use hotspots::{complexity_trend, file_neighborhood, hotspots as hotspot_scores, ComplexityTrend, HotspotEntry, NeighborEdge, Trend};

use crate::config::CoChangeConfig;
use crate::error::{CoreError, GitAvailability, Result};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeWeight {
    pub weight: f64,
    pub commit_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CoChangeGraph {
    pub edges: HashMap<(String, String), EdgeWeight>,
    pub change_frequency: HashMap<String, u64>,
    pub total_commits_analyzed: u64,
    pub total_commits_filtered: u64,
    pub last_sha: Option<String>,
}

impl CoChangeGraph {
    /// Edges and frequencies add; counters and `last_sha` take the union
    /// view — this is the merge rule that makes incremental scans safe
    /// (spec §4.4, §8 property 4).
    pub fn merge(&mut self, other: CoChangeGraph) {
        for (pair, weight) in other.edges {
            let entry = self.edges.entry(pair).or_default();
            entry.weight += weight.weight;
            entry.commit_count += weight.commit_count;
        }
        for (file, count) in other.change_frequency {
            *self.change_frequency.entry(file).or_default() += count;
        }
        self.total_commits_analyzed += other.total_commits_analyzed;
        self.total_commits_filtered += other.total_commits_filtered;
        if other.last_sha.is_some() {
            self.last_sha = other.last_sha;
        }
    }

    fn edge_mut(&mut self, a: &str, b: &str) -> &mut EdgeWeight {
        let key = edge_key(a, b);
        self.edges.entry(key).or_default()
    }
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Apply filtering (spec §4.4, evaluated in this order) and graduated
/// weighting for one commit, mutating `graph` in place.
fn apply_commit(graph: &mut CoChangeGraph, commit: &Commit, config: &CoChangeConfig) {
    graph.total_commits_analyzed += 1;

    if commit.files.len() > config.commit_size_ceiling {
        graph.total_commits_filtered += 1;
        return;
    }

    let subject_lower = commit.subject.to_lowercase();
    if config
        .message_excludes
        .iter()
        .any(|pattern| subject_lower.contains(&pattern.to_lowercase()))
    {
        graph.total_commits_filtered += 1;
        return;
    }

    let files: Vec<&String> = commit
        .files
        .iter()
        .filter(|file| !matches_any_exclude(file, &config.file_excludes))
        .collect();

    if files.is_empty() {
        return;
    }

    for file in &files {
        *graph.change_frequency.entry(file.to_string()).or_default() += 1;
    }

    if files.len() < 2 {
        return;
    }

    let n = files.len();
    let pair_weight = 1.0 / (n - 1) as f64;

    for i in 0..files.len() {
        for j in (i + 1)..files.len() {
            let edge = graph.edge_mut(files[i], files[j]);
            edge.weight += pair_weight;
            edge.commit_count += 1;
        }
    }
}

fn matches_any_exclude(file: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| glob::Pattern::new(pattern).map(|p| p.matches(file)).unwrap_or(false))
}

/// Build a graph from a fixed sequence of already-fetched commits — the
/// pure, order-independent core of the analysis, exercised directly by
/// the monotonicity property tests without a real git repo.
pub fn analyze_commits(commits: &[Commit], config: &CoChangeConfig) -> CoChangeGraph {
    let mut graph = CoChangeGraph::default();
    for commit in commits {
        apply_commit(&mut graph, commit, config);
    }
    graph
}

/// Full pipeline: pick a cache strategy, invoke git as needed, merge, and
/// persist. Returns an empty graph with `GitAvailability::unavailable()`
/// when git itself can't be used — never an error (spec §7).
pub fn analyze_cochange(repo_root: &Path, config: &CoChangeConfig) -> Result<(CoChangeGraph, GitAvailability)> {
    if !git::is_git_available(repo_root) {
        return Ok((CoChangeGraph::default(), GitAvailability::unavailable()));
    }

    let head = git::rev_parse_head(repo_root)?;
    let fingerprint = cache::fingerprint(config);
    let cache_path = repo_root.join(".varp").join("co-change.json");
    let cached = cache::load_cache(&cache_path);

    let strategy = select_strategy(cached.as_ref(), &head, &fingerprint);

    let graph = match strategy {
        Strategy::Current => cached.expect("Current strategy implies a cache hit").into_graph(),
        Strategy::Incremental => {
            let mut graph = cached.expect("Incremental strategy implies a cache hit").into_graph();
            let since = graph.last_sha.clone();
            let commits = git::log_commits(repo_root, since.as_deref())?;
            let mut delta = analyze_commits(&commits, config);
            delta.last_sha = Some(head.clone());
            graph.merge(delta);
            graph
        }
        Strategy::Full => {
            let commits = git::log_commits(repo_root, None)?;
            let mut graph = analyze_commits(&commits, config);
            graph.last_sha = Some(head.clone());
            graph
        }
    };

    let cache_file = CacheFile::from_graph(&graph, fingerprint);
    cache::save_cache_atomic(&cache_path, &cache_file)
        .map_err(|e| CoreError::io(cache_path.clone(), e))?;

    Ok((graph, GitAvailability::available()))
}
