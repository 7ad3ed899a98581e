//! Hotspot scoring, complexity trend classification, and file-neighborhood
//! queries (spec §4.4).

use super::git::numstat_for_file;
use super::CoChangeGraph;
use crate::config::HotspotConfig;
use crate::error::Result;
use crate::imports::ImportScanResult;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct HotspotEntry {
    pub file: String,
    pub change_frequency: u64,
    pub line_count: u64,
    pub score: u64,
}

/// `score(file) = change_frequency(file) * line_count(file)`, top-K by
/// score. Line counts are computed in a single pass over the candidates
/// (spec §4.4) via the shared line-counting helper.
pub fn hotspots(graph: &CoChangeGraph, repo_root: &Path, top_k: usize) -> Vec<HotspotEntry> {
    let mut entries: Vec<HotspotEntry> = graph
        .change_frequency
        .iter()
        .map(|(file, &change_frequency)| {
            let line_count = count_lines(&repo_root.join(file));
            HotspotEntry {
                file: file.clone(),
                change_frequency,
                line_count,
                score: change_frequency * line_count,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.file.cmp(&b.file)));
    entries.truncate(top_k);
    entries
}

fn count_lines(path: &Path) -> u64 {
    std::fs::read_to_string(path)
        .map(|contents| contents.lines().count() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone)]
pub struct ComplexityTrend {
    pub file: String,
    pub samples: Vec<i64>,
    pub trend: Trend,
}

/// Sample line-count deltas at up to `config.max_commits` evenly-spaced
/// historical checkpoints for `file`, fit a simple slope, and classify.
pub fn complexity_trend(repo_root: &Path, file: &str, config: &HotspotConfig) -> Result<ComplexityTrend> {
    let all_samples = numstat_for_file(repo_root, file)?;

    let checkpoints: Vec<i64> = if all_samples.len() <= config.max_commits {
        all_samples.iter().map(|(_, delta)| *delta).collect()
    } else {
        let stride = all_samples.len() as f64 / config.max_commits as f64;
        (0..config.max_commits)
            .map(|i| all_samples[(i as f64 * stride) as usize].1)
            .collect()
    };

    let running: Vec<i64> = checkpoints
        .iter()
        .scan(0i64, |acc, delta| {
            *acc += delta;
            Some(*acc)
        })
        .collect();

    let trend = if running.len() < config.trend_min_commits {
        Trend::Stable
    } else {
        classify_slope(&running, config.trend_threshold)
    };

    Ok(ComplexityTrend {
        file: file.to_string(),
        samples: running,
        trend,
    })
}

fn classify_slope(series: &[i64], threshold: f64) -> Trend {
    let n = series.len() as f64;
    let xs: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    let ys: Vec<f64> = series.iter().map(|&v| v as f64).collect();

    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let numerator: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - x_mean) * (y - y_mean)).sum();
    let denominator: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();

    if denominator == 0.0 {
        return Trend::Stable;
    }

    let slope = numerator / denominator;
    let scale = y_mean.abs().max(1.0);
    let relative_slope = slope / scale;

    if relative_slope > threshold {
        Trend::Increasing
    } else if relative_slope < -threshold {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

#[derive(Debug, Clone)]
pub struct NeighborEdge {
    pub neighbor: String,
    pub weight: f64,
    pub commit_count: u64,
    pub has_import_edge: bool,
}

/// All co-change edges incident to `file`, sorted by weight descending,
/// each annotated with whether an import edge exists in the same
/// direction (spec §4.4).
pub fn file_neighborhood(graph: &CoChangeGraph, imports: &ImportScanResult, file: &str) -> Vec<NeighborEdge> {
    let mut neighbors: Vec<NeighborEdge> = graph
        .edges
        .iter()
        .filter_map(|((a, b), weight)| {
            let neighbor = if a == file {
                Some(b.clone())
            } else if b == file {
                Some(a.clone())
            } else {
                None
            }?;
            let has_import_edge = imports
                .import_deps
                .iter()
                .any(|(from, to)| from == file && to == &neighbor);
            Some(NeighborEdge {
                neighbor,
                weight: weight.weight,
                commit_count: weight.commit_count,
                has_import_edge,
            })
        })
        .collect();

    neighbors.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap());
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cochange::EdgeWeight;

    #[test]
    fn hotspot_scoring_multiplies_frequency_by_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "1\n2\n3\n").unwrap();

        let mut graph = CoChangeGraph::default();
        graph.change_frequency.insert("a.ts".to_string(), 4);

        let entries = hotspots(&graph, dir.path(), 10);
        assert_eq!(entries[0].score, 12);
    }

    #[test]
    fn classify_slope_detects_increasing_trend() {
        let series = vec![0, 5, 10, 15, 20];
        assert_eq!(classify_slope(&series, 0.05), Trend::Increasing);
    }

    #[test]
    fn classify_slope_detects_stable_trend() {
        let series = vec![10, 10, 10, 10];
        assert_eq!(classify_slope(&series, 0.05), Trend::Stable);
    }

    #[test]
    fn neighborhood_sorted_by_weight_descending() {
        let mut graph = CoChangeGraph::default();
        graph
            .edges
            .insert(("a.ts".into(), "b.ts".into()), EdgeWeight { weight: 0.5, commit_count: 1 });
        graph
            .edges
            .insert(("a.ts".into(), "c.ts".into()), EdgeWeight { weight: 2.0, commit_count: 3 });

        let imports = ImportScanResult::default();
        let neighbors = file_neighborhood(&graph, &imports, "a.ts");

        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].neighbor, "c.ts");
        assert_eq!(neighbors[1].neighbor, "b.ts");
    }
}
