//! Incremental cache persistence for the co-change graph
//! (`.varp/co-change.json`, spec §4.4, §6).

use super::{CoChangeGraph, EdgeWeight};
use crate::config::CoChangeConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// `last_sha == HEAD` and fingerprints match — return the cache as-is.
    Current,
    /// Fingerprints match but HEAD moved — scan `last_sha..HEAD`, merge.
    Incremental,
    /// No usable cache, or fingerprint mismatch, or corrupted file.
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    pub edges: HashMap<String, EdgeWeight>,
    pub file_frequencies: HashMap<String, u64>,
    pub total_commits_analyzed: u64,
    pub total_commits_filtered: u64,
    pub last_sha: Option<String>,
    pub config_fingerprint: String,
}

impl Serialize for EdgeWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("EdgeWeight", 2)?;
        state.serialize_field("weight", &self.weight)?;
        state.serialize_field("commit_count", &self.commit_count)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for EdgeWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            weight: f64,
            commit_count: u64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(EdgeWeight {
            weight: raw.weight,
            commit_count: raw.commit_count,
        })
    }
}

const EDGE_KEY_SEPARATOR: char = '\0';

impl CacheFile {
    pub fn from_graph(graph: &CoChangeGraph, config_fingerprint: String) -> Self {
        let edges = graph
            .edges
            .iter()
            .map(|((a, b), weight)| (format!("{a}{EDGE_KEY_SEPARATOR}{b}"), *weight))
            .collect();

        Self {
            edges,
            file_frequencies: graph.change_frequency.clone(),
            total_commits_analyzed: graph.total_commits_analyzed,
            total_commits_filtered: graph.total_commits_filtered,
            last_sha: graph.last_sha.clone(),
            config_fingerprint,
        }
    }

    pub fn into_graph(self) -> CoChangeGraph {
        let edges = self
            .edges
            .into_iter()
            .filter_map(|(key, weight)| {
                let (a, b) = key.split_once(EDGE_KEY_SEPARATOR)?;
                Some(((a.to_string(), b.to_string()), weight))
            })
            .collect();

        CoChangeGraph {
            edges,
            change_frequency: self.file_frequencies,
            total_commits_analyzed: self.total_commits_analyzed,
            total_commits_filtered: self.total_commits_filtered,
            last_sha: self.last_sha,
        }
    }
}

/// Field-by-field fingerprint of the filter configuration — any change
/// invalidates incremental reuse since prior edges may have been computed
/// under different exclusion rules.
pub fn fingerprint(config: &CoChangeConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.commit_size_ceiling.to_le_bytes());
    for pattern in &config.message_excludes {
        hasher.update(pattern.as_bytes());
        hasher.update([0u8]);
    }
    for pattern in &config.file_excludes {
        hasher.update(pattern.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

pub fn select_strategy(cached: Option<&CacheFile>, head: &str, fingerprint: &str) -> Strategy {
    let Some(cache) = cached else {
        return Strategy::Full;
    };
    if cache.config_fingerprint != fingerprint {
        return Strategy::Full;
    }
    match &cache.last_sha {
        Some(sha) if sha == head => Strategy::Current,
        Some(_) => Strategy::Incremental,
        None => Strategy::Full,
    }
}

/// `None` on a missing or corrupted cache file — both fall back to `Full`
/// (spec §7 `CacheMismatch`), logged but never surfaced as an error.
pub fn load_cache(path: &Path) -> Option<CacheFile> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(cache) => Some(cache),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "corrupted co-change cache, falling back to full scan");
            None
        }
    }
}

/// Write-to-temp-then-rename so a crash mid-write never leaves a partial
/// cache file behind (spec §5 "atomic rename").
pub fn save_cache_atomic(path: &Path, cache: &CacheFile) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(serde_json::to_string_pretty(cache)?.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
