//! Tunable configuration for the co-change analyzer, hotspot scoring, and
//! freshness checker (spec §9 "Configuration structs"). Loaded from an
//! optional `.varp/config.json` beside the manifest; every field has the
//! default given in §4.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level tunables record. Mirrors the `{ cochange, hotspots, freshness }`
/// shape specified in §9 exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VarpConfig {
    pub cochange: CoChangeConfig,
    pub hotspots: HotspotConfig,
    pub freshness: FreshnessConfig,
}

impl Default for VarpConfig {
    fn default() -> Self {
        Self {
            cochange: CoChangeConfig::default(),
            hotspots: HotspotConfig::default(),
            freshness: FreshnessConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoChangeConfig {
    /// Commits touching more files than this are dropped entirely (§4.4).
    pub commit_size_ceiling: usize,
    /// Case-insensitive substring match against the commit subject line.
    pub message_excludes: Vec<String>,
    /// Glob patterns excluded per-file (lockfiles, build output, `.varp/`).
    pub file_excludes: Vec<String>,
}

impl Default for CoChangeConfig {
    fn default() -> Self {
        Self {
            commit_size_ceiling: 50,
            message_excludes: vec![
                "chore".into(),
                "style".into(),
                "format".into(),
                "lint".into(),
                "merge".into(),
                "rebase".into(),
            ],
            file_excludes: vec![
                "**/*.lock".into(),
                "**/Cargo.lock".into(),
                "**/package-lock.json".into(),
                "**/*.d.ts".into(),
                ".varp/**".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HotspotConfig {
    /// Maximum number of historical commits sampled per complexity trend.
    pub max_commits: usize,
    /// Relative slope magnitude above which a trend is `increasing`/`decreasing`.
    pub trend_threshold: f64,
    /// Minimum checkpoint count required to classify a trend at all.
    pub trend_min_commits: usize,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            max_commits: 500,
            trend_threshold: 0.05,
            trend_min_commits: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FreshnessConfig {
    /// A doc is stale iff `source_mtime - doc_mtime > staleness_threshold_ms`.
    pub staleness_threshold_ms: i64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            staleness_threshold_ms: 5_000,
        }
    }
}

impl VarpConfig {
    /// Load `.varp/config.json` relative to `repo_root`, falling back to
    /// defaults when the file is absent. A malformed file is logged and
    /// treated the same as a missing one — config is an optional input
    /// (spec §6), never a hard failure.
    pub fn load(repo_root: &Path) -> Self {
        let path = repo_root.join(".varp").join("config.json");
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "malformed .varp/config.json, falling back to defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ceiling_is_fifty() {
        assert_eq!(VarpConfig::default().cochange.commit_size_ceiling, 50);
    }

    #[test]
    fn default_freshness_threshold_is_five_seconds() {
        assert_eq!(VarpConfig::default().freshness.staleness_threshold_ms, 5_000);
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VarpConfig::load(dir.path());
        assert_eq!(config, VarpConfig::default());
    }

    #[test]
    fn load_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".varp")).unwrap();
        std::fs::write(dir.path().join(".varp/config.json"), b"{not json").unwrap();
        let config = VarpConfig::load(dir.path());
        assert_eq!(config, VarpConfig::default());
    }

    #[test]
    fn load_overrides_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".varp")).unwrap();
        let custom = VarpConfig {
            cochange: CoChangeConfig {
                commit_size_ceiling: 10,
                ..Default::default()
            },
            ..Default::default()
        };
        std::fs::write(
            dir.path().join(".varp/config.json"),
            serde_json::to_string(&custom).unwrap(),
        )
        .unwrap();
        let loaded = VarpConfig::load(dir.path());
        assert_eq!(loaded.cochange.commit_size_ceiling, 10);
    }
}
