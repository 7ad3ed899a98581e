//! Doc freshness relative to source mtime (spec §4.2, §8 property 8).

use super::docs::{discover_docs, Doc};
use crate::config::FreshnessConfig;
use crate::error::{CoreError, Result};
use crate::types::{component_paths, Manifest};
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

/// Files matching any of these are excluded from the source-mtime
/// computation: tests and discovered docs don't count as "source".
const TEST_FILE_GLOBS: &[&str] = &["*.test.*", "*.spec.*"];

#[derive(Debug, Clone)]
pub struct DocFreshness {
    pub doc: Doc,
    pub source_mtime: DateTime<Utc>,
    pub effective_doc_mtime: DateTime<Utc>,
    pub stale: bool,
}

/// Compute freshness for every discovered doc of `component_name`, using
/// `staleness_threshold_ms` as the strict-inequality cutoff (spec §8:
/// exactly-at-threshold is *not* stale).
pub fn compute_freshness(
    repo_root: &Path,
    component_name: &str,
    manifest: &Manifest,
    config: &FreshnessConfig,
) -> Result<Vec<DocFreshness>> {
    let Some(component) = manifest.components.get(component_name) else {
        return Ok(Vec::new());
    };

    let docs = discover_docs(repo_root, component_name, manifest);
    let doc_paths: std::collections::HashSet<_> = docs.iter().map(|d| d.path.clone()).collect();

    let source_mtime = max_source_mtime(repo_root, &component_paths(&component.path), &doc_paths)?;

    let mut results = Vec::new();
    for doc in docs {
        let doc_mtime = mtime_of(&doc.path)?;
        let ack_mtime = ack_mtime(&doc.path)?;
        let effective = match ack_mtime {
            Some(ack) if ack > doc_mtime => ack,
            _ => doc_mtime,
        };

        let delta_ms = (source_mtime - effective).num_milliseconds();
        let stale = delta_ms > config.staleness_threshold_ms;

        results.push(DocFreshness {
            doc,
            source_mtime,
            effective_doc_mtime: effective,
            stale,
        });
    }

    Ok(results)
}

/// Given a baseline timestamp, the components among `component_names`
/// whose current source mtime is strictly newer than the baseline (spec
/// §4.2 "warm staleness").
pub fn warm_staleness(
    repo_root: &Path,
    component_names: &[String],
    manifest: &Manifest,
    baseline: DateTime<Utc>,
) -> Result<Vec<String>> {
    let mut stale = Vec::new();
    for name in component_names {
        let Some(component) = manifest.components.get(name) else {
            continue;
        };
        let docs = discover_docs(repo_root, name, manifest);
        let doc_paths: std::collections::HashSet<_> = docs.iter().map(|d| d.path.clone()).collect();
        let source_mtime = max_source_mtime(repo_root, &component_paths(&component.path), &doc_paths)?;
        if source_mtime > baseline {
            stale.push(name.clone());
        }
    }
    Ok(stale)
}

/// Write (or refresh) a `.ack` companion file beside `doc_path`, stamped
/// with the current time, so subsequent freshness checks treat the doc as
/// current as of now even if its own mtime predates the source change.
pub fn acknowledge_freshness(doc_path: &Path) -> Result<()> {
    let ack_path = ack_path_for(doc_path);
    std::fs::write(&ack_path, Utc::now().to_rfc3339()).map_err(|e| CoreError::io(ack_path, e))
}

fn ack_path_for(doc_path: &Path) -> std::path::PathBuf {
    let mut name = doc_path.as_os_str().to_os_string();
    name.push(".ack");
    std::path::PathBuf::from(name)
}

fn ack_mtime(doc_path: &Path) -> Result<Option<DateTime<Utc>>> {
    let ack_path = ack_path_for(doc_path);
    match std::fs::read_to_string(&ack_path) {
        Ok(contents) => Ok(DateTime::parse_from_rfc3339(contents.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::io(ack_path, e)),
    }
}

fn mtime_of(path: &Path) -> Result<DateTime<Utc>> {
    let metadata = std::fs::metadata(path).map_err(|e| CoreError::io(path, e))?;
    let modified = metadata.modified().map_err(|e| CoreError::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

fn max_source_mtime(
    repo_root: &Path,
    owned_paths: &[String],
    excluded_docs: &std::collections::HashSet<std::path::PathBuf>,
) -> Result<DateTime<Utc>> {
    let mut max_mtime = DateTime::<Utc>::from(std::time::UNIX_EPOCH);

    for owned in owned_paths {
        let root = repo_root.join(owned);
        if !root.exists() {
            continue;
        }
        for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if excluded_docs.contains(path) {
                continue;
            }
            if is_test_file(path) {
                continue;
            }
            let mtime = mtime_of(path)?;
            if mtime > max_mtime {
                max_mtime = mtime;
            }
        }
    }

    Ok(max_mtime)
}

fn is_test_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    if path_str.contains("__tests__") {
        return true;
    }
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    TEST_FILE_GLOBS.iter().any(|glob| {
        glob::Pattern::new(glob)
            .map(|p| p.matches(file_name))
            .unwrap_or(false)
    })
}
