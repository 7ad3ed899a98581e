//! Process-local manifest cache keyed by `(absolute_path, mtime)`
//! (spec §3.7 "Manifest is read once per session; cached by
//! `(absolute_path, mtime)`", §9 "process-local manifest caching ...
//! is purely a performance optimization — correctness does not depend
//! on it").

use super::parse_manifest;
use crate::error::{CoreError, Result};
use crate::types::Manifest;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Shared across however many calls a session makes; safe to wrap in an
/// `Arc` and hand to concurrent callers since `DashMap` is the only
/// mutable state and it's keyed so a stale entry is simply never looked
/// up again once the file's mtime moves (spec §9 "Global mutable state:
/// None is permitted" — this is the one sanctioned, explicitly-named
/// exception, and it holds no state beyond what a cache-miss reparse
/// would also produce).
#[derive(Default)]
pub struct ManifestCache {
    entries: DashMap<(PathBuf, SystemTime), Manifest>,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path`, reusing the cached result when its mtime matches a
    /// prior call. A changed mtime is a different key, so this never
    /// needs explicit invalidation.
    pub fn get_or_parse(&self, path: &Path) -> Result<Manifest> {
        let absolute = std::fs::canonicalize(path).map_err(|e| CoreError::io(path, e))?;
        let mtime = std::fs::metadata(&absolute)
            .and_then(|m| m.modified())
            .map_err(|e| CoreError::io(&absolute, e))?;
        let key = (absolute.clone(), mtime);

        if let Some(cached) = self.entries.get(&key) {
            return Ok(cached.clone());
        }

        let manifest = parse_manifest(&absolute)?;
        self.entries.insert(key, manifest.clone());
        Ok(manifest)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("manifest.yaml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn caches_across_repeated_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            "version: \"1\"\ncomponents:\n  core:\n    path: \"src/core\"\n",
        );

        let cache = ManifestCache::new();
        let first = cache.get_or_parse(&path).unwrap();
        assert_eq!(cache.len(), 1);
        let second = cache.get_or_parse(&path).unwrap();
        assert_eq!(first.version, second.version);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_paths_get_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_manifest(
            dir.path(),
            "version: \"1\"\ncomponents:\n  a:\n    path: \"src/a\"\n",
        );
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let b_path = dir.path().join("sub/manifest.yaml");
        std::fs::write(
            &b_path,
            "version: \"1\"\ncomponents:\n  b:\n    path: \"src/b\"\n",
        )
        .unwrap();

        let cache = ManifestCache::new();
        cache.get_or_parse(&a).unwrap();
        cache.get_or_parse(&b_path).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn mtime_change_causes_fresh_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            "version: \"1\"\ncomponents:\n  core:\n    path: \"src/core\"\n",
        );

        let cache = ManifestCache::new();
        let first = cache.get_or_parse(&path).unwrap();
        assert_eq!(first.version, "1");

        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(
            &path,
            "version: \"2\"\ncomponents:\n  core:\n    path: \"src/core\"\n",
        )
        .unwrap();

        let second = cache.get_or_parse(&path).unwrap();
        assert_eq!(second.version, "2");
        assert_eq!(cache.len(), 2);
    }
}
