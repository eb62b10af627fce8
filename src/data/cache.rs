use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::{debug, info};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CACHE_VERSION: u32 = 1;
pub const CACHE_CAPACITY: usize = 32;
const CACHE_PREFIX: &str = "api-cache-v";

pub fn cache_file_name() -> String {
    format!("{CACHE_PREFIX}{CACHE_VERSION}.json")
}

/// Default directory for the persisted response cache.
pub fn default_cache_dir() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("SKYCAST_CACHE_DIR") {
        return Some(PathBuf::from(base));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".cache").join("skycast"))
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    /// Least recently used first.
    entries: Vec<(String, Value)>,
}

/// Last good `/api/*` envelope per request URL.
#[derive(Debug)]
pub struct ApiCache {
    entries: LruCache<String, Value>,
    path: Option<PathBuf>,
}

impl Default for ApiCache {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl ApiCache {
    pub fn in_memory() -> Self {
        Self {
            entries: LruCache::new(capacity()),
            path: None,
        }
    }

    /// Opens the cache file in `dir`, removing files left by other cache versions.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).context("creating cache directory failed")?;
        evict_stale_versions(dir)?;

        let path = dir.join(cache_file_name());
        let mut entries = LruCache::new(capacity());
        if let Ok(content) = fs::read_to_string(&path) {
            match serde_json::from_str::<CacheFile>(&content) {
                Ok(file) if file.version == CACHE_VERSION => {
                    for (key, value) in file.entries {
                        entries.put(key, value);
                    }
                }
                Ok(file) => debug!("ignoring cache file with version {}", file.version),
                Err(err) => debug!("ignoring unreadable cache file: {err}"),
            }
        }

        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    /// Stores a response and writes the file through when the cache is on disk.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> anyhow::Result<()> {
        self.entries.put(key.into(), value);
        self.persist()
    }

    fn persist(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self
                .entries
                .iter()
                .rev()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };
        let payload = serde_json::to_string(&file).context("serializing cache payload failed")?;
        fs::write(path, payload).context("writing cache file failed")
    }
}

fn capacity() -> NonZeroUsize {
    NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN)
}

fn evict_stale_versions(dir: &Path) -> anyhow::Result<()> {
    let current = cache_file_name();
    let listing = fs::read_dir(dir).context("listing cache directory failed")?;
    for entry in listing.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(CACHE_PREFIX) && name.ends_with(".json") && name != current {
            fs::remove_file(entry.path())
                .with_context(|| format!("removing stale cache {name} failed"))?;
            info!("evicted stale cache file {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entries_survive_a_reopen_in_recency_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cache = ApiCache::open(dir.path()).expect("open");
        cache.put("a", json!({"success": true, "n": 1})).expect("put a");
        cache.put("b", json!({"success": true, "n": 2})).expect("put b");
        assert_eq!(cache.get("a"), Some(json!({"success": true, "n": 1})));
        cache.put("c", json!({"success": true, "n": 3})).expect("put c");

        let reopened = ApiCache::open(dir.path()).expect("reopen");
        assert_eq!(reopened.len(), 3);
        let order: Vec<&str> = reopened.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn opening_evicts_other_versions_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("api-cache-v0.json"), "{}").expect("write v0");
        fs::write(dir.path().join("settings.json"), "{}").expect("write other");

        let cache = ApiCache::open(dir.path()).expect("open");
        assert!(!dir.path().join("api-cache-v0.json").exists());
        assert!(dir.path().join("settings.json").exists());
        assert_eq!(
            cache.path(),
            Some(dir.path().join("api-cache-v1.json").as_path())
        );
    }

    #[test]
    fn capacity_drops_least_recent_entries() {
        let mut cache = ApiCache::in_memory();
        for n in 0..=CACHE_CAPACITY {
            cache.put(format!("k{n}"), json!(n)).expect("put");
        }
        assert_eq!(cache.len(), CACHE_CAPACITY);
        assert!(cache.get("k0").is_none());
        assert_eq!(cache.get("k32"), Some(json!(32)));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(cache_file_name()), "not json").expect("write");
        let cache = ApiCache::open(dir.path()).expect("open");
        assert!(cache.is_empty());
    }
}
