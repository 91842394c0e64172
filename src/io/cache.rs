// src/io/cache.rs

//! Versioned on-disk cache for the dataset and static assets.
//!
//! Resources are addressed by relative path (`data/elements.json`). A
//! `Fetch` implementation supplies the "network" side; the cache keeps the
//! last good copy so the viewer keeps working when the source disappears.

use crate::error::{PtError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DATASET_RESOURCE: &str = "data/elements.json";
pub const SYNC_ATTEMPTS: u32 = 3;

/// Precached on install
pub const STATIC_RESOURCES: [&str; 3] = [
    DATASET_RESOURCE,
    "assets/org.ptview.PTView.svg",
    "assets/org.ptview.PTView.desktop",
];

pub trait Fetch {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>>;
}

/// Reads resources from a local directory tree
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
        let path = self.root.join(relative(resource)?);
        fs::read(&path).map_err(|e| PtError::Offline(format!("{}: {}", path.display(), e)))
    }
}

/// Serves one file for the dataset resource, e.g. a `--data` override
pub struct SingleFileFetcher {
    path: PathBuf,
}

impl SingleFileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetch for SingleFileFetcher {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
        if resource.trim_start_matches('/') != DATASET_RESOURCE {
            return Err(PtError::Offline(resource.to_string()));
        }
        fs::read(&self.path)
            .map_err(|e| PtError::Offline(format!("{}: {}", self.path.display(), e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve cached copy, fetch and store into the bucket on a miss
    CacheFirst(Bucket),
    /// Fetch, store into the dynamic bucket, fall back to any cached copy
    NetworkFirst,
}

/// Dataset copies must parse before they are cached
fn check(resource: &str, bytes: &[u8]) -> Result<()> {
    if resource.ends_with("elements.json") {
        super::dataset::parse(&String::from_utf8_lossy(bytes))?;
    }
    Ok(())
}

/// Rejects absolute paths and parent components
fn relative(resource: &str) -> Result<PathBuf> {
    let path = Path::new(resource.trim_start_matches('/'));
    if path.as_os_str().is_empty()
        || path.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(PtError::Offline(format!("invalid resource path: {}", resource)));
    }
    Ok(path.to_path_buf())
}

pub struct AssetCache {
    root: PathBuf,
    version: String,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self { root: root.into(), version: version.into() }
    }

    /// Cache under the platform cache directory, versioned by the crate version
    pub fn open_default() -> Option<Self> {
        ProjectDirs::from("org", "ptview", "ptview")
            .map(|dirs| Self::new(dirs.cache_dir(), format!("v{}", env!("CARGO_PKG_VERSION"))))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn bucket_name(&self, bucket: Bucket) -> String {
        match bucket {
            Bucket::Static => format!("static-{}", self.version),
            Bucket::Dynamic => format!("dynamic-{}", self.version),
        }
    }

    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(self.bucket_name(bucket))
    }

    pub fn strategy_for(&self, resource: &str) -> Strategy {
        let r = resource.trim_start_matches('/');
        if STATIC_RESOURCES.contains(&r) {
            Strategy::CacheFirst(Bucket::Static)
        } else if r.starts_with("data/") || r.ends_with(".json") {
            Strategy::CacheFirst(Bucket::Dynamic)
        } else {
            Strategy::NetworkFirst
        }
    }

    fn read(&self, bucket: Bucket, resource: &str) -> Option<Vec<u8>> {
        let path = self.bucket_dir(bucket).join(relative(resource).ok()?);
        fs::read(path).ok()
    }

    /// Dynamic copies are newer (background sync writes there)
    fn lookup(&self, resource: &str) -> Option<Vec<u8>> {
        self.read(Bucket::Dynamic, resource)
            .or_else(|| self.read(Bucket::Static, resource))
    }

    fn store(&self, bucket: Bucket, resource: &str, bytes: &[u8]) -> Result<()> {
        let path = self.bucket_dir(bucket).join(relative(resource)?);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(())
    }

    fn store_logged(&self, bucket: Bucket, resource: &str, bytes: &[u8]) {
        if let Err(e) = self.store(bucket, resource, bytes) {
            log::warn!("Could not cache {}: {}", resource, e);
        }
    }

    /// Precache the static resources; returns how many were stored
    pub fn install(&self, fetcher: &dyn Fetch) -> usize {
        let mut stored = 0;
        for resource in STATIC_RESOURCES {
            match fetcher.fetch(resource) {
                Ok(bytes) => match check(resource, &bytes)
                    .and_then(|()| self.store(Bucket::Static, resource, &bytes))
                {
                    Ok(()) => stored += 1,
                    Err(e) => log::warn!("Could not cache {}: {}", resource, e),
                },
                Err(e) => log::debug!("Precache skipped {}: {}", resource, e),
            }
        }
        log::info!("Cache {} installed ({} resources)", self.version, stored);
        stored
    }

    /// Removes cache directories left behind by other versions
    pub fn activate(&self) -> Result<Vec<String>> {
        let keep = [self.bucket_name(Bucket::Static), self.bucket_name(Bucket::Dynamic)];
        let mut removed = Vec::new();

        if !self.root.exists() {
            return Ok(removed);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let versioned = name.starts_with("static-") || name.starts_with("dynamic-");
            if versioned && !keep.contains(&name) && entry.file_type()?.is_dir() {
                log::info!("Removing old cache: {}", name);
                fs::remove_dir_all(entry.path())?;
                removed.push(name);
            }
        }
        Ok(removed)
    }

    pub fn get(&self, resource: &str, fetcher: &dyn Fetch) -> Result<Vec<u8>> {
        relative(resource)?;
        match self.strategy_for(resource) {
            Strategy::CacheFirst(bucket) => {
                if let Some(bytes) = self.lookup(resource) {
                    return Ok(bytes);
                }
                match fetcher.fetch(resource) {
                    Ok(bytes) => {
                        check(resource, &bytes)?;
                        self.store_logged(bucket, resource, &bytes);
                        Ok(bytes)
                    }
                    Err(e) if resource.ends_with("elements.json") => {
                        log::warn!("Fetch failed ({}), using cached dataset", e);
                        self.lookup(DATASET_RESOURCE).ok_or(e)
                    }
                    Err(e) => Err(e),
                }
            }
            Strategy::NetworkFirst => match fetcher.fetch(resource) {
                Ok(bytes) => {
                    self.store_logged(Bucket::Dynamic, resource, &bytes);
                    Ok(bytes)
                }
                Err(e) => {
                    log::debug!("Network-first miss for {}: {}", resource, e);
                    self.lookup(resource).ok_or(e)
                }
            },
        }
    }

    /// Refresh the cached dataset from the source, retrying a few times
    pub fn sync_dataset(&self, fetcher: &dyn Fetch) -> Result<()> {
        let mut last_err = None;
        for attempt in 1..=SYNC_ATTEMPTS {
            match fetcher.fetch(DATASET_RESOURCE) {
                Ok(bytes) => {
                    // Only a parsable copy replaces the cached one
                    check(DATASET_RESOURCE, &bytes)?;
                    self.store(Bucket::Dynamic, DATASET_RESOURCE, &bytes)?;
                    log::info!("Dataset synchronized (attempt {})", attempt);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("Dataset sync attempt {}/{} failed: {}", attempt, SYNC_ATTEMPTS, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| PtError::Offline(DATASET_RESOURCE.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Serves fixed bytes until switched offline
    struct FakeFetcher {
        online: Cell<bool>,
        calls: Cell<u32>,
        body: Vec<u8>,
    }

    impl FakeFetcher {
        fn new(body: &str) -> Self {
            Self { online: Cell::new(true), calls: Cell::new(0), body: body.as_bytes().to_vec() }
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            if self.online.get() {
                Ok(self.body.clone())
            } else {
                Err(PtError::Offline(resource.to_string()))
            }
        }
    }

    const TINY: &str = r#"[{"atomicNumber": 1, "symbol": "H", "name": "Hydrogen", "atomicMass": 1.008, "category": "nonmetal", "group": 1, "period": 1, "block": "s"}]"#;

    #[test]
    fn test_strategy_selection() {
        let cache = AssetCache::new("/tmp/unused", "v1");
        assert_eq!(cache.strategy_for("/data/elements.json"), Strategy::CacheFirst(Bucket::Static));
        assert_eq!(cache.strategy_for("data/extra.json"), Strategy::CacheFirst(Bucket::Dynamic));
        assert_eq!(cache.strategy_for("notes/readme.txt"), Strategy::NetworkFirst);
    }

    #[test]
    fn test_cache_first_serves_after_going_offline() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), "v1");
        let fetcher = FakeFetcher::new(TINY);

        let first = cache.get(DATASET_RESOURCE, &fetcher).unwrap();
        assert_eq!(fetcher.calls.get(), 1);

        fetcher.online.set(false);
        let second = cache.get(DATASET_RESOURCE, &fetcher).unwrap();
        assert_eq!(first, second);
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn test_network_first_falls_back_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), "v1");
        let fetcher = FakeFetcher::new("hello");

        assert_eq!(cache.get("notes/a.txt", &fetcher).unwrap(), b"hello");
        fetcher.online.set(false);
        assert_eq!(cache.get("notes/a.txt", &fetcher).unwrap(), b"hello");
        assert!(matches!(cache.get("notes/b.txt", &fetcher), Err(PtError::Offline(_))));
    }

    #[test]
    fn test_activate_purges_old_versions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("static-v1")).unwrap();
        fs::create_dir_all(dir.path().join("dynamic-v1")).unwrap();
        fs::create_dir_all(dir.path().join("static-v2")).unwrap();
        fs::create_dir_all(dir.path().join("unrelated")).unwrap();

        let cache = AssetCache::new(dir.path(), "v2");
        let mut removed = cache.activate().unwrap();
        removed.sort();
        assert_eq!(removed, vec!["dynamic-v1".to_string(), "static-v1".to_string()]);
        assert!(dir.path().join("static-v2").exists());
        assert!(dir.path().join("unrelated").exists());
    }

    #[test]
    fn test_sync_retries_then_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), "v1");
        let fetcher = FakeFetcher::new(TINY);
        fetcher.online.set(false);

        assert!(cache.sync_dataset(&fetcher).is_err());
        assert_eq!(fetcher.calls.get(), SYNC_ATTEMPTS);

        fetcher.online.set(true);
        cache.sync_dataset(&fetcher).unwrap();
        assert!(cache.bucket_dir(Bucket::Dynamic).join(DATASET_RESOURCE).exists());
    }

    #[test]
    fn test_single_file_source_survives_removal() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("custom.json");
        fs::write(&source, TINY).unwrap();

        let cache = AssetCache::new(dir.path().join("cache"), "v1");
        let fetcher = SingleFileFetcher::new(&source);
        cache.sync_dataset(&fetcher).unwrap();

        fs::remove_file(&source).unwrap();
        assert!(cache.sync_dataset(&fetcher).is_err());
        let bytes = cache.get(DATASET_RESOURCE, &fetcher).unwrap();
        assert_eq!(bytes, TINY.as_bytes());
    }

    #[test]
    fn test_corrupt_first_fetch_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), "v1");
        let fetcher = FakeFetcher::new("[{ broken");

        assert!(matches!(cache.get(DATASET_RESOURCE, &fetcher), Err(PtError::Json(_))));
        assert!(cache.lookup(DATASET_RESOURCE).is_none());

        let tree = dir.path().join("site");
        fs::create_dir_all(tree.join("data")).unwrap();
        fs::write(tree.join(DATASET_RESOURCE), "[{ broken").unwrap();
        cache.install(&FileFetcher::new(tree.clone()));
        assert!(cache.lookup(DATASET_RESOURCE).is_none());
    }

    #[test]
    fn test_file_fetcher_reads_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join(DATASET_RESOURCE), TINY).unwrap();
        let fetcher = FileFetcher::new(dir.path());
        assert_eq!(fetcher.fetch(DATASET_RESOURCE).unwrap(), TINY.as_bytes());
        assert!(fetcher.fetch("data/missing.json").is_err());
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AssetCache::new(dir.path(), "v1");
        let fetcher = FakeFetcher::new("x");
        assert!(cache.get("../secret.txt", &fetcher).is_err());
    }
}
