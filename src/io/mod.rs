// src/io/mod.rs
pub mod cache;
pub mod dataset;
pub mod export;

use crate::error::{PtError, Result};
use crate::model::Element;
use dataset::DataSource;

/// Startup load. A file source is synced into the offline cache first, so the
/// last good copy is served when the file later becomes unreadable. A file
/// that reads but does not parse is reported, never masked by the cache.
/// Errors come back with the bundled fallback already in place.
pub fn load_elements(source: &DataSource) -> (Vec<Element>, Option<PtError>) {
    let DataSource::File(path) = source else {
        return dataset::load_with_fallback(source);
    };

    let cached = cache::AssetCache::open_default().map(|cache| {
        if let Err(e) = cache.activate() {
            log::warn!("Cache cleanup failed: {}", e);
        }
        load_through_cache(&cache, path)
    });

    match cached {
        Some(Ok(elements)) => {
            log::info!("Loaded {} elements from {}", elements.len(), source.describe());
            (elements, None)
        }
        _ => dataset::load_with_fallback(source),
    }
}

fn load_through_cache(cache: &cache::AssetCache, path: &std::path::Path) -> Result<Vec<Element>> {
    let fetcher = cache::SingleFileFetcher::new(path);
    match cache.sync_dataset(&fetcher) {
        Ok(()) => {}
        Err(PtError::Offline(e)) => {
            log::warn!("Dataset source unavailable, trying cached copy: {}", e);
        }
        Err(e) => return Err(e),
    }
    let bytes = cache.get(cache::DATASET_RESOURCE, &fetcher)?;
    dataset::parse(&String::from_utf8_lossy(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TINY: &str = r#"[{"atomicNumber": 1, "symbol": "H", "name": "OldHydrogen", "atomicMass": 1.008, "category": "nonmetal", "group": 1, "period": 1, "block": "s"}]"#;

    #[test]
    fn test_corrupt_source_is_not_masked_by_cache() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("custom.json");
        fs::write(&source, TINY).unwrap();
        let cache = cache::AssetCache::new(dir.path().join("cache"), "v1");

        let elements = load_through_cache(&cache, &source).unwrap();
        assert_eq!(elements[0].name, "OldHydrogen");

        fs::write(&source, "[{ broken").unwrap();
        assert!(matches!(load_through_cache(&cache, &source), Err(PtError::Json(_))));
    }

    #[test]
    fn test_missing_source_serves_cached_copy() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("custom.json");
        fs::write(&source, TINY).unwrap();
        let cache = cache::AssetCache::new(dir.path().join("cache"), "v1");
        load_through_cache(&cache, &source).unwrap();

        fs::remove_file(&source).unwrap();
        let elements = load_through_cache(&cache, &source).unwrap();
        assert_eq!(elements[0].name, "OldHydrogen");
    }

    #[test]
    fn test_corrupt_file_source_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("custom.json");
        fs::write(&source, "[{ broken").unwrap();

        let (elements, err) = dataset::load_with_fallback(&DataSource::File(source));
        assert!(matches!(err, Some(PtError::Json(_))));
        assert!(!elements.is_empty());
    }
}
