//! In-process corpus snapshot cache.
//!
//! Avoids re-reading every note on each query when the same content root is
//! queried repeatedly. Each entry is validated against a fresh corpus
//! fingerprint before use, so a changed file forces a rebuild and cached
//! answers never differ from uncached ones.

use super::index::CorpusIndex;
use super::store::{ContentStore, CorpusFingerprint};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

#[derive(Debug, Clone)]
struct CachedCorpus {
    fingerprint: CorpusFingerprint,
    index: Arc<CorpusIndex>,
}

static CORPUS_CACHE: LazyLock<Mutex<HashMap<String, CachedCorpus>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn cache_key(store: &ContentStore) -> String {
    format!(
        "{}|{}",
        store.root().to_string_lossy(),
        store.excluded_dirs().join(",")
    )
}

/// Corpus index for `store`, served from the cache while its fingerprint holds.
///
/// A poisoned cache lock degrades to an uncached build.
#[must_use]
pub fn load_index_cached(store: &ContentStore) -> Arc<CorpusIndex> {
    let key = cache_key(store);
    let fingerprint = store.fingerprint();

    if let Ok(cache) = CORPUS_CACHE.lock()
        && let Some(cached) = cache.get(&key)
    {
        if cached.fingerprint == fingerprint {
            debug!("corpus cache hit for {key}");
            return Arc::clone(&cached.index);
        }
        debug!("corpus cache stale for {key}");
    }

    let index = Arc::new(CorpusIndex::build(store));
    if let Ok(mut cache) = CORPUS_CACHE.lock() {
        cache.insert(
            key.clone(),
            CachedCorpus {
                fingerprint,
                index: Arc::clone(&index),
            },
        );
        debug!(
            "corpus cache insert for {key} ({} nodes)",
            index.node_count()
        );
    }
    index
}

/// Drop the cached snapshot for `store`'s root.
pub fn invalidate(store: &ContentStore) {
    let key = cache_key(store);
    if let Ok(mut cache) = CORPUS_CACHE.lock()
        && cache.remove(&key).is_some()
    {
        debug!("corpus cache invalidated for {key}");
    }
}

/// Drop every cached snapshot.
pub fn invalidate_all() {
    if let Ok(mut cache) = CORPUS_CACHE.lock() {
        let count = cache.len();
        cache.clear();
        if count > 0 {
            debug!("corpus cache cleared: {count} entries");
        }
    }
}

/// Number of cached snapshots.
#[must_use]
pub fn cache_len() -> usize {
    CORPUS_CACHE.lock().map_or(0, |cache| cache.len())
}
