use indexmap::IndexMap;

use super::{Content, DocumentCache};

/// Synchronize a cache's key set against a source-of-truth target set.
///
/// Removal pass first: every cached key absent from `targets` is deleted.
/// Then every target key is added with [`DocumentCache::set_if_key_is_new`],
/// so content for keys that were already cached is never recomputed and their
/// producers are never invoked. Afterwards the cache's key set equals the
/// target's key set.
pub fn reconcile_cache(cache: &mut DocumentCache, targets: IndexMap<String, Content>) {
    let stale: Vec<String> = cache
        .keys()
        .filter(|key| !targets.contains_key(*key))
        .map(str::to_string)
        .collect();
    for key in stale {
        cache.delete(&key);
    }

    for (key, content) in targets {
        cache.set_if_key_is_new(&key, content);
    }
}
