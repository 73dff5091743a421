use crate::dataset::{dataset_version, load_articles};
use crate::ArticleCollection;
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded datasets keyed by canonical path, valid while the file's modification time is unchanged.
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<PathBuf, Arc<ArticleCollection>>>,
}

impl DatasetCache {
    pub fn new() -> Self { Self::default() }

    /// Return the cached collection for `path`, loading it on first use or after the file changed.
    pub fn load(&self, path: &Path) -> Result<Arc<ArticleCollection>> {
        let version = dataset_version(path)?;
        {
            let entries = self.entries.read();
            if let Some(hit) = entries.get(&version.path) {
                if hit.version == version {
                    return Ok(Arc::clone(hit));
                }
            }
        }

        // Held across the load so concurrent callers wait for one read of the file.
        let mut entries = self.entries.write();
        if let Some(hit) = entries.get(&version.path) {
            if hit.version == version {
                return Ok(Arc::clone(hit));
            }
            tracing::warn!(path = %version.path.display(), "dataset changed on disk, reloading");
        }
        let collection = Arc::new(load_articles(&version.path)?);
        entries.insert(version.path.clone(), Arc::clone(&collection));
        Ok(collection)
    }

    /// Drop the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&self, path: &Path) -> bool {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.write().remove(&key).is_some()
    }

    pub fn clear(&self) { self.entries.write().clear(); }

    pub fn len(&self) -> usize { self.entries.read().len() }

    pub fn is_empty(&self) -> bool { self.entries.read().is_empty() }
}

/// Compute-once results keyed by `K`.
///
/// Values are computed outside the lock, so two callers missing on the same key may both
/// compute; the first insert wins and later callers get that value.
pub struct MemoCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self { Self { entries: RwLock::new(HashMap::new()) } }
}

impl<K: Eq + Hash, V> MemoCache<K, V> {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, key: &K) -> Option<Arc<V>> { self.entries.read().get(key).cloned() }

    pub fn get_or_try_insert_with<F>(&self, key: K, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = Arc::new(compute()?);
        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(key).or_insert(value)))
    }

    pub fn invalidate(&self, key: &K) -> bool { self.entries.write().remove(key).is_some() }

    /// Keep only entries whose key satisfies `keep`.
    pub fn retain<F: FnMut(&K) -> bool>(&self, mut keep: F) {
        self.entries.write().retain(|k, _| keep(k));
    }

    pub fn clear(&self) { self.entries.write().clear(); }

    pub fn len(&self) -> usize { self.entries.read().len() }

    pub fn is_empty(&self) -> bool { self.entries.read().is_empty() }
}
