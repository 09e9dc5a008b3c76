/*!
 * Backend instance caching.
 *
 * Loaded backends are expensive, so each language pair is loaded at most
 * once. Every pair owns a single-assignment slot; concurrent callers for the
 * same uncached pair wait on the same load and observe the same handle or
 * the same failure. A failed load stays cached until the pair is reloaded
 * or the cache is cleared.
 */

use futures::FutureExt;
use log::{debug, error};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

use crate::backends::{Backend, DeviceAffinity};
use crate::errors::{BackendError, panic_message};

use super::registry::{LanguagePairDescriptor, PairKey};

/// A backend instance ready to serve one language pair
#[derive(Debug)]
pub struct LoadedBackendHandle {
    pub descriptor: LanguagePairDescriptor,
    pub backend: Arc<dyn Backend>,
    pub device: DeviceAffinity,
}

/// Outcome of loading one pair
pub type LoadOutcome = Result<Arc<LoadedBackendHandle>, BackendError>;

type Slot = Arc<OnceCell<LoadOutcome>>;

/// Per-pair cache of loaded backends
#[derive(Debug, Default)]
pub struct BackendCache {
    /// One slot per pair ever requested
    slots: Mutex<HashMap<PairKey, Slot>>,

    /// Cache hit counter
    hits: AtomicUsize,

    /// Cache miss counter (one per load actually started)
    misses: AtomicUsize,
}

impl BackendCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &PairKey) -> Slot {
        let mut slots = self.slots.lock();
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Get the handle for `key`, running `load` if nothing is cached yet
    ///
    /// At most one `load` runs per slot. Callers arriving while it runs wait
    /// for its outcome instead of starting their own. A panicking `load` is
    /// stored as a `LoadFailed` outcome like any other failure.
    pub async fn get_or_load<F, Fut>(&self, key: &PairKey, load: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadOutcome>,
    {
        let slot = self.slot(key);
        let mut loaded_here = false;

        let outcome = slot
            .get_or_init(|| {
                loaded_here = true;
                let pair = key.to_string();
                AssertUnwindSafe(async move { load().await })
                    .catch_unwind()
                    .map(move |result| {
                        result.unwrap_or_else(|payload| {
                            let message = panic_message(payload.as_ref());
                            error!("Backend loader for {} panicked: {}", pair, message);
                            Err(BackendError::LoadFailed {
                                pair,
                                message: format!("loader panicked: {}", message),
                            })
                        })
                    })
            })
            .await
            .clone();

        if loaded_here {
            self.misses.fetch_add(1, Ordering::SeqCst);
            debug!("Backend cache miss for {}", key);
        } else {
            self.hits.fetch_add(1, Ordering::SeqCst);
            debug!("Backend cache hit for {}", key);
        }
        outcome
    }

    /// Successfully loaded handle for `key`, without loading
    pub fn get(&self, key: &PairKey) -> Option<Arc<LoadedBackendHandle>> {
        let slots = self.slots.lock();
        match slots.get(key)?.get()? {
            Ok(handle) => Some(Arc::clone(handle)),
            Err(_) => None,
        }
    }

    /// Drop whatever is cached for `key` so the next request loads afresh
    ///
    /// Requests already holding the old handle keep using it.
    pub fn invalidate(&self, key: &PairKey) -> bool {
        let removed = self.slots.lock().remove(key).is_some();
        if removed {
            debug!("Backend cache entry for {} invalidated", key);
        }
        removed
    }

    /// Number of pairs with a successfully loaded handle
    pub fn loaded_count(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot.get(), Some(Ok(_))))
            .count()
    }

    /// Pair keys with a successfully loaded handle, sorted
    pub fn loaded_pairs(&self) -> Vec<String> {
        let mut pairs: Vec<String> = self
            .slots
            .lock()
            .iter()
            .filter(|(_, slot)| matches!(slot.get(), Some(Ok(_))))
            .map(|(key, _)| key.to_string())
            .collect();
        pairs.sort();
        pairs
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::SeqCst);
        let misses = self.misses.load(Ordering::SeqCst);
        let total = hits + misses;

        let hit_rate = if total > 0 { hits as f64 / total as f64 } else { 0.0 };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.slots.lock().clear();
        self.hits.store(0, Ordering::SeqCst);
        self.misses.store(0, Ordering::SeqCst);
        debug!("Backend cache cleared");
    }

    /// Get the number of pairs with a slot, loaded or failed
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
