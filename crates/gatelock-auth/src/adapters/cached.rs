//! # Snapshot-Caching Config Source
//!
//! Optional wrapper for deployments that prefer not to re-read the
//! store on every request. Readers always see an immutable snapshot;
//! only the refresh path takes a lock, and at most one refresh runs at
//! a time.

use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

use crate::domain::entities::ConfigStore;
use crate::domain::errors::StoreError;
use crate::ports::outbound::ConfigSource;

/// Caches the last successfully loaded store as an `Arc` snapshot.
///
/// `load` serves the cached snapshot when one exists and falls through
/// to the inner source otherwise. [`refresh`](Self::refresh) replaces
/// the snapshot explicitly; concurrent refreshes are serialized while
/// readers keep seeing the previous snapshot.
pub struct CachedConfigSource<S> {
    inner: S,
    snapshot: RwLock<Option<Arc<ConfigStore>>>,
    // Serializes refreshes without blocking snapshot readers.
    refresh_lock: Mutex<()>,
}

impl<S: ConfigSource> CachedConfigSource<S> {
    /// Wraps `inner` with an initially empty cache; the first `load`
    /// populates it.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The current snapshot, if one has been loaded.
    pub fn snapshot(&self) -> Option<Arc<ConfigStore>> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            // A poisoned snapshot lock means a refresh panicked between
            // load and publish; treat the cache as cold.
            Err(_) => None,
        }
    }

    /// Reloads from the inner source and publishes the new snapshot.
    ///
    /// On failure the previous snapshot stays in place, so readers are
    /// never downgraded to an empty store by a transient load error.
    pub fn refresh(&self) -> Result<Arc<ConfigStore>, StoreError> {
        let _refreshing = self.refresh_lock.lock().unwrap_or_else(|p| p.into_inner());

        let store = Arc::new(self.inner.load()?);
        debug!(connections = store.len(), "connection store snapshot refreshed");

        if let Ok(mut guard) = self.snapshot.write() {
            *guard = Some(Arc::clone(&store));
        }
        Ok(store)
    }
}

impl<S: ConfigSource> ConfigSource for CachedConfigSource<S> {
    fn load(&self) -> Result<ConfigStore, StoreError> {
        if let Some(snapshot) = self.snapshot() {
            return Ok((*snapshot).clone());
        }
        Ok((*self.refresh()?).clone())
    }
}
