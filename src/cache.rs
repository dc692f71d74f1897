//! In-process caching of fetched repository snapshots

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::snapshot::{Credentials, SnapshotProvider};

/// Maps repository addresses to the snapshot fetched for them.
///
/// Entries live for the lifetime of the cache; nothing is persisted, so every
/// run starts cold. The entry map stays locked while a fetch is in flight, so
/// an address is fetched at most once even if the cache is shared.
pub struct RepoCache<P: SnapshotProvider> {
    provider: P,
    credentials: Credentials,
    entries: Mutex<HashMap<String, Arc<P::Snapshot>>>,
}

impl<P: SnapshotProvider> RepoCache<P> {
    /// Create an empty cache fetching through `provider` as `credentials`.
    pub fn new(provider: P, credentials: Credentials) -> Self {
        Self {
            provider,
            credentials,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the snapshot for `url`, fetching it on first use.
    pub fn get_or_fetch(&self, url: &str) -> Result<Arc<P::Snapshot>> {
        let mut entries = self.lock()?;
        if let Some(cached) = entries.get(url) {
            debug!("using cached snapshot of {}", url);
            return Ok(Arc::clone(cached));
        }

        info!("cloning repo: {}", url);
        let snapshot = Arc::new(self.provider.fetch(url, &self.credentials)?);
        entries.insert(url.to_string(), Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Check if an address has been fetched
    pub fn contains(&self, url: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(url))
    }

    /// Get the number of cached snapshots
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// The provider snapshots are fetched through.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<P::Snapshot>>>> {
        self.entries.lock().map_err(|_| Error::LockPoisoned {
            context: "repository cache".to_string(),
        })
    }
}
