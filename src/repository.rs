//! Per-scope provider storage.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::di::Key;
use crate::errors::DiError;
use crate::provider::Provider;

/// Key-to-provider map owned by one scope. Lookups are strictly local;
/// parent delegation is the scope's job.
#[derive(Default)]
pub struct ProviderRepository {
    providers: FxHashMap<Key, Arc<dyn Provider>>,
}

impl ProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or overwrites the provider at `key`.
    pub fn add(&mut self, key: Key, provider: Arc<dyn Provider>) {
        self.providers.insert(key, provider);
    }

    /// Registers under a no-override policy.
    pub fn add_unique(&mut self, key: Key, provider: Arc<dyn Provider>) -> Result<(), DiError> {
        if self.providers.contains_key(&key) {
            return Err(DiError::KeyBusy(key));
        }
        self.providers.insert(key, provider);
        Ok(())
    }

    /// Local-only lookup.
    pub fn get(&self, key: &Key) -> Option<Arc<dyn Provider>> {
        self.providers.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Layers this repository's entries under `combined`: entries already
    /// present (collected from nearer scopes) win on key collision.
    pub fn merge_into(&self, combined: &mut FxHashMap<Key, Arc<dyn Provider>>) {
        for (key, provider) in &self.providers {
            combined
                .entry(key.clone())
                .or_insert_with(|| Arc::clone(provider));
        }
    }

    /// Disposes every stored provider, then clears the map. The whole
    /// batch runs even when one provider fails; the first failure is
    /// reported once the batch completes, so a failing provider cannot
    /// leave later caches alive. The owning scope calls this once per
    /// repository lifetime.
    pub fn dispose(&mut self) -> Result<(), DiError> {
        let mut first_failure = None;
        for provider in self.providers.values() {
            if let Err(err) = provider.dispose() {
                first_failure.get_or_insert(err);
            }
        }
        self.providers.clear();
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
