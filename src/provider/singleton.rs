//! One-shot caching decorator.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::errors::DiError;
use crate::scope::{Scope, ScopeOptions};

use super::{Arg, Instance, Provider};

/// Caches the first resolved value and returns it for every later resolve,
/// ignoring new arguments. The cache is released on [`dispose`].
///
/// Cloning produces an independent decorator with an empty cache; sharing a
/// cache across scopes happens by sharing the provider itself (`Arc`), which
/// is how a scope inherits providers that were already valid in its parent.
///
/// [`dispose`]: Provider::dispose
pub struct SingletonProvider {
    inner: Arc<dyn Provider>,
    cached: Mutex<Option<Instance>>,
}

impl SingletonProvider {
    pub fn new(inner: Arc<dyn Provider>) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<Instance>> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Provider for SingletonProvider {
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError> {
        if let Some(cached) = self.lock_cache().as_ref() {
            trace!(level = scope.level(), "singleton cache hit");
            return Ok(Arc::clone(cached));
        }
        // The lock is not held across the inner resolve so a factory may
        // resolve its own dependencies through the same scope.
        let instance = self.inner.resolve(scope, args)?;
        let mut cached = self.lock_cache();
        if let Some(existing) = cached.as_ref() {
            return Ok(Arc::clone(existing));
        }
        *cached = Some(Arc::clone(&instance));
        Ok(instance)
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(SingletonProvider::new(self.inner.clone_provider()))
    }

    fn dispose(&self) -> Result<(), DiError> {
        self.lock_cache().take();
        self.inner.dispose()
    }

    fn is_valid(&self, options: &ScopeOptions) -> bool {
        self.inner.is_valid(options)
    }
}
