//! Level-range validity decorator.

use std::sync::Arc;

use crate::errors::DiError;
use crate::scope::{Scope, ScopeOptions};

use super::{Arg, Instance, Provider};

/// Restricts a provider to scopes whose nesting level falls in the
/// inclusive `[min, max]` range. Typically composed around a
/// [`SingletonProvider`](super::SingletonProvider) to open a fresh cache
/// boundary at the first level the provider becomes valid.
pub struct LevelRangeProvider {
    min: u32,
    max: u32,
    inner: Arc<dyn Provider>,
}

impl LevelRangeProvider {
    pub fn new(min: u32, max: u32, inner: Arc<dyn Provider>) -> Self {
        Self { min, max, inner }
    }

    fn in_range(&self, level: u32) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

impl Provider for LevelRangeProvider {
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError> {
        if !self.in_range(scope.level()) {
            return Err(DiError::MismatchedLevel {
                level: scope.level(),
                min: self.min,
                max: self.max,
            });
        }
        self.inner.resolve(scope, args)
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(LevelRangeProvider::new(
            self.min,
            self.max,
            self.inner.clone_provider(),
        ))
    }

    fn dispose(&self) -> Result<(), DiError> {
        self.inner.dispose()
    }

    fn is_valid(&self, options: &ScopeOptions) -> bool {
        self.in_range(options.level) && self.inner.is_valid(options)
    }
}
