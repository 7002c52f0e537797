//! Tag-based validity decorator.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::errors::DiError;
use crate::scope::{Scope, ScopeOptions};

use super::{Arg, Instance, Provider};

/// Restricts a provider to scopes whose tag set intersects the provider's
/// tags. Intersection (not superset) is the matching rule: one shared tag
/// is enough.
pub struct TaggedProvider {
    tags: FxHashSet<String>,
    inner: Arc<dyn Provider>,
}

impl TaggedProvider {
    pub fn new<I, S>(tags: I, inner: Arc<dyn Provider>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            inner,
        }
    }

    fn intersects(&self, scope_tags: &FxHashSet<String>) -> bool {
        self.tags.iter().any(|tag| scope_tags.contains(tag))
    }
}

impl Provider for TaggedProvider {
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError> {
        if !self.intersects(scope.tags()) {
            return Err(DiError::MismatchedTag {
                provider_tags: self.tags.iter().cloned().collect(),
                scope_tags: scope.tags().iter().cloned().collect(),
            });
        }
        self.inner.resolve(scope, args)
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(TaggedProvider {
            tags: self.tags.clone(),
            inner: self.inner.clone_provider(),
        })
    }

    fn dispose(&self) -> Result<(), DiError> {
        self.inner.dispose()
    }

    fn is_valid(&self, options: &ScopeOptions) -> bool {
        self.intersects(&options.tags) && self.inner.is_valid(options)
    }
}
