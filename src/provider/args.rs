//! Argument-binding decorator.

use std::sync::Arc;

use crate::errors::DiError;
use crate::scope::{Scope, ScopeOptions};

use super::{Arg, Instance, Provider};

/// Pre-fills trailing arguments: on every resolve the bound arguments are
/// appended after the caller-supplied ones before delegating.
pub struct ArgsProvider {
    bound: Vec<Arg>,
    inner: Arc<dyn Provider>,
}

impl ArgsProvider {
    pub fn new(bound: Vec<Arg>, inner: Arc<dyn Provider>) -> Self {
        Self { bound, inner }
    }
}

impl Provider for ArgsProvider {
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError> {
        let mut combined = Vec::with_capacity(args.len() + self.bound.len());
        combined.extend(args.iter().cloned());
        combined.extend(self.bound.iter().cloned());
        self.inner.resolve(scope, &combined)
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(ArgsProvider {
            bound: self.bound.clone(),
            inner: self.inner.clone_provider(),
        })
    }

    fn dispose(&self) -> Result<(), DiError> {
        self.inner.dispose()
    }

    fn is_valid(&self, options: &ScopeOptions) -> bool {
        self.inner.is_valid(options)
    }
}
