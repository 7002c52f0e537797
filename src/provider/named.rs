//! Scope-name validity decorator.

use std::sync::Arc;

use crate::errors::DiError;
use crate::scope::{Scope, ScopeOptions};

use super::{Arg, Instance, Provider};

/// Restricts a provider to the scope carrying exactly one name. A
/// lighter-weight alternative to tags for single-axis discrimination.
pub struct NamedProvider {
    name: String,
    inner: Arc<dyn Provider>,
}

impl NamedProvider {
    pub fn new(name: impl Into<String>, inner: Arc<dyn Provider>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl Provider for NamedProvider {
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError> {
        if scope.name() != Some(self.name.as_str()) {
            return Err(DiError::MismatchedName {
                expected: self.name.clone(),
                actual: scope.name().map(str::to_owned),
            });
        }
        self.inner.resolve(scope, args)
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(NamedProvider {
            name: self.name.clone(),
            inner: self.inner.clone_provider(),
        })
    }

    fn dispose(&self) -> Result<(), DiError> {
        self.inner.dispose()
    }

    fn is_valid(&self, options: &ScopeOptions) -> bool {
        options.name.as_deref() == Some(self.name.as_str()) && self.inner.is_valid(options)
    }
}
