//! Null-object terminus for the parent-delegation chain.

use std::sync::Arc;

use crate::di::Key;
use crate::errors::DiError;
use crate::provider::{Instance, Provider};

use super::Scope;

/// Sentinel standing in for "no container". The root scope's parent is an
/// `EmptyScope`, so recursive delegation terminates here explicitly instead
/// of through a null check: every resolution fails with
/// [`DiError::ProviderNotFound`] and every mutation with
/// [`DiError::MethodNotImplemented`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScope;

impl EmptyScope {
    pub fn resolve(&self, key: impl Into<Key>) -> Result<Instance, DiError> {
        Err(DiError::ProviderNotFound(key.into()))
    }

    pub fn register(
        &self,
        _key: impl Into<Key>,
        _provider: Arc<dyn Provider>,
    ) -> Result<(), DiError> {
        Err(DiError::MethodNotImplemented("register"))
    }

    pub fn create_scope(&self) -> Result<Scope, DiError> {
        Err(DiError::MethodNotImplemented("create_scope"))
    }

    pub fn dispose(&self) -> Result<(), DiError> {
        Err(DiError::MethodNotImplemented("dispose"))
    }
}
