//! Construction-strategy seam.
//!
//! The scope core is agnostic to how a constructible type turns into an
//! instance; it only consumes the [`Injector`] capability. [`TypeRegistry`]
//! is the bundled implementation: an explicit side-table from type identity
//! to factory closure, populated by explicit calls rather than reflection.

use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::di::Key;
use crate::errors::DiError;
use crate::provider::{Arg, Instance};
use crate::scope::Scope;

/// Turns a constructible type into an instance against a scope.
pub trait Injector: Send + Sync {
    fn construct(
        &self,
        scope: &Scope,
        target: TypeId,
        type_name: &'static str,
        args: &[Arg],
    ) -> Result<Instance, DiError>;
}

/// Default injector: knows no types, fails every construction.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInjector;

impl Injector for NullInjector {
    fn construct(
        &self,
        _scope: &Scope,
        target: TypeId,
        type_name: &'static str,
        _args: &[Arg],
    ) -> Result<Instance, DiError> {
        Err(DiError::ProviderNotFound(Key::Type {
            id: target,
            name: type_name,
        }))
    }
}

type TypeFactory = Box<dyn Fn(&Scope, &[Arg]) -> Result<Instance, DiError> + Send + Sync>;

/// Explicit per-type factory registry. Populate it up front, then hand it
/// to the root scope builder.
#[derive(Default)]
pub struct TypeRegistry {
    factories: FxHashMap<TypeId, TypeFactory>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the construction strategy for `T`.
    pub fn provide<T, F>(&mut self, f: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope, &[Arg]) -> Result<T, DiError> + Send + Sync + 'static,
    {
        self.factories.insert(
            TypeId::of::<T>(),
            Box::new(move |scope, args| Ok(Arc::new(f(scope, args)?) as Instance)),
        );
        self
    }

    pub fn knows(&self, target: TypeId) -> bool {
        self.factories.contains_key(&target)
    }
}

impl Injector for TypeRegistry {
    fn construct(
        &self,
        scope: &Scope,
        target: TypeId,
        type_name: &'static str,
        args: &[Arg],
    ) -> Result<Instance, DiError> {
        match self.factories.get(&target) {
            Some(factory) => factory(scope, args),
            None => Err(DiError::ProviderNotFound(Key::Type {
                id: target,
                name: type_name,
            })),
        }
    }
}
