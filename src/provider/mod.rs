//! Provider abstraction and base providers.
//!
//! A provider is a leaf factory capability: given the resolving scope and
//! extra arguments, produce a value. Providers know nothing about scoping
//! rules; decorators ([`singleton`], [`level_range`], [`tagged`], [`named`],
//! [`with_args`]) layer caching and validity predicates on top.

use std::any::Any;
use std::sync::Arc;

use crate::errors::DiError;
use crate::scope::{Scope, ScopeOptions};

mod args;
mod level;
mod named;
mod singleton;
mod tagged;

pub use self::args::ArgsProvider;
pub use self::level::LevelRangeProvider;
pub use self::named::NamedProvider;
pub use self::singleton::SingletonProvider;
pub use self::tagged::TaggedProvider;

/// An erased resolved value. `Arc` ownership is what makes singleton
/// identity observable across scopes (`Arc::ptr_eq`).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// One extra resolution argument, shareable so bound arguments can be
/// re-supplied on every resolve.
pub type Arg = Arc<dyn Any + Send + Sync>;

/// Wraps a value as a resolution argument.
pub fn arg<T: Send + Sync + 'static>(value: T) -> Arg {
    Arc::new(value)
}

/// Factory capability producing a value when resolved against a scope.
pub trait Provider: Send + Sync {
    /// Produces a value. Safe to call repeatedly; whether repeated calls
    /// share identity is a decorator concern.
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError>;

    /// Produces an independent copy of this provider. For caching
    /// decorators the copy starts with an empty cache.
    fn clone_provider(&self) -> Arc<dyn Provider>;

    /// Releases any held state (cached instances) and forwards to the
    /// wrapped provider, if any.
    fn dispose(&self) -> Result<(), DiError> {
        Ok(())
    }

    /// Whether this provider may serve the scope described by `options`.
    fn is_valid(&self, options: &ScopeOptions) -> bool {
        let _ = options;
        true
    }
}

type FactoryFn = dyn Fn(&Scope, &[Arg]) -> Result<Instance, DiError> + Send + Sync;

/// Base provider backed by a closure.
pub struct FactoryProvider {
    factory: Arc<FactoryFn>,
}

impl Provider for FactoryProvider {
    fn resolve(&self, scope: &Scope, args: &[Arg]) -> Result<Instance, DiError> {
        (self.factory)(scope, args)
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(FactoryProvider {
            factory: Arc::clone(&self.factory),
        })
    }
}

/// Base provider holding a pre-built instance.
pub struct ValueProvider {
    instance: Instance,
}

impl Provider for ValueProvider {
    fn resolve(&self, _scope: &Scope, _args: &[Arg]) -> Result<Instance, DiError> {
        Ok(Arc::clone(&self.instance))
    }

    fn clone_provider(&self) -> Arc<dyn Provider> {
        Arc::new(ValueProvider {
            instance: Arc::clone(&self.instance),
        })
    }
}

/// Provider from an infallible factory closure.
pub fn factory<T, F>(f: F) -> Arc<dyn Provider>
where
    T: Send + Sync + 'static,
    F: Fn(&Scope, &[Arg]) -> T + Send + Sync + 'static,
{
    Arc::new(FactoryProvider {
        factory: Arc::new(move |scope, args| Ok(Arc::new(f(scope, args)) as Instance)),
    })
}

/// Provider from a fallible factory closure.
pub fn try_factory<T, F>(f: F) -> Arc<dyn Provider>
where
    T: Send + Sync + 'static,
    F: Fn(&Scope, &[Arg]) -> Result<T, DiError> + Send + Sync + 'static,
{
    Arc::new(FactoryProvider {
        factory: Arc::new(move |scope, args| Ok(Arc::new(f(scope, args)?) as Instance)),
    })
}

/// Provider that always resolves to the given value.
pub fn value<T: Send + Sync + 'static>(v: T) -> Arc<dyn Provider> {
    Arc::new(ValueProvider {
        instance: Arc::new(v),
    })
}

/// Caches the first resolved value; see [`SingletonProvider`].
pub fn singleton(inner: Arc<dyn Provider>) -> Arc<dyn Provider> {
    Arc::new(SingletonProvider::new(inner))
}

/// Restricts validity to scopes whose level falls in `[min, max]`.
pub fn level_range(min: u32, max: u32, inner: Arc<dyn Provider>) -> Arc<dyn Provider> {
    Arc::new(LevelRangeProvider::new(min, max, inner))
}

/// Restricts validity to scopes at exactly `level`.
pub fn at_level(level: u32, inner: Arc<dyn Provider>) -> Arc<dyn Provider> {
    Arc::new(LevelRangeProvider::new(level, level, inner))
}

/// Restricts validity to scopes whose tag set intersects `tags`.
pub fn tagged<I, S>(tags: I, inner: Arc<dyn Provider>) -> Arc<dyn Provider>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Arc::new(TaggedProvider::new(tags, inner))
}

/// Restricts validity to the scope carrying exactly this name.
pub fn named(name: impl Into<String>, inner: Arc<dyn Provider>) -> Arc<dyn Provider> {
    Arc::new(NamedProvider::new(name, inner))
}

/// Appends `bound` after caller-supplied arguments on every resolve.
pub fn with_args(bound: Vec<Arg>, inner: Arc<dyn Provider>) -> Arc<dyn Provider> {
    Arc::new(ArgsProvider::new(bound, inner))
}
