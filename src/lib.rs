//! # scopetree
//!
//! A hierarchical scope/provider resolution engine for dependency
//! injection: a tree of nested containers ([`Scope`]) mapping opaque keys
//! to factories ([`Provider`]), with singleton caching, tag-/level-/name-
//! based visibility, and a deterministic disposal cascade.
//!
//! Resolution is local-first: a scope consults its own repository and
//! delegates to its parent when no valid provider exists, terminating at
//! the [`EmptyScope`] sentinel. Child scopes are seeded once, at creation
//! time, from every parent provider whose validity predicate accepts the
//! child's level and tags; providers already valid in the parent are
//! inherited by reference (shared singleton caches), while providers that
//! first become valid at the child are cloned into a fresh cache boundary.
//!
//! ```
//! use scopetree::{factory, singleton, Scope};
//!
//! let root = Scope::root();
//! root.register("logger", singleton(factory(|_, _| String::from("log"))))?;
//!
//! let a = root.resolve_as::<String>("logger")?;
//! let child = root.create_scope()?;
//! let b = child.resolve_as::<String>("logger")?;
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//!
//! root.dispose()?;
//! assert!(child.resolve("logger").is_err());
//! # Ok::<(), scopetree::DiError>(())
//! ```
//!
//! Resolution is synchronous and single-threaded by design; the types are
//! `Send + Sync` so a scope may move between threads, but no atomicity is
//! promised for racing resolves against one cache.

pub mod di;
pub mod errors;
pub mod injector;
pub mod lifecycle;
pub mod provider;
mod repository;
pub mod scope;

pub use di::{Key, Token};
pub use errors::DiError;
pub use injector::{Injector, NullInjector, TypeRegistry};
pub use lifecycle::{LifecycleHook, NoopLifecycle};
pub use provider::{
    arg, at_level, factory, level_range, named, singleton, tagged, try_factory, value, with_args,
    Arg, ArgsProvider, FactoryProvider, Instance, LevelRangeProvider, NamedProvider, Provider,
    SingletonProvider, TaggedProvider, ValueProvider,
};
pub use repository::ProviderRepository;
pub use scope::{EmptyScope, Scope, ScopeBuilder, ScopeOptions};

// Re-exported so downstream code can share the same map/set types without
// depending on rustc-hash directly.
pub use rustc_hash::{FxHashMap, FxHashSet};
