//! The scope tree: hierarchical containers orchestrating provider
//! resolution, inheritance, and teardown.
//!
//! A [`Scope`] owns a local [`ProviderRepository`], a parent link (the
//! [`EmptyScope`] sentinel for the root), a nesting level, a tag set, and
//! weak links to the scopes created from it. Resolution is local-first with
//! recursive parent delegation; child creation clones or shares eligible
//! parent providers once, at creation time; disposal cascades top-down and
//! releases every cached instance.

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::di::{Key, Token};
use crate::errors::DiError;
use crate::injector::{Injector, NullInjector};
use crate::lifecycle::{LifecycleHook, NoopLifecycle};
use crate::provider::{Arg, Instance, Provider};
use crate::repository::ProviderRepository;

mod empty;
pub use self::empty::EmptyScope;

/// The visibility-relevant description of a scope, handed to
/// [`Provider::is_valid`] predicates.
#[derive(Debug, Clone, Default)]
pub struct ScopeOptions {
    /// Depth from the root (root = 0).
    pub level: u32,
    /// Tags assigned at creation. Not inherited; a child only carries the
    /// tags passed explicitly when it was created.
    pub tags: FxHashSet<String>,
    /// Optional scope name, matched by named providers.
    pub name: Option<String>,
}

impl ScopeOptions {
    pub fn at_level(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
enum Parent {
    Empty(EmptyScope),
    Scope(Scope),
}

struct ScopeState {
    providers: ProviderRepository,
    children: Vec<Weak<ScopeInner>>,
    tracked: Vec<Instance>,
    seen: FxHashSet<usize>,
    disposed: bool,
}

struct ScopeInner {
    options: ScopeOptions,
    injector: Arc<dyn Injector>,
    hook: Arc<dyn LifecycleHook>,
    parent: Mutex<Parent>,
    state: Mutex<ScopeState>,
}

/// A node in the resolution tree. Cheap to clone; all clones are handles
/// to the same scope.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    /// A root scope with default options, no injector, and a no-op
    /// lifecycle hook.
    pub fn root() -> Scope {
        Scope::builder().build()
    }

    /// Configures a root scope.
    pub fn builder() -> ScopeBuilder {
        ScopeBuilder::new()
    }

    pub fn level(&self) -> u32 {
        self.inner.options.level
    }

    pub fn tags(&self) -> &FxHashSet<String> {
        &self.inner.options.tags
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.options.name.as_deref()
    }

    pub fn options(&self) -> &ScopeOptions {
        &self.inner.options
    }

    pub fn is_disposed(&self) -> bool {
        self.lock_state().disposed
    }

    /// The parent scope, or `None` at the root / after disposal.
    pub fn parent(&self) -> Option<Scope> {
        match &*self.lock_parent() {
            Parent::Scope(parent) => Some(parent.clone()),
            Parent::Empty(_) => None,
        }
    }

    /// Registers (or overwrites) a provider under `key`.
    pub fn register(
        &self,
        key: impl Into<Key>,
        provider: Arc<dyn Provider>,
    ) -> Result<&Self, DiError> {
        self.ensure_active()?;
        let key = key.into();
        if key.is_empty() {
            return Err(DiError::MissingRegistrationKey);
        }
        debug!(%key, level = self.level(), "registering provider");
        self.lock_state().providers.add(key, provider);
        Ok(self)
    }

    /// Registers under a no-override policy; collisions fail with
    /// [`DiError::KeyBusy`].
    pub fn register_unique(
        &self,
        key: impl Into<Key>,
        provider: Arc<dyn Provider>,
    ) -> Result<&Self, DiError> {
        self.ensure_active()?;
        let key = key.into();
        if key.is_empty() {
            return Err(DiError::MissingRegistrationKey);
        }
        self.lock_state().providers.add_unique(key, provider)?;
        Ok(self)
    }

    /// Resolves `key` against this scope, delegating to ancestors when no
    /// valid local provider exists.
    pub fn resolve(&self, key: impl Into<Key>) -> Result<Instance, DiError> {
        self.resolve_with(key, &[])
    }

    /// [`resolve`](Scope::resolve) with extra arguments forwarded to the
    /// provider.
    pub fn resolve_with(&self, key: impl Into<Key>, args: &[Arg]) -> Result<Instance, DiError> {
        self.ensure_active()?;
        self.resolve_key(&key.into(), args)
    }

    /// Resolves and downcasts to `T`.
    pub fn resolve_as<T: Any + Send + Sync>(
        &self,
        key: impl Into<Key>,
    ) -> Result<Arc<T>, DiError> {
        self.ensure_active()?;
        let key = key.into();
        let instance = self.resolve_key(&key, &[])?;
        instance
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                key,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Resolves a typed token.
    pub fn resolve_token<T: Any + Send + Sync>(&self, token: Token<T>) -> Result<Arc<T>, DiError> {
        self.resolve_as::<T>(token.key())
    }

    /// Constructs an instance of `T` through the configured injector. The
    /// result is tracked for lifecycle purposes but never cached by the
    /// scope; caching is exclusively a property of key-based providers.
    pub fn resolve_type<T: Any + Send + Sync>(&self, args: &[Arg]) -> Result<Arc<T>, DiError> {
        self.ensure_active()?;
        let instance = self.inner.injector.construct(
            self,
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            args,
        )?;
        self.track(&instance);
        instance
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                key: Key::of::<T>(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Creates an untagged, unnamed child scope.
    pub fn create_scope(&self) -> Result<Scope, DiError> {
        self.ensure_active()?;
        self.spawn(FxHashSet::default(), None)
    }

    /// Creates a child scope carrying the given tags.
    pub fn create_scope_tagged<I, S>(&self, tags: I) -> Result<Scope, DiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_active()?;
        self.spawn(tags.into_iter().map(Into::into).collect(), None)
    }

    /// Creates a named child scope.
    pub fn create_scope_named(&self, name: impl Into<String>) -> Result<Scope, DiError> {
        self.ensure_active()?;
        self.spawn(FxHashSet::default(), Some(name.into()))
    }

    /// Creates a named child scope that also carries tags, so name- and
    /// tag-discriminated providers can serve the same scope.
    pub fn create_scope_named_tagged<I, S>(
        &self,
        name: impl Into<String>,
        tags: I,
    ) -> Result<Scope, DiError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_active()?;
        self.spawn(
            tags.into_iter().map(Into::into).collect(),
            Some(name.into()),
        )
    }

    /// Tears this scope down: marks it disposed, detaches it from its
    /// parent, cascades to children, disposes the local repository
    /// (releasing singleton caches), and replays `on_dispose` for every
    /// tracked instance. Teardown always runs to completion; if a
    /// provider fails to dispose, the first failure is reported after the
    /// cascade finishes. A second call is a no-op.
    pub fn dispose(&self) -> Result<(), DiError> {
        {
            let mut state = self.lock_state();
            if state.disposed {
                return Ok(());
            }
            state.disposed = true;
        }
        debug!(level = self.level(), "disposing scope");

        // Detach first so a lingering handle can never resolve through a
        // live parent chain.
        let old_parent = {
            let mut parent = self.lock_parent();
            std::mem::replace(&mut *parent, Parent::Empty(EmptyScope))
        };
        if let Parent::Scope(parent) = old_parent {
            parent.forget_child(&self.inner);
        }

        let mut first_failure = None;

        let children = std::mem::take(&mut self.lock_state().children);
        for child in children {
            if let Some(inner) = child.upgrade() {
                if let Err(err) = (Scope { inner }).dispose() {
                    first_failure.get_or_insert(err);
                }
            }
        }

        let mut providers = std::mem::take(&mut self.lock_state().providers);
        if let Err(err) = providers.dispose() {
            first_failure.get_or_insert(err);
        }

        let tracked = {
            let mut state = self.lock_state();
            state.seen.clear();
            std::mem::take(&mut state.tracked)
        };
        for instance in &tracked {
            self.inner.hook.on_dispose(instance);
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn resolve_key(&self, key: &Key, args: &[Arg]) -> Result<Instance, DiError> {
        let local = self.lock_state().providers.get(key);
        if let Some(provider) = local {
            if provider.is_valid(&self.inner.options) {
                let instance = provider.resolve(self, args)?;
                self.track(&instance);
                return Ok(instance);
            }
        }
        match self.parent_link() {
            Parent::Scope(parent) => {
                trace!(%key, level = self.level(), "delegating resolution to parent");
                parent.resolve_key(key, args)
            }
            Parent::Empty(empty) => empty.resolve(key.clone()),
        }
    }

    /// Notifies the lifecycle hook exactly once per distinct instance and
    /// remembers the instance for replay at disposal.
    fn track(&self, instance: &Instance) {
        let fresh = {
            let mut state = self.lock_state();
            let id = Arc::as_ptr(instance) as *const () as usize;
            if state.seen.insert(id) {
                state.tracked.push(Arc::clone(instance));
                true
            } else {
                false
            }
        };
        if fresh {
            self.inner.hook.on_construct(instance);
        }
    }

    fn spawn(&self, tags: FxHashSet<String>, name: Option<String>) -> Result<Scope, DiError> {
        let child_options = ScopeOptions {
            level: self.level() + 1,
            tags,
            name,
        };

        let mut effective: FxHashMap<Key, Arc<dyn Provider>> = FxHashMap::default();
        self.collect_effective(&mut effective);

        let mut providers = ProviderRepository::new();
        for (key, provider) in effective {
            if !provider.is_valid(&child_options) {
                continue;
            }
            // A provider already valid here is inherited by reference, so
            // its cache boundary (and any cached singleton) stays shared.
            // A provider that first becomes valid at the child is cloned,
            // opening a fresh boundary there.
            let inherited = if provider.is_valid(&self.inner.options) {
                provider
            } else {
                provider.clone_provider()
            };
            providers.add(key, inherited);
        }

        debug!(
            level = child_options.level,
            tags = ?child_options.tags,
            inherited = providers.len(),
            "creating child scope"
        );

        let child = Scope {
            inner: Arc::new(ScopeInner {
                injector: Arc::clone(&self.inner.injector),
                hook: self.inner.hook.fork(),
                options: child_options,
                parent: Mutex::new(Parent::Scope(self.clone())),
                state: Mutex::new(ScopeState {
                    providers,
                    children: Vec::new(),
                    tracked: Vec::new(),
                    seen: FxHashSet::default(),
                    disposed: false,
                }),
            }),
        };
        self.lock_state().children.push(Arc::downgrade(&child.inner));
        Ok(child)
    }

    /// Collects the union of local and inherited providers, nearer scopes
    /// winning on key collision.
    fn collect_effective(&self, combined: &mut FxHashMap<Key, Arc<dyn Provider>>) {
        self.lock_state().providers.merge_into(combined);
        if let Parent::Scope(parent) = self.parent_link() {
            parent.collect_effective(combined);
        }
    }

    fn forget_child(&self, child: &Arc<ScopeInner>) {
        self.lock_state()
            .children
            .retain(|weak| weak.as_ptr() != Arc::as_ptr(child));
    }

    fn parent_link(&self) -> Parent {
        self.lock_parent().clone()
    }

    fn ensure_active(&self) -> Result<(), DiError> {
        if self.lock_state().disposed {
            return Err(DiError::ContainerDisposed);
        }
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, ScopeState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_parent(&self) -> MutexGuard<'_, Parent> {
        self.inner
            .parent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("level", &self.level())
            .field("tags", &self.inner.options.tags)
            .field("name", &self.inner.options.name)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Configures and builds a root scope.
pub struct ScopeBuilder {
    tags: FxHashSet<String>,
    name: Option<String>,
    injector: Arc<dyn Injector>,
    hook: Arc<dyn LifecycleHook>,
}

impl ScopeBuilder {
    fn new() -> Self {
        Self {
            tags: FxHashSet::default(),
            name: None,
            injector: Arc::new(NullInjector),
            hook: Arc::new(NoopLifecycle),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn injector(mut self, injector: Arc<dyn Injector>) -> Self {
        self.injector = injector;
        self
    }

    pub fn lifecycle(mut self, hook: Arc<dyn LifecycleHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn build(self) -> Scope {
        debug!(tags = ?self.tags, name = ?self.name, "creating root scope");
        Scope {
            inner: Arc::new(ScopeInner {
                options: ScopeOptions {
                    level: 0,
                    tags: self.tags,
                    name: self.name,
                },
                injector: self.injector,
                hook: self.hook,
                parent: Mutex::new(Parent::Empty(EmptyScope)),
                state: Mutex::new(ScopeState {
                    providers: ProviderRepository::new(),
                    children: Vec::new(),
                    tracked: Vec::new(),
                    seen: FxHashSet::default(),
                    disposed: false,
                }),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_starts_at_level_zero() {
        let root = Scope::root();
        assert_eq!(root.level(), 0);
        assert!(root.parent().is_none());
        assert!(!root.is_disposed());
    }

    #[test]
    fn children_step_the_level() {
        let root = Scope::root();
        let child = root.create_scope().unwrap();
        let grandchild = child.create_scope().unwrap();
        assert_eq!(child.level(), 1);
        assert_eq!(grandchild.level(), 2);
        assert!(grandchild.parent().is_some());
    }

    #[test]
    fn tags_are_not_inherited() {
        let root = Scope::builder().tag("root").build();
        let child = root.create_scope_tagged(["child"]).unwrap();
        assert!(child.tags().contains("child"));
        assert!(!child.tags().contains("root"));
    }

    #[test]
    fn empty_registration_key_is_rejected() {
        let root = Scope::root();
        let err = root
            .register("", crate::provider::value(1u32))
            .unwrap_err();
        assert!(matches!(err, DiError::MissingRegistrationKey));
    }
}
