//! Lifecycle hook seam.
//!
//! A scope notifies its hook when an instance first becomes reachable
//! through it and again for every tracked instance during teardown. The
//! scope owns the per-instance tracking; the hook only observes.

use std::sync::Arc;

use crate::provider::Instance;

/// Callbacks invoked around instance construction and disposal.
pub trait LifecycleHook: Send + Sync {
    /// Called exactly once per distinct instance, when it first becomes
    /// reachable through the notifying scope.
    fn on_construct(&self, instance: &Instance) {
        let _ = instance;
    }

    /// Called for every tracked instance while the owning scope is disposed.
    fn on_dispose(&self, instance: &Instance) {
        let _ = instance;
    }

    /// Hook state for a child scope. Child scopes must not share the
    /// parent's tracked-instance view, so each child gets its own hook.
    fn fork(&self) -> Arc<dyn LifecycleHook>;
}

/// Default hook: observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLifecycle;

impl LifecycleHook for NoopLifecycle {
    fn fork(&self) -> Arc<dyn LifecycleHook> {
        Arc::new(NoopLifecycle)
    }
}
