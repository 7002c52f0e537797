//! Error taxonomy for scope and provider resolution.
//!
//! Every failure is surfaced synchronously to the caller; the core never
//! retries, substitutes fallbacks, or swallows an error.

use crate::di::Key;

/// Errors raised by registration, resolution, and disposal.
#[derive(Debug, thiserror::Error)]
pub enum DiError {
    /// The key could not be resolved anywhere in the scope chain.
    #[error("provider not found for key '{0}'")]
    ProviderNotFound(Key),

    /// An operation other than disposal was attempted on a disposed scope.
    #[error("container is disposed")]
    ContainerDisposed,

    /// A level-ranged provider was resolved outside its declared range.
    #[error("provider level mismatch: scope level {level} outside [{min}, {max}]")]
    MismatchedLevel { level: u32, min: u32, max: u32 },

    /// A tagged provider was resolved in a scope sharing none of its tags.
    #[error("provider tag mismatch: scope tags {scope_tags:?} share nothing with {provider_tags:?}")]
    MismatchedTag {
        provider_tags: Vec<String>,
        scope_tags: Vec<String>,
    },

    /// A named provider was resolved against a scope with a different name.
    #[error("provider name mismatch: requires scope '{expected}', resolving scope is {actual:?}")]
    MismatchedName {
        expected: String,
        actual: Option<String>,
    },

    /// The empty-scope sentinel cannot perform this operation by definition.
    #[error("method '{0}' not implemented on the empty scope")]
    MethodNotImplemented(&'static str),

    /// Registration was attempted without a usable key.
    #[error("no registration key provided")]
    MissingRegistrationKey,

    /// Registration under a no-override policy collided with an existing key.
    #[error("provider key '{0}' is already registered")]
    KeyBusy(Key),

    /// A resolved instance failed to downcast to the requested type.
    #[error("instance resolved for '{key}' is not a `{expected}`")]
    TypeMismatch {
        key: Key,
        expected: &'static str,
    },
}
