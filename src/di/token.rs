//! Registration keys and type-safe tokens.
//!
//! A [`Key`] is the opaque identifier a provider is registered under: either
//! a name (string) or a type identity. A [`Token`] is typed sugar over a
//! named key, carrying a phantom result type so resolution can downcast
//! without the caller spelling the type out at every call site.

use std::any::TypeId;
use std::borrow::Cow;
use std::marker::PhantomData;

/// Identifier a provider is registered under within one repository.
#[derive(Clone, Debug)]
pub enum Key {
    /// A plain string name.
    Name(Cow<'static, str>),
    /// A type used as its own key. The name is kept for diagnostics only.
    Type {
        id: TypeId,
        name: &'static str,
    },
}

impl Key {
    /// Key for a type used as its own registration key.
    pub fn of<T: 'static>() -> Self {
        Key::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// True for `Key::Name("")`, which is rejected at registration time.
    pub fn is_empty(&self) -> bool {
        matches!(self, Key::Name(name) if name.is_empty())
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Name(a), Key::Name(b)) => a == b,
            (Key::Type { id: a, .. }, Key::Type { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Name(name) => {
                state.write_u8(0);
                name.hash(state);
            }
            Key::Type { id, .. } => {
                state.write_u8(1);
                id.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{name}"),
            Key::Type { name, .. } => write!(f, "{name}"),
        }
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Cow::Owned(name))
    }
}

impl<T: ?Sized> From<Token<T>> for Key {
    fn from(token: Token<T>) -> Self {
        Key::Name(Cow::Borrowed(token.name()))
    }
}

/// A type-safe token identifying a provider registration.
///
/// The token carries a string name plus a phantom type parameter, so
/// `scope.resolve_token(LOGGER)` downcasts to the right type without a
/// turbofish at the call site.
///
/// ```rust,ignore
/// pub const LOGGER: Token<Logger> = Token::new("logger");
/// ```
pub struct Token<T: ?Sized> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Token<T> {
    /// Creates a new token. Const, so tokens can be module-level constants.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    /// The string name of this token.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The registration key this token maps to.
    pub fn key(&self) -> Key {
        Key::Name(Cow::Borrowed(self.name))
    }
}

// Manual impls: PhantomData<fn() -> T> is always Copy/Eq/Hash regardless of T.
impl<T: ?Sized> Clone for Token<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Token<T> {}

impl<T: ?Sized> std::fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token").field("name", &self.name).finish()
    }
}

impl<T: ?Sized> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T: ?Sized> Eq for Token<T> {}

impl<T: ?Sized> std::hash::Hash for Token<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Logger;

    #[test]
    fn name_keys_compare_by_string() {
        let a: Key = "logger".into();
        let b: Key = String::from("logger").into();
        assert_eq!(a, b);
    }

    #[test]
    fn type_keys_compare_by_type_identity() {
        assert_eq!(Key::of::<Logger>(), Key::of::<Logger>());
        assert_ne!(Key::of::<Logger>(), Key::of::<String>());
        assert_ne!(Key::of::<Logger>(), Key::from("Logger"));
    }

    #[test]
    fn empty_name_is_detected() {
        assert!(Key::from("").is_empty());
        assert!(!Key::from("x").is_empty());
        assert!(!Key::of::<Logger>().is_empty());
    }

    #[test]
    fn token_maps_to_named_key() {
        const LOGGER: Token<Logger> = Token::new("logger");
        assert_eq!(LOGGER.key(), Key::from("logger"));
        assert_eq!(LOGGER.name(), "logger");
    }

    #[test]
    fn key_display_uses_name() {
        assert_eq!(Key::from("db").to_string(), "db");
        assert!(Key::of::<Logger>().to_string().ends_with("Logger"));
    }
}
