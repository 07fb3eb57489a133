//! Checked downcasts from untyped values and keys.

use std::sync::Arc;

use crate::kind::Kind;
use crate::tree::Tree;
use crate::value::{RawList, RawMap, Value};
use crate::Key;

/// A type that can be recovered from an untyped [`Value`].
///
/// Casts are strict: an `Int` is not a `f64`, a raw `Map` is not a
/// [`Tree`]. Coercing containers into trees is
/// [`Outcome::into_tree`](crate::Outcome::into_tree)'s job.
pub trait FromValue: Sized + 'static {
    /// The kind reported as `expected` when the cast fails.
    const KIND: Kind;

    /// Returns the value back on mismatch so the caller can report its kind.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromValue for Value {
    const KIND: Kind = Kind::Any;

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for bool {
    const KIND: Kind = Kind::Boolean;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromValue for i64 {
    const KIND: Kind = Kind::Integer;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FromValue for f64 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    const KIND: Kind = Kind::String;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s.to_string()),
            other => Err(other),
        }
    }
}

impl FromValue for Arc<str> {
    const KIND: Kind = Kind::String;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for Tree {
    const KIND: Kind = Kind::Tree;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Tree(t) => Ok(t),
            other => Err(other),
        }
    }
}

impl FromValue for Arc<RawMap> {
    const KIND: Kind = Kind::Map;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Map(m) => Ok(m),
            other => Err(other),
        }
    }
}

impl FromValue for Arc<RawList> {
    const KIND: Kind = Kind::List;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(l) => Ok(l),
            other => Err(other),
        }
    }
}

/// Accepts the null marker as `None`, which lets homogeneous container casts
/// tolerate null elements.
impl<T: FromValue> FromValue for Option<T> {
    const KIND: Kind = T::KIND;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// A type that can be recovered from a mapping [`Key`].
pub trait FromKey: Sized + 'static {
    const KIND: Kind;

    fn from_key(key: Key) -> Result<Self, Key>;
}

/// The kind of a key when viewed as a value.
pub fn key_kind(key: &Key) -> Kind {
    match key {
        Key::Name(_) => Kind::String,
        Key::Index(_) => Kind::Integer,
        Key::Bool(_) => Kind::Boolean,
    }
}

impl FromKey for Key {
    const KIND: Kind = Kind::Any;

    fn from_key(key: Key) -> Result<Self, Key> {
        Ok(key)
    }
}

impl FromKey for String {
    const KIND: Kind = Kind::String;

    fn from_key(key: Key) -> Result<Self, Key> {
        match key {
            Key::Name(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromKey for i64 {
    const KIND: Kind = Kind::Integer;

    fn from_key(key: Key) -> Result<Self, Key> {
        match key {
            Key::Index(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FromKey for bool {
    const KIND: Kind = Kind::Boolean;

    fn from_key(key: Key) -> Result<Self, Key> {
        match key {
            Key::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_numeric_casts() {
        assert_eq!(i64::from_value(Value::Int(3)), Ok(3));
        assert!(f64::from_value(Value::Int(3)).is_err());
        assert!(i64::from_value(Value::Float(3.0)).is_err());
    }

    #[test]
    fn test_option_cast() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::from("a")),
            Ok(Some("a".to_string()))
        );
        assert_eq!(
            Option::<String>::from_value(Value::from(1)),
            Err(Value::from(1))
        );
    }

    #[test]
    fn test_tree_cast_does_not_coerce() {
        let raw = Value::map([("a", 1)]);
        assert!(Tree::from_value(raw).is_err());
        assert!(Tree::from_value(Value::Tree(Tree::empty_list())).is_ok());
    }

    #[test]
    fn test_key_casts() {
        assert_eq!(String::from_key(Key::from("a")), Ok("a".to_string()));
        assert_eq!(String::from_key(Key::from(1)), Err(Key::Index(1)));
        assert_eq!(key_kind(&Key::from(true)), Kind::Boolean);
    }
}
