use std::fmt;

use crate::cast::{key_kind, FromKey, FromValue};
use crate::outcome::Outcome;
use crate::value::Value;
use crate::Key;

/// An immutable key/value pair yielded when iterating a [`Tree`](crate::Tree).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    key: Key,
    value: Value,
}

impl Entry {
    pub fn new(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Entry {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (Key, Value) {
        (self.key, self.value)
    }

    pub fn key_as<K: FromKey>(&self) -> Outcome<K> {
        match K::from_key(self.key.clone()) {
            Ok(k) => Outcome::present(k),
            Err(bad) => Outcome::wrong_type(key_kind(&bad), K::KIND),
        }
    }

    pub fn value_as<V: FromValue>(&self) -> Outcome<V> {
        Outcome::of(self.value.clone()).cast()
    }

    /// A copy of this entry with the value replaced by `f(value)`.
    pub fn with_value(&self, f: impl FnOnce(&Value) -> Value) -> Entry {
        Entry {
            key: self.key.clone(),
            value: f(&self.value),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.value)
    }
}

impl From<(Key, Value)> for Entry {
    fn from((key, value): (Key, Value)) -> Self {
        Entry { key, value }
    }
}
