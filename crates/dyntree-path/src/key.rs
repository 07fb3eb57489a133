//! Path segments.

use std::fmt;

/// A single step in a [`Path`](crate::Path).
///
/// Keys double as mapping keys, so they are limited to scalars that can be
/// compared and hashed: names (object keys), integer indices and booleans.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Name(String),
    Index(i64),
    Bool(bool),
}

impl Key {
    /// Returns the index if this key addresses a sequence element.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }

    /// Returns the index as a `usize` when it lies in `0..len`.
    pub fn index_within(&self, len: usize) -> Option<usize> {
        let i = usize::try_from(self.as_index()?).ok()?;
        (i < len).then_some(i)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(s) => f.write_str(s),
            Key::Index(i) => write!(f, "{i}"),
            Key::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Name(s.clone())
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i64::from(i))
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}
