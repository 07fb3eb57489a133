//! The untyped element stored inside trees.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::kind::Kind;
use crate::tree::Tree;
use crate::Key;

/// Backing container of a mapping, raw or wrapped.
pub type RawMap = IndexMap<Key, Value>;

/// Backing container of a sequence, raw or wrapped.
pub type RawList = Vec<Value>;

/// An untyped value: a scalar, the null marker, a raw container, or an
/// already-wrapped [`Tree`].
///
/// Containers are reference counted. Cloning a value never copies a
/// container, and nothing hands out mutable access to one once it is
/// wrapped, so clones can be shared freely.
///
/// Floats compare and hash by bit pattern, which makes `Value` usable as
/// an [`Eq`]/[`Hash`] key (`NaN == NaN`, `0.0 != -0.0`). Mapping equality
/// ignores insertion order, and a raw container equals a tree holding the
/// same elements.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    Map(Arc<RawMap>),
    List(Arc<RawList>),
    Tree(Tree),
}

impl Value {
    /// Builds a raw mapping from key/value pairs.
    pub fn map<I, K, V>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Map(Arc::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Builds a raw sequence from elements.
    pub fn list<I, V>(elements: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(Arc::new(elements.into_iter().map(Into::into).collect()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Int(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Map(_) => Kind::Map,
            Value::List(_) => Kind::List,
            Value::Tree(_) => Kind::Tree,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Value::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// The backing mapping, raw or wrapped.
    fn as_mapping(&self) -> Option<&Arc<RawMap>> {
        match self {
            Value::Map(m) | Value::Tree(Tree::Mapping(m)) => Some(m),
            _ => None,
        }
    }

    /// The backing sequence, raw or wrapped.
    fn as_sequence(&self) -> Option<&Arc<RawList>> {
        match self {
            Value::List(l) | Value::Tree(Tree::Sequence(l)) => Some(l),
            _ => None,
        }
    }

    /// Reference identity for containers, plain equality for scalars.
    /// A raw container and the tree wrapping it are identical.
    ///
    /// Used to check that an edit left a subtree shared rather than copied.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Arc::ptr_eq(a, b),
            (a, b) => match (a.as_mapping(), b.as_mapping(), a.as_sequence(), b.as_sequence()) {
                (Some(a), Some(b), _, _) => Arc::ptr_eq(a, b),
                (_, _, Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None, None, None) => a == b,
                _ => false,
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (a, b) => match (a.as_mapping(), b.as_mapping(), a.as_sequence(), b.as_sequence()) {
                (Some(a), Some(b), _, _) => Arc::ptr_eq(a, b) || a == b,
                (_, _, Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // raw and wrapped containers hash alike, matching `eq`
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                3u8.hash(state);
                f.to_bits().hash(state);
            }
            Value::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Value::Map(m) | Value::Tree(Tree::Mapping(m)) => {
                5u8.hash(state);
                hash_map(m, state);
            }
            Value::List(l) | Value::Tree(Tree::Sequence(l)) => {
                6u8.hash(state);
                l.hash(state);
            }
        }
    }
}

/// Order-insensitive hash of a mapping, consistent with `IndexMap` equality.
pub(crate) fn hash_map<H: Hasher>(map: &RawMap, state: &mut H) {
    let mut acc: u64 = 0;
    for (k, v) in map {
        let mut h = DefaultHasher::new();
        k.hash(&mut h);
        v.hash(&mut h);
        acc = acc.wrapping_add(h.finish());
    }
    map.len().hash(state);
    acc.hash(state);
}

pub(crate) fn fmt_map(map: &RawMap, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("{")?;
    for (i, (k, v)) in map.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{k}: {v}")?;
    }
    f.write_str("}")
}

pub(crate) fn fmt_list(list: &[Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in list.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => f.write_str(s),
            Value::Map(m) => fmt_map(m, f),
            Value::List(l) => fmt_list(l, f),
            Value::Tree(t) => write!(f, "{t}"),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Tree> for Value {
    fn from(t: Tree) -> Self {
        Value::Tree(t)
    }
}

impl From<RawMap> for Value {
    fn from(m: RawMap) -> Self {
        Value::Map(Arc::new(m))
    }
}

impl From<RawList> for Value {
    fn from(l: RawList) -> Self {
        Value::List(Arc::new(l))
    }
}

impl From<Key> for Value {
    fn from(k: Key) -> Self {
        match k {
            Key::Name(s) => Value::from(s),
            Key::Index(i) => Value::Int(i),
            Key::Bool(b) => Value::Bool(b),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        o.map_or(Value::Null, Into::into)
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Value::list(iter)
    }
}
