//! Persistent mapping/sequence nodes.
//!
//! A [`Tree`] stands in for an untyped map or list. Every edit returns a new
//! tree and leaves the receiver alone: the top-level container is copied,
//! while every element it holds (including nested containers) is shared by
//! reference.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::RangeFrom;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use tracing::trace;

use crate::cast::{FromKey, FromValue};
use crate::cursor::Cursor;
use crate::entry::Entry;
use crate::outcome::Outcome;
use crate::value::{fmt_list, fmt_map, hash_map, RawList, RawMap, Value};
use crate::{Key, Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    /// Unique keys to untyped elements.
    Mapping(Arc<RawMap>),
    /// Zero-indexed untyped elements.
    Sequence(Arc<RawList>),
}

impl Tree {
    /// The shared empty mapping.
    pub fn empty_map() -> Tree {
        static EMPTY_MAP: OnceLock<Tree> = OnceLock::new();
        EMPTY_MAP
            .get_or_init(|| Tree::Mapping(Arc::default()))
            .clone()
    }

    /// The shared empty sequence.
    pub fn empty_list() -> Tree {
        static EMPTY_LIST: OnceLock<Tree> = OnceLock::new();
        EMPTY_LIST
            .get_or_init(|| Tree::Sequence(Arc::default()))
            .clone()
    }

    /// Wraps a raw mapping as-is.
    ///
    /// This is shallow: nested raw containers stay raw and keep being shared
    /// with whoever else holds them.
    pub fn of_map(map: RawMap) -> Tree {
        Tree::Mapping(Arc::new(map))
    }

    /// Wraps a raw sequence after a deep copy.
    ///
    /// Every nested raw mapping or sequence is rebuilt into a fresh
    /// container (still raw, not a `Tree`); scalars and trees are shared.
    /// Note that [`Tree::of_map`] does not do this.
    pub fn of_list(list: &[Value]) -> Tree {
        Tree::Sequence(Arc::new(list.iter().map(deep_copy).collect()))
    }

    /// A mapping built from key/value pairs.
    ///
    /// ```
    /// use dyntree::{Tree, Value};
    ///
    /// let t = Tree::map_of([("x", 1), ("y", 2)]);
    /// assert_eq!(t.len(), 2);
    /// assert_eq!(t.get("y").ok(), Some(Value::from(2)));
    /// ```
    pub fn map_of<I, K, V>(pairs: I) -> Tree
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Tree::of_map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// A sequence built from elements, without copying them.
    pub fn list_of<I, V>(elements: I) -> Tree
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Tree::Sequence(Arc::new(elements.into_iter().map(Into::into).collect()))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Tree::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Tree::Sequence(_))
    }

    /// Reference identity of the backing container.
    pub fn ptr_eq(&self, other: &Tree) -> bool {
        match (self, other) {
            (Tree::Mapping(a), Tree::Mapping(b)) => Arc::ptr_eq(a, b),
            (Tree::Sequence(a), Tree::Sequence(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Single-segment lookup. A sequence asked for a non-index key reports
    /// `Missing`.
    pub fn get(&self, key: impl Into<Key>) -> Outcome<Value> {
        let key = key.into();
        match self {
            Tree::Mapping(map) => Outcome::lookup_in_mapping(map, key),
            Tree::Sequence(list) => match key.as_index() {
                Some(index) => Outcome::lookup_in_sequence(list, index),
                None => Outcome::missing().with_path(Path::from(key)),
            },
        }
    }

    /// Multi-segment lookup, coercing each intermediate value into a tree.
    ///
    /// ```
    /// use dyntree::{path, Tree, Value};
    ///
    /// let t = Tree::map_of([("a", Value::list(["x", "y"]))]);
    /// assert_eq!(t.get_in(path!["a", 1]).cast::<String>().ok(), Some("y".to_string()));
    /// assert_eq!(t.get_in(path!["a", 5]).to_string(), "Missing at a[5]");
    /// ```
    pub fn get_in(&self, path: impl Into<Path>) -> Outcome<Value> {
        self.at(path).get()
    }

    pub fn len(&self) -> usize {
        match self {
            Tree::Mapping(map) => map.len(),
            Tree::Sequence(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        match self {
            Tree::Mapping(map) => map.contains_key(&key),
            Tree::Sequence(list) => key.index_within(list.len()).is_some(),
        }
    }

    /// Mapping keys, or for a sequence the unbounded run `0, 1, 2, …`.
    ///
    /// The sequence variant never ends; bound it by [`len`](Self::len).
    pub fn keys(&self) -> Keys<'_> {
        let inner = match self {
            Tree::Mapping(map) => KeysInner::Mapping(map.keys()),
            Tree::Sequence(_) => KeysInner::Sequence(0..),
        };
        Keys { inner }
    }

    /// Entries in storage order; sequence entries are keyed by index.
    pub fn iter(&self) -> Iter<'_> {
        let inner = match self {
            Tree::Mapping(map) => IterInner::Mapping(map.iter()),
            Tree::Sequence(list) => IterInner::Sequence(list.iter().enumerate()),
        };
        Iter { inner }
    }

    pub fn as_map_of<K, V>(&self) -> Outcome<IndexMap<K, V>>
    where
        K: FromKey + Eq + Hash,
        V: FromValue,
    {
        Outcome::present(Value::Tree(self.clone())).as_map_of()
    }

    pub fn as_list_of<E: FromValue>(&self) -> Outcome<Vec<E>> {
        Outcome::present(Value::Tree(self.clone())).as_list_of()
    }

    // ── Edits ─────────────────────────────────────────────────────────────

    /// Mapping: insert or replace. Sequence: replace an in-range index,
    /// otherwise return the tree unchanged.
    pub fn put(&self, key: impl Into<Key>, value: impl Into<Value>) -> Tree {
        let key = key.into();
        match self {
            Tree::Mapping(map) => {
                let mut next = RawMap::clone(map);
                next.insert(key, value.into());
                Tree::Mapping(Arc::new(next))
            }
            Tree::Sequence(list) => match key.index_within(list.len()) {
                Some(i) => {
                    let mut next = RawList::clone(list);
                    next[i] = value.into();
                    Tree::Sequence(Arc::new(next))
                }
                None => {
                    trace!(%key, len = list.len(), "put outside sequence bounds ignored");
                    self.clone()
                }
            },
        }
    }

    /// Mapping: delete the key if present. Sequence: delete an in-range
    /// index, shifting later elements down.
    pub fn remove(&self, key: impl Into<Key>) -> Tree {
        let key = key.into();
        match self {
            Tree::Mapping(map) => {
                if !map.contains_key(&key) {
                    return self.clone();
                }
                let mut next = RawMap::clone(map);
                next.shift_remove(&key);
                Tree::Mapping(Arc::new(next))
            }
            Tree::Sequence(list) => match key.index_within(list.len()) {
                Some(i) => {
                    let mut next = RawList::clone(list);
                    next.remove(i);
                    Tree::Sequence(Arc::new(next))
                }
                None => {
                    trace!(%key, len = list.len(), "remove outside sequence bounds ignored");
                    self.clone()
                }
            },
        }
    }

    /// Appends to a sequence. No-op on a mapping.
    pub fn add(&self, value: impl Into<Value>) -> Tree {
        match self {
            Tree::Mapping(_) => {
                trace!("add on a mapping ignored");
                self.clone()
            }
            Tree::Sequence(list) => {
                let mut next = RawList::with_capacity(list.len() + 1);
                next.extend(list.iter().cloned());
                next.push(value.into());
                Tree::Sequence(Arc::new(next))
            }
        }
    }

    /// Inserts into a sequence at `0..=len`. No-op otherwise and on a
    /// mapping.
    pub fn insert(&self, index: i64, value: impl Into<Value>) -> Tree {
        match self {
            Tree::Mapping(_) => {
                trace!(index = index, "insert on a mapping ignored");
                self.clone()
            }
            Tree::Sequence(list) => match Key::Index(index).index_within(list.len() + 1) {
                Some(i) => {
                    let mut next = RawList::clone(list);
                    next.insert(i, value.into());
                    Tree::Sequence(Arc::new(next))
                }
                None => {
                    trace!(index = index, len = list.len(), "insert outside sequence bounds ignored");
                    self.clone()
                }
            },
        }
    }

    // ── Cursors ───────────────────────────────────────────────────────────

    /// A cursor positioned on this tree itself.
    pub fn focus(&self) -> Cursor {
        Cursor::root(self.clone())
    }

    /// A cursor positioned at `path` below this tree.
    ///
    /// ```
    /// use dyntree::{path, Tree, Value};
    ///
    /// let root = Tree::map_of([("a", Tree::map_of([("b", 1)]))]);
    /// let edited = root.at("a").put("c", 2).commit_or_original();
    ///
    /// assert_eq!(edited.get_in(path!["a", "c"]).ok(), Some(Value::from(2)));
    /// assert!(root.get_in(path!["a", "c"]).is_missing());
    /// ```
    pub fn at(&self, path: impl Into<Path>) -> Cursor {
        self.focus().at(path)
    }
}

/// Recursive copy of nested raw containers.
fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(Arc::new(
            map.iter()
                .map(|(k, v)| (k.clone(), deep_copy(v)))
                .collect(),
        )),
        Value::List(list) => Value::List(Arc::new(list.iter().map(deep_copy).collect())),
        other => other.clone(),
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::empty_map()
    }
}

impl Hash for Tree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Tree::Mapping(map) => hash_map(map, state),
            Tree::Sequence(list) => list.hash(state),
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Mapping(map) => fmt_map(map, f),
            Tree::Sequence(list) => fmt_list(list, f),
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Tree::keys`].
pub struct Keys<'a> {
    inner: KeysInner<'a>,
}

enum KeysInner<'a> {
    Mapping(indexmap::map::Keys<'a, Key, Value>),
    Sequence(RangeFrom<i64>),
}

impl Iterator for Keys<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        match &mut self.inner {
            KeysInner::Mapping(keys) => keys.next().cloned(),
            KeysInner::Sequence(range) => range.next().map(Key::Index),
        }
    }
}

/// Iterator returned by [`Tree::iter`].
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Mapping(indexmap::map::Iter<'a, Key, Value>),
    Sequence(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
}

impl Iterator for Iter<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        match &mut self.inner {
            IterInner::Mapping(it) => it.next().map(|(k, v)| Entry::new(k.clone(), v.clone())),
            IterInner::Sequence(it) => it.next().map(|(i, v)| Entry::new(i, v.clone())),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Mapping(it) => it.size_hint(),
            IterInner::Sequence(it) => it.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;
    use crate::path;

    #[test]
    fn test_empty_singletons_share_allocation() {
        assert!(Tree::empty_map().ptr_eq(&Tree::empty_map()));
        assert!(Tree::empty_list().ptr_eq(&Tree::empty_list()));
        assert!(Tree::empty_map().is_empty());
        assert!(Tree::empty_list().is_sequence());
    }

    #[test]
    fn test_list_of_remove() {
        let t = Tree::list_of(["a", "b", "c"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.remove(1), Tree::list_of(["a", "c"]));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_map_of_put_get() {
        let t = Tree::map_of([("x", 1)]).put("y", 2);
        assert_eq!(
            t.get("y"),
            Outcome::Value {
                path: path!["y"],
                value: Value::from(2)
            }
        );
        assert_eq!(t.get("z"), Outcome::Missing { path: path!["z"] });
    }

    #[test]
    fn test_put_leaves_receiver_untouched() {
        let t = Tree::map_of([("x", 1)]);
        let u = t.put("x", 9);
        assert_eq!(t.get("x").ok(), Some(Value::from(1)));
        assert_eq!(u.get("x").ok(), Some(Value::from(9)));
    }

    #[test]
    fn test_sequence_ignores_out_of_domain_keys() {
        let t = Tree::list_of([1, 2]);
        assert!(t.put(5, 0).ptr_eq(&t));
        assert!(t.put("a", 0).ptr_eq(&t));
        assert!(t.remove(-1).ptr_eq(&t));
        assert!(t.remove("a").ptr_eq(&t));
        assert_eq!(t.get("a"), Outcome::Missing { path: path!["a"] });
    }

    #[test]
    fn test_mapping_ignores_sequence_ops() {
        let t = Tree::map_of([("a", 1)]);
        assert!(t.add(2).ptr_eq(&t));
        assert!(t.insert(0, 2).ptr_eq(&t));
    }

    #[test]
    fn test_insert_bounds() {
        let t = Tree::list_of(["a", "c"]);
        assert_eq!(t.insert(1, "b"), Tree::list_of(["a", "b", "c"]));
        assert_eq!(t.insert(2, "d"), Tree::list_of(["a", "c", "d"]));
        assert!(t.insert(3, "x").ptr_eq(&t));
        assert!(t.insert(-1, "x").ptr_eq(&t));
    }

    #[test]
    fn test_add() {
        let t = Tree::empty_list().add(1).add(2);
        assert_eq!(t, Tree::list_of([1, 2]));
        assert!(Tree::empty_list().is_empty());
    }

    #[test]
    fn test_null_element_reads_as_null() {
        let t = Tree::list_of([Value::Null]);
        assert_eq!(t.get(0), Outcome::Null { path: path![0] });
    }

    #[test]
    fn test_keys() {
        let t = Tree::map_of([("a", 1), ("b", 2)]);
        let keys: Vec<Key> = t.keys().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);

        let s = Tree::list_of(["x"]);
        let keys: Vec<Key> = s.keys().take(4).collect();
        assert_eq!(keys, vec![Key::from(0), Key::from(1), Key::from(2), Key::from(3)]);
    }

    #[test]
    fn test_iter_entries() {
        let s = Tree::list_of(["x", "y"]);
        let entries: Vec<Entry> = s.iter().collect();
        assert_eq!(
            entries,
            vec![Entry::new(0, "x"), Entry::new(1, "y")]
        );

        let m = Tree::map_of([("k", 1)]);
        let entries: Vec<Entry> = (&m).into_iter().collect();
        assert_eq!(entries, vec![Entry::new("k", 1)]);
    }

    #[test]
    fn test_of_map_is_shallow() {
        let nested = Value::list([1, 2]);
        let mut raw = RawMap::new();
        raw.insert(Key::from("n"), nested.clone());
        let t = Tree::of_map(raw);

        let read = t.get("n").ok().unwrap();
        assert!(read.ptr_eq(&nested));
        assert_eq!(read.kind(), Kind::List);
    }

    #[test]
    fn test_of_list_deep_copies_nested_containers() {
        let nested = Value::map([("k", Value::list([1]))]);
        let t = Tree::of_list(&[nested.clone(), Value::from("s")]);

        let read = t.get(0).ok().unwrap();
        assert_eq!(read, nested);
        assert!(!read.ptr_eq(&nested));
        // normalized into raw containers, not into trees
        assert_eq!(read.kind(), Kind::Map);
    }

    #[test]
    fn test_as_list_of_and_map_of() {
        let s = Tree::list_of(["a", "b"]);
        assert_eq!(
            s.as_list_of::<String>().ok(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            s.as_map_of::<String, String>(),
            Outcome::wrong_type(Kind::Tree, Kind::Map)
        );

        let m = Tree::map_of([("a", true)]);
        assert_eq!(m.as_map_of::<String, bool>().ok().unwrap().len(), 1);
        assert!(m.as_list_of::<bool>().is_wrong_type());
    }

    #[test]
    fn test_display() {
        let t = Tree::map_of([("a", Value::from(1)), ("b", Value::list(["x", "y"]))]);
        assert_eq!(t.to_string(), "{a: 1, b: [x, y]}");
        assert_eq!(Tree::list_of([1, 2]).to_string(), "[1, 2]");
    }
}
