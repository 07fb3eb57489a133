//! The four-way result of every lookup and cast.
//!
//! A lookup in an untyped tree can fail in three distinct ways: the key is
//! absent, the key holds an explicit null, or the value has the wrong shape
//! for what the caller asked for. [`Outcome`] keeps those apart and carries
//! the [`Path`] at which the result was obtained, so a chain of
//! navigate → cast → transform short-circuits on the first failure and still
//! says where it happened.

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::cast::{key_kind, FromKey, FromValue};
use crate::error::{at_path, NoResultError};
use crate::kind::Kind;
use crate::tree::Tree;
use crate::value::{RawMap, Value};
use crate::{Key, Path};

/// Possibly a value of the expected type, otherwise a description of why not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    /// A retrieved, non-null value.
    Value { path: Path, value: T },
    /// The location exists and holds the null marker.
    Null { path: Path },
    /// The location does not exist.
    Missing { path: Path },
    /// The location holds a value of a different shape than requested.
    WrongType {
        path: Path,
        found: Kind,
        expected: Kind,
    },
}

/// Builds a `Value` outcome unless the payload is the untyped null marker,
/// which becomes `Null`. A `Value` payload is never `Value::Null`.
fn settle<T: 'static>(path: Path, value: T) -> Outcome<T> {
    let is_null = (&value as &dyn Any)
        .downcast_ref::<Value>()
        .is_some_and(Value::is_null);
    if is_null {
        Outcome::Null { path }
    } else {
        Outcome::Value { path, value }
    }
}

impl<T> Outcome<T> {
    /// A value at the empty path. The null marker yields `Null`.
    pub fn present(value: T) -> Self
    where
        T: 'static,
    {
        settle(Path::root(), value)
    }

    /// `Null` for `None`, otherwise as [`present`](Self::present).
    pub fn from_nullable(value: Option<T>) -> Self
    where
        T: 'static,
    {
        match value {
            Some(value) => Self::present(value),
            None => Self::null(),
        }
    }

    pub fn null() -> Self {
        Outcome::Null { path: Path::root() }
    }

    pub fn missing() -> Self {
        Outcome::Missing { path: Path::root() }
    }

    pub fn wrong_type(found: Kind, expected: Kind) -> Self {
        Outcome::WrongType {
            path: Path::root(),
            found,
            expected,
        }
    }

    /// Exhaustive dispatch over the four variants.
    ///
    /// ```
    /// use dyntree::{Outcome, Value};
    ///
    /// let described = Outcome::of(Value::from(3)).fold(
    ///     |_, v| format!("got {v}"),
    ///     |_| "null".to_string(),
    ///     |p| format!("nothing at {p}"),
    ///     |_, found, expected| format!("{found} is not {expected}"),
    /// );
    /// assert_eq!(described, "got 3");
    /// ```
    pub fn fold<B>(
        self,
        on_value: impl FnOnce(Path, T) -> B,
        on_null: impl FnOnce(Path) -> B,
        on_missing: impl FnOnce(Path) -> B,
        on_wrong_type: impl FnOnce(Path, Kind, Kind) -> B,
    ) -> B {
        match self {
            Outcome::Value { path, value } => on_value(path, value),
            Outcome::Null { path } => on_null(path),
            Outcome::Missing { path } => on_missing(path),
            Outcome::WrongType {
                path,
                found,
                expected,
            } => on_wrong_type(path, found, expected),
        }
    }

    /// Splits off the payload, or re-types a failure for a different payload.
    fn into_value<U>(self) -> Result<(Path, T), Outcome<U>> {
        self.fold(
            |path, value| Ok((path, value)),
            |path| Err(Outcome::Null { path }),
            |path| Err(Outcome::Missing { path }),
            |path, found, expected| {
                Err(Outcome::WrongType {
                    path,
                    found,
                    expected,
                })
            },
        )
    }

    pub fn path(&self) -> &Path {
        match self {
            Outcome::Value { path, .. }
            | Outcome::Null { path }
            | Outcome::Missing { path }
            | Outcome::WrongType { path, .. } => path,
        }
    }

    /// Same variant, different path.
    pub fn with_path(self, path: Path) -> Self {
        match self {
            Outcome::Value { value, .. } => Outcome::Value { path, value },
            Outcome::Null { .. } => Outcome::Null { path },
            Outcome::Missing { .. } => Outcome::Missing { path },
            Outcome::WrongType {
                found, expected, ..
            } => Outcome::WrongType {
                path,
                found,
                expected,
            },
        }
    }

    /// Transforms the payload. A function returning the null marker yields
    /// `Null` at the same path.
    pub fn map<U: 'static>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self.into_value() {
            Ok((path, value)) => settle(path, f(value)),
            Err(failure) => failure,
        }
    }

    /// Chains another fallible step. The chained result is re-stamped with
    /// this outcome's path.
    pub fn flat_map<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self.into_value() {
            Ok((path, value)) => f(value).with_path(path),
            Err(failure) => failure,
        }
    }

    /// Like [`flat_map`](Self::flat_map) but keeps the chained result's own
    /// path.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self.into_value() {
            Ok((_, value)) => f(value),
            Err(failure) => failure,
        }
    }

    pub fn or_else(self, f: impl FnOnce() -> Outcome<T>) -> Outcome<T> {
        if self.is_value() {
            self
        } else {
            f()
        }
    }

    pub fn get_or_else(self, f: impl FnOnce() -> T) -> T {
        self.map_or_else(|value| value, f)
    }

    pub fn map_or_else<B>(self, on_value: impl FnOnce(T) -> B, on_fail: impl FnOnce() -> B) -> B {
        match self.into_value::<T>() {
            Ok((_, value)) => on_value(value),
            Err(_) => on_fail(),
        }
    }

    pub fn ok(self) -> Option<T> {
        self.map_or_else(Some, || None)
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Value { path, value } => Outcome::Value {
                path: path.clone(),
                value,
            },
            Outcome::Null { path } => Outcome::Null { path: path.clone() },
            Outcome::Missing { path } => Outcome::Missing { path: path.clone() },
            Outcome::WrongType {
                path,
                found,
                expected,
            } => Outcome::WrongType {
                path: path.clone(),
                found: *found,
                expected: *expected,
            },
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value { .. })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Outcome::Null { .. })
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Outcome::Missing { .. })
    }

    pub fn is_wrong_type(&self) -> bool {
        matches!(self, Outcome::WrongType { .. })
    }

    /// The payload, `None` for an explicit null.
    ///
    /// # Errors
    ///
    /// [`NoResultError`] for `Missing` and `WrongType`, carrying the path.
    pub fn try_unwrap(self) -> Result<Option<T>, NoResultError> {
        self.fold(
            |_, value| Ok(Some(value)),
            |_| Ok(None),
            |path| Err(NoResultError::Missing { path }),
            |path, found, expected| {
                Err(NoResultError::WrongType {
                    path,
                    found,
                    expected,
                })
            },
        )
    }

    /// The payload, `None` for an explicit null.
    ///
    /// # Panics
    ///
    /// Panics for `Missing` and `WrongType` with a message naming the path.
    /// Use [`try_unwrap`](Self::try_unwrap) to get the error instead.
    #[track_caller]
    pub fn unwrap(self) -> Option<T> {
        match self.try_unwrap() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// All values, or the first failure in order.
    ///
    /// ```
    /// use dyntree::Outcome;
    ///
    /// let all = Outcome::sequence(vec![Outcome::present(1), Outcome::present(2)]);
    /// assert_eq!(all, Outcome::present(vec![1, 2]));
    ///
    /// let first_failure = Outcome::sequence(vec![Outcome::present(1), Outcome::missing()]);
    /// assert!(first_failure.is_missing());
    /// ```
    pub fn sequence<I>(outcomes: I) -> Outcome<Vec<T>>
    where
        I: IntoIterator<Item = Outcome<T>>,
    {
        let iter = outcomes.into_iter();
        let mut values = Vec::with_capacity(iter.size_hint().0);
        for outcome in iter {
            match outcome.into_value() {
                Ok((_, value)) => values.push(value),
                Err(failure) => return failure,
            }
        }
        Outcome::Value {
            path: Path::root(),
            value: values,
        }
    }
}

impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        Outcome::sequence(iter)
    }
}

// ── Untyped payloads ──────────────────────────────────────────────────────

impl Outcome<Value> {
    /// Wraps an untyped value, routing the null marker to `Null`.
    pub fn of(value: Value) -> Self {
        settle(Path::root(), value)
    }

    /// Looks `key` up in a mapping; the result path is `[key]`.
    pub fn lookup_in_mapping(map: &RawMap, key: Key) -> Self {
        let found = match map.get(&key) {
            Some(value) => Outcome::of(value.clone()),
            None => Outcome::missing(),
        };
        found.with_path(Path::from(key))
    }

    /// Looks `index` up in a sequence; the result path is `[index]`.
    pub fn lookup_in_sequence(list: &[Value], index: i64) -> Self {
        let key = Key::Index(index);
        let found = match key.index_within(list.len()) {
            Some(i) => Outcome::of(list[i].clone()),
            None => Outcome::missing(),
        };
        found.with_path(Path::from(key))
    }

    /// Checked downcast of the payload.
    ///
    /// ```
    /// use dyntree::{Kind, Outcome, Value};
    ///
    /// assert_eq!(Outcome::of(Value::from("x")).cast::<String>().ok(), Some("x".to_string()));
    /// assert_eq!(
    ///     Outcome::of(Value::from(1)).cast::<String>(),
    ///     Outcome::wrong_type(Kind::Integer, Kind::String)
    /// );
    /// ```
    pub fn cast<U: FromValue>(self) -> Outcome<U> {
        match self.into_value() {
            Ok((path, value)) => match U::from_value(value) {
                Ok(value) => Outcome::Value { path, value },
                Err(value) => Outcome::WrongType {
                    path,
                    found: value.kind(),
                    expected: U::KIND,
                },
            },
            Err(failure) => failure,
        }
    }

    /// Coerces the payload into a tree node.
    ///
    /// Trees pass through, raw mappings are wrapped without copying, raw
    /// sequences are deep-copied (see [`Tree::of_list`]); scalars yield
    /// `WrongType { expected: Tree }`.
    pub fn into_tree(self) -> Outcome<Tree> {
        match self.into_value() {
            Ok((path, value)) => match value {
                Value::Tree(tree) => Outcome::Value { path, value: tree },
                Value::Map(map) => Outcome::Value {
                    path,
                    value: Tree::Mapping(map),
                },
                Value::List(list) => Outcome::Value {
                    path,
                    value: Tree::of_list(&list),
                },
                other => Outcome::WrongType {
                    path,
                    found: other.kind(),
                    expected: Kind::Tree,
                },
            },
            Err(failure) => failure,
        }
    }

    /// Requires a sequence (raw or tree) whose elements all cast to `E`.
    ///
    /// The first mismatch yields `WrongType` at this path extended with the
    /// offending index. Null elements only pass when `E` is an `Option`.
    pub fn as_list_of<E: FromValue>(self) -> Outcome<Vec<E>> {
        let (path, value) = match self.into_value() {
            Ok(parts) => parts,
            Err(failure) => return failure,
        };
        let elements = match value {
            Value::List(list) | Value::Tree(Tree::Sequence(list)) => list,
            other => {
                return Outcome::WrongType {
                    path,
                    found: other.kind(),
                    expected: Kind::List,
                }
            }
        };
        let mut out = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            match E::from_value(element.clone()) {
                Ok(e) => out.push(e),
                Err(bad) => {
                    return Outcome::WrongType {
                        path: path.push(i),
                        found: bad.kind(),
                        expected: E::KIND,
                    }
                }
            }
        }
        Outcome::Value { path, value: out }
    }

    /// Requires a mapping (raw or tree) whose keys cast to `K` and values
    /// to `V`.
    ///
    /// The first mismatch yields `WrongType` at this path extended with the
    /// offending key.
    pub fn as_map_of<K, V>(self) -> Outcome<IndexMap<K, V>>
    where
        K: FromKey + Eq + Hash,
        V: FromValue,
    {
        let (path, value) = match self.into_value() {
            Ok(parts) => parts,
            Err(failure) => return failure,
        };
        let entries = match value {
            Value::Map(map) | Value::Tree(Tree::Mapping(map)) => map,
            other => {
                return Outcome::WrongType {
                    path,
                    found: other.kind(),
                    expected: Kind::Map,
                }
            }
        };
        let mut out = IndexMap::with_capacity(entries.len());
        for (key, element) in entries.iter() {
            let k = match K::from_key(key.clone()) {
                Ok(k) => k,
                Err(bad) => {
                    return Outcome::WrongType {
                        path: path.push(key.clone()),
                        found: key_kind(&bad),
                        expected: K::KIND,
                    }
                }
            };
            match V::from_value(element.clone()) {
                Ok(v) => {
                    out.insert(k, v);
                }
                Err(bad) => {
                    return Outcome::WrongType {
                        path: path.push(key.clone()),
                        found: bad.kind(),
                        expected: V::KIND,
                    }
                }
            }
        }
        Outcome::Value { path, value: out }
    }

    /// True only for a boolean `true` payload.
    pub fn is_true(&self) -> bool {
        matches!(
            self,
            Outcome::Value {
                value: Value::Bool(true),
                ..
            }
        )
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value { path, value } => write!(f, "Value({value}){}", at_path(path)),
            Outcome::Null { path } => write!(f, "Null{}", at_path(path)),
            Outcome::Missing { path } => write!(f, "Missing{}", at_path(path)),
            Outcome::WrongType {
                path,
                found,
                expected,
            } => write!(
                f,
                "WrongType(found={found}, expected={expected}){}",
                at_path(path)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_of_routes_null() {
        assert!(Outcome::of(Value::Null).is_null());
        assert!(Outcome::of(Value::from(0)).is_value());
        assert!(Outcome::<i64>::from_nullable(None).is_null());
    }

    #[test]
    fn test_null_marker_never_becomes_a_value() {
        assert!(Outcome::present(Value::Null).is_null());
        assert!(Outcome::from_nullable(Some(Value::Null)).is_null());
        assert!(Outcome::present(Value::from(1)).is_value());

        let mapped = Outcome::of(Value::from(1))
            .with_path(path!["a"])
            .map(|_| Value::Null);
        assert_eq!(mapped, Outcome::Null { path: path!["a"] });

        // only the untyped marker is special
        assert_eq!(Outcome::present(1).map(|_| None::<i64>).ok(), Some(None));
    }

    #[test]
    fn test_lookup_in_mapping() {
        let map: RawMap = [(Key::from("a"), Value::from(1)), (Key::from("n"), Value::Null)]
            .into_iter()
            .collect();

        assert_eq!(
            Outcome::lookup_in_mapping(&map, Key::from("a")),
            Outcome::Value {
                path: path!["a"],
                value: Value::from(1)
            }
        );
        assert_eq!(
            Outcome::lookup_in_mapping(&map, Key::from("n")),
            Outcome::Null { path: path!["n"] }
        );
        assert_eq!(
            Outcome::lookup_in_mapping(&map, Key::from("z")),
            Outcome::Missing { path: path!["z"] }
        );
    }

    #[test]
    fn test_lookup_in_sequence_bounds() {
        let list = vec![Value::from("a"), Value::from("b")];
        assert!(Outcome::lookup_in_sequence(&list, 0).is_value());
        assert!(Outcome::lookup_in_sequence(&list, 1).is_value());
        assert_eq!(
            Outcome::lookup_in_sequence(&list, 2),
            Outcome::Missing { path: path![2] }
        );
        assert_eq!(
            Outcome::lookup_in_sequence(&list, -1),
            Outcome::Missing { path: path![-1] }
        );
    }

    #[test]
    fn test_map_passes_failures_through() {
        let missing: Outcome<i64> = Outcome::Missing { path: path!["x"] };
        assert_eq!(missing.map(|v| v + 1), Outcome::Missing { path: path!["x"] });

        let wrong: Outcome<i64> = Outcome::WrongType {
            path: path!["x"],
            found: Kind::String,
            expected: Kind::Integer,
        };
        assert!(wrong.map(|v| v + 1).is_wrong_type());
    }

    #[test]
    fn test_flat_map_restamps_path() {
        let outer = Outcome::present(1).with_path(path!["a"]);
        let chained = outer.flat_map(|v| Outcome::present(v * 2).with_path(path!["b"]));
        assert_eq!(chained.path(), &path!["a"]);
        assert_eq!(chained.ok(), Some(2));

        let outer = Outcome::present(1).with_path(path!["a"]);
        let chained = outer.and_then(|v| Outcome::present(v * 2).with_path(path!["b"]));
        assert_eq!(chained.path(), &path!["b"]);
    }

    #[test]
    fn test_or_else_and_get_or_else() {
        assert_eq!(Outcome::<i64>::missing().get_or_else(|| 7), 7);
        assert_eq!(Outcome::present(3).get_or_else(|| 7), 3);
        assert_eq!(
            Outcome::<i64>::null().or_else(|| Outcome::present(5)),
            Outcome::present(5)
        );
    }

    #[test]
    fn test_cast_keeps_path() {
        let outcome = Outcome::of(Value::from(1)).with_path(path!["n"]);
        assert_eq!(
            outcome.cast::<bool>(),
            Outcome::WrongType {
                path: path!["n"],
                found: Kind::Integer,
                expected: Kind::Boolean
            }
        );
        assert!(Outcome::<Value>::missing().cast::<bool>().is_missing());
    }

    #[test]
    fn test_sequence_short_circuits_on_first_failure() {
        let outcomes = vec![
            Outcome::present(1),
            Outcome::Missing { path: path![1] },
            Outcome::Null { path: path![2] },
        ];
        assert_eq!(
            Outcome::sequence(outcomes),
            Outcome::Missing { path: path![1] }
        );

        let collected: Outcome<Vec<i64>> = (1..=3).map(Outcome::present).collect();
        assert_eq!(collected, Outcome::present(vec![1, 2, 3]));
    }

    #[test]
    fn test_as_list_of() {
        let list = Value::list(["a", "b"]);
        assert_eq!(
            Outcome::of(list).as_list_of::<String>().ok(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        let mixed = Value::list([Value::from("a"), Value::from(1)]);
        assert_eq!(
            Outcome::of(mixed).with_path(path!["xs"]).as_list_of::<String>(),
            Outcome::WrongType {
                path: path!["xs", 1],
                found: Kind::Integer,
                expected: Kind::String
            }
        );
    }

    #[test]
    fn test_as_list_of_nulls_need_option() {
        let list = Value::list([Value::from("a"), Value::Null]);
        assert_eq!(
            Outcome::of(list.clone()).as_list_of::<String>(),
            Outcome::WrongType {
                path: path![1],
                found: Kind::Null,
                expected: Kind::String
            }
        );
        assert_eq!(
            Outcome::of(list).as_list_of::<Option<String>>().ok(),
            Some(vec![Some("a".to_string()), None])
        );
    }

    #[test]
    fn test_as_map_of_checks_values() {
        let map = Value::map([("a", 1), ("b", 2)]);
        let typed = Outcome::of(map).as_map_of::<String, i64>().ok().unwrap();
        assert_eq!(typed.get("a"), Some(&1));

        let bad = Value::map([("a", Value::from(1)), ("b", Value::from("two"))]);
        assert_eq!(
            Outcome::of(bad).as_map_of::<String, i64>(),
            Outcome::WrongType {
                path: path!["b"],
                found: Kind::String,
                expected: Kind::Integer
            }
        );
    }

    #[test]
    fn test_as_map_of_on_list_is_wrong_type() {
        let list = Value::list([1]);
        assert_eq!(
            Outcome::of(list).as_map_of::<String, i64>(),
            Outcome::wrong_type(Kind::List, Kind::Map)
        );
    }

    #[test]
    fn test_into_tree() {
        assert!(Outcome::of(Value::map([("a", 1)])).into_tree().is_value());
        assert!(Outcome::of(Value::list([1])).into_tree().is_value());
        assert_eq!(
            Outcome::of(Value::from(1)).into_tree(),
            Outcome::wrong_type(Kind::Integer, Kind::Tree)
        );
    }

    #[test]
    fn test_unwrap() {
        assert_eq!(Outcome::present(1).unwrap(), Some(1));
        assert_eq!(Outcome::<i64>::null().unwrap(), None);

        let err = Outcome::<i64>::Missing { path: path!["a", 0] }
            .try_unwrap()
            .unwrap_err();
        assert_eq!(err.to_string(), "No result found at a[0]");

        let err = Outcome::<i64>::wrong_type(Kind::Integer, Kind::String)
            .try_unwrap()
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected: String Found: Integer");
    }

    #[test]
    #[should_panic(expected = "No result found at a.b")]
    fn test_unwrap_panics_with_path() {
        Outcome::<i64>::Missing { path: path!["a", "b"] }.unwrap();
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Outcome::of(Value::from("x")).with_path(path!["a"]).to_string(),
            "Value(x) at a"
        );
        assert_eq!(Outcome::<i64>::null().to_string(), "Null");
        assert_eq!(
            Outcome::<i64>::Missing { path: path!["a", 3] }.to_string(),
            "Missing at a[3]"
        );
        assert_eq!(
            Outcome::<i64>::wrong_type(Kind::Integer, Kind::String).to_string(),
            "WrongType(found=Integer, expected=String)"
        );
    }

    #[test]
    fn test_is_true() {
        assert!(Outcome::of(Value::from(true)).is_true());
        assert!(!Outcome::of(Value::from(false)).is_true());
        assert!(!Outcome::of(Value::from(1)).is_true());
        assert!(!Outcome::<Value>::missing().is_true());
    }
}
