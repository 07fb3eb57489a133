//! Bridge to `serde_json`.
//!
//! Parsing stays with `serde_json`; this module only moves an already parsed
//! document into the untyped [`Value`] form and back.

use std::sync::Arc;

use serde_json::{Map, Number};

use crate::outcome::Outcome;
use crate::tree::Tree;
use crate::value::{RawList, RawMap, Value};
use crate::Key;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(arr) => {
                Value::List(Arc::new(arr.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(obj) => Value::Map(Arc::new(
                obj.into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

fn number_to_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        // u64 above i64::MAX and fractional numbers
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn map_to_json(map: &RawMap) -> serde_json::Value {
    let mut obj = Map::with_capacity(map.len());
    for (k, v) in map {
        obj.insert(k.to_string(), v.to_json());
    }
    serde_json::Value::Object(obj)
}

fn list_to_json(list: &RawList) -> serde_json::Value {
    serde_json::Value::Array(list.iter().map(Value::to_json).collect())
}

impl Value {
    /// Converts back to JSON. Non-string keys are stringified and
    /// non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number(Number::from(*i)),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Map(map) => map_to_json(map),
            Value::List(list) => list_to_json(list),
            Value::Tree(tree) => tree.to_json(),
        }
    }
}

impl Tree {
    /// Coerces a parsed JSON document into a tree. Scalars and `null` are
    /// not trees and come back as `WrongType`/`Null`.
    ///
    /// ```
    /// use dyntree::{path, Tree};
    /// use serde_json::json;
    ///
    /// let doc = json!({"results": [{"channel": "web"}]});
    /// let tree = Tree::from_json(doc).ok().unwrap();
    /// assert_eq!(
    ///     tree.get_in(path!["results", 0, "channel"]).cast::<String>().ok(),
    ///     Some("web".to_string())
    /// );
    /// ```
    pub fn from_json(json: serde_json::Value) -> Outcome<Tree> {
        Outcome::of(Value::from(json)).into_tree()
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Tree::Mapping(map) => map_to_json(map),
            Tree::Sequence(list) => list_to_json(list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;
    use serde_json::json;

    #[test]
    fn test_numbers() {
        assert_eq!(Value::from(json!(3)), Value::Int(3));
        assert_eq!(Value::from(json!(-3)), Value::Int(-3));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn test_containers_stay_raw() {
        let v = Value::from(json!({"a": [1, {"b": null}]}));
        assert_eq!(v.kind(), Kind::Map);
        let expected = Value::map([(
            "a",
            Value::list([Value::from(1), Value::map([("b", Value::Null)])]),
        )]);
        assert_eq!(v, expected);
    }

    #[test]
    fn test_roundtrip() {
        let doc = json!({"a": [1, 2.5, "x", true, null, {"b": {}}]});
        let tree = Tree::from_json(doc.clone()).ok().unwrap();
        assert_eq!(tree.to_json(), doc);
    }

    #[test]
    fn test_scalars_are_not_trees() {
        assert_eq!(
            Tree::from_json(json!(1)),
            Outcome::wrong_type(Kind::Integer, Kind::Tree)
        );
        assert!(Tree::from_json(json!(null)).is_null());
    }

    #[test]
    fn test_non_string_keys_and_nan() {
        let t = Tree::map_of([(Key::Index(1), Value::Float(f64::NAN))]);
        assert_eq!(t.to_json(), json!({"1": null}));
    }
}
