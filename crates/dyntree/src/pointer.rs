//! JSON Pointer lookups resolved against a tree.
//!
//! [`Path::from_json_pointer`] has to guess whether `0` names an index or a
//! key. Here each component is typed by the container it actually lands in.

use dyntree_path::{is_valid_index, parse_json_pointer, validate_path};

use crate::outcome::Outcome;
use crate::tree::Tree;
use crate::value::{RawMap, Value};
use crate::{Key, Path, PathError};

impl Tree {
    /// Translates a JSON Pointer into a [`Path`] for this tree.
    ///
    /// In a mapping a component matches an existing name first, then an
    /// existing index or boolean key spelled the same way, and finally
    /// becomes a name. In a sequence a canonical index is an index. Below a
    /// position that does not exist, components fall back to
    /// [`Key::from_pointer_component`].
    ///
    /// # Errors
    ///
    /// Fails when the pointer is malformed or too long.
    ///
    /// ```
    /// use dyntree::{path, Tree, Value};
    ///
    /// let t = Tree::map_of([("0", Value::list(["x", "y"]))]);
    /// assert_eq!(t.resolve_pointer("/0/1").unwrap(), path!["0", 1]);
    /// ```
    pub fn resolve_pointer(&self, pointer: &str) -> Result<Path, PathError> {
        let mut current = Some(Value::Tree(self.clone()));
        let mut keys = Vec::new();
        for component in parse_json_pointer(pointer)? {
            let key = match &current {
                Some(Value::Map(map)) | Some(Value::Tree(Tree::Mapping(map))) => {
                    key_in_mapping(map, &component)
                }
                _ => Key::from_pointer_component(&component),
            };
            current = current.as_ref().and_then(|value| child(value, &key));
            keys.push(key);
        }
        let path = Path::from(keys);
        validate_path(&path)?;
        Ok(path)
    }

    /// [`get_in`](Self::get_in) at the position a JSON Pointer names.
    ///
    /// # Errors
    ///
    /// Fails when the pointer is malformed or too long; lookup failures are
    /// reported through the [`Outcome`].
    pub fn get_pointer(&self, pointer: &str) -> Result<Outcome<Value>, PathError> {
        Ok(self.get_in(self.resolve_pointer(pointer)?))
    }
}

fn key_in_mapping(map: &RawMap, component: &str) -> Key {
    let name = Key::Name(component.to_string());
    if map.contains_key(&name) {
        return name;
    }
    let alternative = if is_valid_index(component) {
        component.parse::<i64>().ok().map(Key::Index)
    } else {
        component.parse::<bool>().ok().map(Key::Bool)
    };
    match alternative {
        Some(key) if map.contains_key(&key) => key,
        _ => name,
    }
}

fn child(value: &Value, key: &Key) -> Option<Value> {
    match value {
        Value::Map(map) | Value::Tree(Tree::Mapping(map)) => map.get(key).cloned(),
        Value::List(list) | Value::Tree(Tree::Sequence(list)) => {
            key.index_within(list.len()).map(|i| list[i].clone())
        }
        _ => None,
    }
}
