//! Deferred navigation and editing.
//!
//! A [`Cursor`] is a link in a chain of navigation steps hanging off the tree
//! it was created from. Reads resolve eagerly into an [`Outcome`]; edits only
//! replace the cursor's pending value. Nothing reaches the tree until
//! [`Cursor::commit`] folds the chain back up, rebuilding each container on
//! the way to the root and sharing everything else.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::outcome::Outcome;
use crate::tree::Tree;
use crate::value::Value;
use crate::{Key, Path};

#[derive(Clone)]
pub struct Cursor {
    origin: Tree,
    parent: Option<Arc<Cursor>>,
    key: Option<Key>,
    path: Path,
    target: Outcome<Value>,
}

impl Cursor {
    pub(crate) fn root(tree: Tree) -> Self {
        Cursor {
            target: Outcome::present(Value::Tree(tree.clone())),
            origin: tree,
            parent: None,
            key: None,
            path: Path::root(),
        }
    }

    /// Descends one level per segment of `path`.
    ///
    /// Each step coerces the current value into a tree and looks the segment
    /// up in it. Failures do not stop the descent; they are carried down
    /// re-stamped with the deeper path.
    pub fn at(&self, path: impl Into<Path>) -> Cursor {
        let path = path.into();
        path.iter()
            .fold(self.clone(), |cursor, key| cursor.child(key.clone()))
    }

    fn child(self, key: Key) -> Cursor {
        let path = self.path.push(key.clone());
        let lookup = key.clone();
        let target = spine(self.target.clone())
            .flat_map(move |tree| tree.get(lookup))
            .with_path(path.clone());
        Cursor {
            origin: self.origin.clone(),
            parent: Some(Arc::new(self)),
            key: Some(key),
            path,
            target,
        }
    }

    /// The value at this position, uncommitted edits included.
    pub fn get(&self) -> Outcome<Value> {
        self.target.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The segment that led here from the parent; `None` at the root.
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn parent(&self) -> Option<&Cursor> {
        self.parent.as_deref()
    }

    /// The tree this cursor chain was created from.
    pub fn origin(&self) -> &Tree {
        &self.origin
    }

    pub fn put(&self, key: impl Into<Key>, value: impl Into<Value>) -> Cursor {
        let (key, value) = (key.into(), value.into());
        self.refocus(|tree| tree.put(key, value))
    }

    pub fn remove(&self, key: impl Into<Key>) -> Cursor {
        let key = key.into();
        self.refocus(|tree| tree.remove(key))
    }

    pub fn add(&self, value: impl Into<Value>) -> Cursor {
        let value = value.into();
        self.refocus(|tree| tree.add(value))
    }

    pub fn insert(&self, index: i64, value: impl Into<Value>) -> Cursor {
        let value = value.into();
        self.refocus(|tree| tree.insert(index, value))
    }

    fn refocus(&self, edit: impl FnOnce(Tree) -> Tree) -> Cursor {
        Cursor {
            target: spine(self.target.clone()).map(|tree| Value::Tree(edit(tree))),
            ..self.clone()
        }
    }

    /// Writes the pending value back through every parent and returns the
    /// new root.
    ///
    /// The first position on the way up that does not hold a value aborts
    /// the commit; its outcome is returned as-is, path included.
    pub fn commit(&self) -> Outcome<Tree> {
        match (&self.parent, &self.key) {
            (Some(parent), Some(key)) => {
                let key = key.clone();
                self.target
                    .clone()
                    .and_then(|value| parent.put(key, value).commit())
            }
            _ => spine(self.target.clone()),
        }
    }

    /// [`commit`](Self::commit), falling back to the untouched original root
    /// when it fails.
    pub fn commit_or_original(&self) -> Tree {
        match self.commit() {
            Outcome::Value { value, .. } => value,
            failure => {
                debug!(cursor = %self.path, outcome = %failure, "commit failed, keeping original root");
                self.origin.clone()
            }
        }
    }
}

/// Coerces a position on the navigation chain into a tree.
///
/// Unlike [`Outcome::into_tree`], a raw sequence is wrapped in place rather
/// than deep-copied, so elements a commit does not touch stay shared.
fn spine(target: Outcome<Value>) -> Outcome<Tree> {
    match target {
        Outcome::Value {
            path,
            value: Value::List(list),
        } => Outcome::Value {
            path,
            value: Tree::Sequence(list),
        },
        other => other.into_tree(),
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor at {}", self.path)
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("path", &self.path)
            .field("target", &self.target)
            .finish()
    }
}
