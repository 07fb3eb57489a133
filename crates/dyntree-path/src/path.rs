//! The persistent [`Path`] type.

use std::fmt;
use std::sync::Arc;

use crate::key::Key;
use crate::PathError;

/// An immutable, ordered sequence of [`Key`]s identifying a location inside
/// a tree.
///
/// Paths are cheap to clone; every operation returns a new path and never
/// touches the receiver.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    steps: Arc<[Key]>,
}

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path from anything that yields keys.
    pub fn of<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        keys.into_iter().map(Into::into).collect()
    }

    pub fn steps(&self) -> &[Key] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn head(&self) -> Option<&Key> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Key> {
        self.steps.last()
    }

    /// Everything after the first segment. The tail of the root is the root.
    pub fn tail(&self) -> Path {
        match self.steps.split_first() {
            Some((_, rest)) => Path::from(rest.to_vec()),
            None => self.clone(),
        }
    }

    /// Everything before the last segment. Same as [`Path::up`].
    pub fn all_but_last(&self) -> Path {
        self.up()
    }

    /// Drops the last segment; the root stays the root.
    pub fn up(&self) -> Path {
        match self.steps.split_last() {
            Some((_, init)) => Path::from(init.to_vec()),
            None => self.clone(),
        }
    }

    /// Appends a segment.
    pub fn push(&self, key: impl Into<Key>) -> Path {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(key.into());
        Path::from(steps)
    }

    /// Concatenates `other` after `self`.
    pub fn join(&self, other: &Path) -> Path {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut steps = Vec::with_capacity(self.len() + other.len());
        steps.extend_from_slice(&self.steps);
        steps.extend_from_slice(&other.steps);
        Path::from(steps)
    }

    /// Get the parent path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoParent`] for the root.
    pub fn parent(&self) -> Result<Path, PathError> {
        if self.is_empty() {
            return Err(PathError::NoParent);
        }
        Ok(self.up())
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.steps.starts_with(&prefix.steps)
    }

    /// True if `self` lies strictly below `parent`.
    pub fn is_child_of(&self, parent: &Path) -> bool {
        self.len() > parent.len() && self.starts_with(parent)
    }
}

impl Default for Path {
    fn default() -> Self {
        Path::from(Vec::new())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Key::Index(idx) => write!(f, "[{idx}]")?,
                other => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{other}")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl From<Vec<Key>> for Path {
    fn from(steps: Vec<Key>) -> Self {
        Path {
            steps: steps.into(),
        }
    }
}

impl From<&[Key]> for Path {
    fn from(steps: &[Key]) -> Self {
        Path {
            steps: steps.into(),
        }
    }
}

impl From<Key> for Path {
    fn from(key: Key) -> Self {
        Path::from(vec![key])
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

macro_rules! path_from_key {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Path {
                fn from(k: $t) -> Self {
                    Path::from(Key::from(k))
                }
            }
        )*
    };
}

path_from_key!(&str, String, i32, i64, usize, bool);

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Path::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl Extend<Key> for Path {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        let mut steps = self.steps.to_vec();
        steps.extend(iter);
        self.steps = steps.into();
    }
}

/// Builds a [`Path`] from heterogeneous segments.
///
/// ```
/// use dyntree_path::{path, Key, Path};
///
/// let p = path!["a", 0, "b"];
/// assert_eq!(p.to_string(), "a[0].b");
/// assert_eq!(p.len(), 3);
/// assert_eq!(path![], Path::root());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {
        $crate::Path::from(vec![$($crate::Key::from($seg)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_display() {
        assert_eq!(path!["a", "b", 3, "c"].to_string(), "a.b[3].c");
        assert_eq!(path![0, "a"].to_string(), "[0].a");
        assert_eq!(path![0, 1].to_string(), "[0][1]");
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn test_push_does_not_touch_receiver() {
        let p = path!["a"];
        let q = p.push("b");
        assert_eq!(p, path!["a"]);
        assert_eq!(q, path!["a", "b"]);
    }

    #[test]
    fn test_up_and_tail() {
        let p = path!["a", "b", "c"];
        assert_eq!(p.up(), path!["a", "b"]);
        assert_eq!(p.all_but_last(), path!["a", "b"]);
        assert_eq!(p.tail(), path!["b", "c"]);
        assert_eq!(Path::root().up(), Path::root());
        assert_eq!(Path::root().tail(), Path::root());
    }

    #[test]
    fn test_head_last() {
        let p = path!["a", 1];
        assert_eq!(p.head(), Some(&Key::from("a")));
        assert_eq!(p.last(), Some(&Key::Index(1)));
        assert_eq!(Path::root().head(), None);
        assert_eq!(Path::root().last(), None);
    }

    #[test]
    fn test_join() {
        let p = path!["a"].join(&path![1, "b"]);
        assert_eq!(p, path!["a", 1, "b"]);
        assert_eq!(Path::root().join(&p), p);
        assert_eq!(p.join(&Path::root()), p);
    }

    #[test]
    fn test_parent() {
        assert_eq!(path!["foo", "bar"].parent().unwrap(), path!["foo"]);
        assert_eq!(path!["foo"].parent().unwrap(), Path::root());
        assert!(matches!(Path::root().parent(), Err(PathError::NoParent)));
    }

    #[test]
    fn test_is_child_of() {
        let parent = path!["foo"];
        let child = path!["foo", "bar"];
        let sibling = path!["baz"];

        assert!(child.is_child_of(&parent));
        assert!(!parent.is_child_of(&child));
        assert!(!sibling.is_child_of(&parent));
        assert!(!parent.is_child_of(&parent));
    }

    #[test]
    fn test_extend() {
        let mut p = path!["a"];
        p.extend([Key::from(2), Key::from("z")]);
        assert_eq!(p, path!["a", 2, "z"]);
    }
}
