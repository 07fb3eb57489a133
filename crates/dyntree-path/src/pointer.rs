//! JSON Pointer (RFC 6901) interop for [`Path`].

use crate::key::Key;
use crate::path::Path;
use crate::validate::{validate_json_pointer, validate_path};
use crate::PathError;

/// Unescapes a JSON Pointer path component.
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Check if a string is a canonical non-negative array index (no sign, no
/// leading zeros).
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Split a JSON Pointer into unescaped components.
///
/// # Errors
///
/// Fails when the pointer is non-empty without a leading `/` or exceeds
/// the maximum pointer length.
///
/// ```
/// use dyntree_path::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("/a/0/b~1c").unwrap(), vec!["a", "0", "b/c"]);
/// assert!(parse_json_pointer("").unwrap().is_empty());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Vec<String>, PathError> {
    validate_json_pointer(pointer)?;
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    Ok(pointer[1..].split('/').map(unescape_component).collect())
}

impl Key {
    /// The key an unescaped pointer component names when nothing is known
    /// about the container it addresses: canonical indices (`0`, `17`, …)
    /// become [`Key::Index`], everything else a [`Key::Name`].
    pub fn from_pointer_component(component: &str) -> Key {
        if is_valid_index(component) {
            if let Ok(i) = component.parse::<i64>() {
                return Key::Index(i);
            }
        }
        Key::Name(component.to_string())
    }
}

impl Path {
    /// Parse a JSON Pointer into a path.
    ///
    /// Components are typed without looking at any tree, see
    /// [`Key::from_pointer_component`]. A pointer string cannot tell a
    /// digit-only name such as `"0"` from an index, nor a `Key::Bool` from
    /// the name `"true"`, so those keys do not survive a
    /// [`to_json_pointer`](Self::to_json_pointer) round trip. Resolve the
    /// pointer against the tree it addresses to keep them.
    ///
    /// # Errors
    ///
    /// Fails when the pointer is non-empty without a leading `/`, exceeds
    /// the maximum pointer length, or has more than
    /// [`MAX_PATH_LENGTH`](crate::MAX_PATH_LENGTH) components.
    ///
    /// # Example
    ///
    /// ```
    /// use dyntree_path::{path, Path};
    ///
    /// assert_eq!(Path::from_json_pointer("").unwrap(), Path::root());
    /// assert_eq!(Path::from_json_pointer("/a/0/b~1c").unwrap(), path!["a", 0, "b/c"]);
    /// assert!(Path::from_json_pointer("a/b").is_err());
    /// ```
    pub fn from_json_pointer(pointer: &str) -> Result<Path, PathError> {
        let path: Path = parse_json_pointer(pointer)?
            .iter()
            .map(|component| Key::from_pointer_component(component))
            .collect();
        validate_path(&path)?;
        Ok(path)
    }

    /// Format this path as a JSON Pointer. The root formats as `""`.
    ///
    /// ```
    /// use dyntree_path::path;
    ///
    /// assert_eq!(path!["foo", 1, "a~b"].to_json_pointer(), "/foo/1/a~0b");
    /// ```
    pub fn to_json_pointer(&self) -> String {
        let mut out = String::new();
        for step in self {
            out.push('/');
            out.push_str(&escape_component(&step.to_string()));
        }
        out
    }
}
