//! Key paths for dyntree.
//!
//! A [`Path`] is an immutable list of [`Key`] segments naming a location in a
//! nested tree. Paths are attached to every lookup result for diagnostics and
//! render as dot/bracket notation (`a.b[3].c`).
//!
//! # Example
//!
//! ```
//! use dyntree_path::{path, Key, Path};
//!
//! let p = path!["users", 3, "name"];
//! assert_eq!(p.to_string(), "users[3].name");
//! assert_eq!(p.last(), Some(&Key::from("name")));
//! assert_eq!(p.up().to_string(), "users[3]");
//!
//! assert_eq!(p.to_json_pointer(), "/users/3/name");
//! assert_eq!(Path::from_json_pointer("/users/3/name").unwrap(), p);
//! ```

use thiserror::Error;

pub mod key;
pub mod path;
pub mod pointer;
pub mod validate;

pub use key::Key;
pub use path::Path;
pub use pointer::{escape_component, is_valid_index, parse_json_pointer, unescape_component};
pub use validate::{validate_json_pointer, validate_path, MAX_PATH_LENGTH, MAX_POINTER_LENGTH};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("NO_PARENT")]
    NoParent,
    #[error("POINTER_INVALID")]
    PointerInvalid,
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("Path too long")]
    PathTooLong,
}
