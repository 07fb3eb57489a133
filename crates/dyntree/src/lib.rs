//! dyntree - persistent untyped trees with typed, path-aware access.
//!
//! Data parsed from JSON, YAML and friends arrives as nested maps and lists
//! of scalars. This crate wraps that shape in a persistent [`Tree`], answers
//! every lookup and cast with an [`Outcome`] that tells a missing key apart
//! from an explicit null and from a type mismatch, and offers a [`Cursor`]
//! for multi-level edits that only touch the tree when committed.
//!
//! # Example
//!
//! ```
//! use dyntree::{path, Kind, Outcome, Tree, Value};
//!
//! let root = Tree::map_of([
//!     ("user", Value::map([("name", Value::from("ada")), ("age", Value::from(36))])),
//!     ("tags", Value::list(["x", "y"])),
//! ]);
//!
//! // Typed reads
//! assert_eq!(root.get_in(path!["user", "name"]).cast::<String>().ok(), Some("ada".to_string()));
//! assert_eq!(
//!     root.get_in(path!["user", "age"]).cast::<String>(),
//!     Outcome::WrongType { path: path!["user", "age"], found: Kind::Integer, expected: Kind::String },
//! );
//! assert!(root.get_in(path!["tags", 7]).is_missing());
//!
//! // Deferred edits
//! let edited = root.at("user").put("age", 37).commit_or_original();
//! assert_eq!(edited.get_in(path!["user", "age"]).cast::<i64>().ok(), Some(37));
//! assert_eq!(root.get_in(path!["user", "age"]).cast::<i64>().ok(), Some(36));
//! ```

pub mod cast;
pub mod cursor;
pub mod entry;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod kind;
pub mod outcome;
pub mod pointer;
pub mod tree;
pub mod value;

pub use dyntree_path::{path, Key, Path, PathError};

pub use cast::{FromKey, FromValue};
pub use cursor::Cursor;
pub use entry::Entry;
pub use error::NoResultError;
pub use kind::Kind;
pub use outcome::Outcome;
pub use tree::Tree;
pub use value::{RawList, RawMap, Value};
