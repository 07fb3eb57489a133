//! Runtime shape classification of untyped values.

use std::fmt;

/// The runtime shape of a [`Value`](crate::Value), reported by
/// [`Outcome::WrongType`](crate::Outcome::WrongType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    /// A raw mapping that has not been wrapped as a tree.
    Map,
    /// A raw sequence that has not been wrapped as a tree.
    List,
    /// A mapping or sequence tree node.
    Tree,
    /// Accepts anything. Only ever appears as an expected kind.
    Any,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "Null",
            Kind::Boolean => "Boolean",
            Kind::Integer => "Integer",
            Kind::Float => "Float",
            Kind::String => "String",
            Kind::Map => "Map",
            Kind::List => "List",
            Kind::Tree => "Tree",
            Kind::Any => "Any",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
