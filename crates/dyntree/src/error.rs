use thiserror::Error;

use crate::kind::Kind;
use crate::Path;

/// Raised by [`Outcome::try_unwrap`](crate::Outcome::try_unwrap) when a
/// lookup produced neither a value nor an explicit null.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoResultError {
    #[error("No result found{}", at_path(.path))]
    Missing { path: Path },
    #[error("Expected: {expected} Found: {found}{}", at_path(.path))]
    WrongType {
        path: Path,
        found: Kind,
        expected: Kind,
    },
}

impl NoResultError {
    pub fn path(&self) -> &Path {
        match self {
            NoResultError::Missing { path } | NoResultError::WrongType { path, .. } => path,
        }
    }
}

/// ` at a.b[0]`, or nothing for the root.
pub(crate) fn at_path(path: &Path) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {path}")
    }
}
