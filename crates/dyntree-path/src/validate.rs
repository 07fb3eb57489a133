//! Validation limits for paths and pointers.

use crate::path::Path;
use crate::PathError;

/// Maximum allowed pointer string length.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed path depth.
pub const MAX_PATH_LENGTH: usize = 256;

/// Validate a JSON Pointer string.
///
/// # Errors
///
/// Returns an error if:
/// - The pointer is non-empty but doesn't start with `/`
/// - The pointer exceeds [`MAX_POINTER_LENGTH`]
///
/// # Example
///
/// ```
/// use dyntree_path::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("foo").unwrap_err();
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), PathError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(PathError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(PathError::PointerTooLong);
    }
    Ok(())
}

/// Validate the depth of a path.
///
/// # Errors
///
/// Returns [`PathError::PathTooLong`] past [`MAX_PATH_LENGTH`] steps.
pub fn validate_path(path: &Path) -> Result<(), PathError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(PathError::PathTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Key;

    #[test]
    fn test_validate_pointer() {
        assert!(validate_json_pointer("").is_ok());
        assert!(validate_json_pointer("/").is_ok());
        assert!(validate_json_pointer("/foo/bar").is_ok());
        assert_eq!(
            validate_json_pointer("foo/bar"),
            Err(PathError::PointerInvalid)
        );
    }

    #[test]
    fn test_validate_long_pointer() {
        let long_pointer = "/".to_string() + &"a".repeat(2000);
        assert_eq!(
            validate_json_pointer(&long_pointer),
            Err(PathError::PointerTooLong)
        );
    }

    #[test]
    fn test_validate_path_depth() {
        let ok: Path = (0..256i64).map(Key::Index).collect();
        assert!(validate_path(&ok).is_ok());

        let too_deep: Path = (0..300i64).map(Key::Index).collect();
        assert_eq!(validate_path(&too_deep), Err(PathError::PathTooLong));
    }
}
