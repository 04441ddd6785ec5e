//! Key syntax validation

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("key must not be empty")]
    Empty,

    #[error("key {key:?} contains {found:?}; only letters, digits, dots and underscores are allowed")]
    InvalidCharacter { key: String, found: char },
}

/// Check a dot-path key before it is sent anywhere.
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    match key.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '.' && *c != '_') {
        Some(found) => Err(KeyError::InvalidCharacter {
            key: key.to_string(),
            found,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_usual_shapes() {
        assert!(validate_key("storage.base_path").is_ok());
        assert!(validate_key("debug").is_ok());
        assert!(validate_key("camera.resolutions.4k.width").is_ok());
    }

    #[test]
    fn rejects_anything_outside_the_alphabet() {
        assert_eq!(validate_key(""), Err(KeyError::Empty));
        assert!(matches!(
            validate_key("storage/base"),
            Err(KeyError::InvalidCharacter { found: '/', .. })
        ));
        assert!(validate_key("has space").is_err());
        assert!(validate_key("dash-ed").is_err());
        assert!(validate_key("ünïcode").is_err());
    }
}
