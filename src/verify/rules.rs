//! Validation rules for origins, library names and versions.
//!
//! Pure functions with no I/O or side effects.

use crate::error::{BumpError, Result};
use regex::Regex;

/// `category/name`, each part made of the characters ports use.
const ORIGIN_PATTERN: &str = r"^([A-Za-z0-9_.+-]+)/([A-Za-z0-9_.+-]+)$";

/// Validates a port origin.
///
/// ## Rules
/// - Exactly one `/` separating category and name
/// - Parts contain only `[A-Za-z0-9_.+-]`
/// - Neither part is `.` or `..`
pub fn validate_origin(origin: &str) -> Result<()> {
    let pattern = Regex::new(ORIGIN_PATTERN)?;

    let Some(caps) = pattern.captures(origin) else {
        return Err(BumpError::InvalidOrigin(
            origin.to_string(),
            "expected category/name".to_string(),
        ));
    };

    for part in [&caps[1], &caps[2]] {
        if part == "." || part == ".." {
            return Err(BumpError::InvalidOrigin(
                origin.to_string(),
                format!("cannot use '{}' as a path component", part),
            ));
        }
    }

    Ok(())
}

/// Validates the library name used to build soname tokens.
pub fn validate_library_name(name: &str) -> Result<()> {
    validate_token_part("library name", name)?;

    if name.ends_with('.') {
        log::warn!("Library name '{}' ends with '.', tokens will contain '..'", name);
    }

    Ok(())
}

/// Validates the old and new library versions.
pub fn validate_versions(old: &str, new: &str) -> Result<()> {
    validate_token_part("old version", old)?;
    validate_token_part("new version", new)?;

    if old == new {
        return Err(BumpError::InvalidArgument(
            "new version".to_string(),
            format!("same as old version '{}'", old),
        ));
    }

    Ok(())
}

fn validate_token_part(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BumpError::InvalidArgument(
            what.to_string(),
            "cannot be empty".to_string(),
        ));
    }

    if let Some(ch) = value.chars().find(|c| c.is_whitespace() || *c == '/') {
        return Err(BumpError::InvalidArgument(
            what.to_string(),
            format!("invalid character {:?} in '{}'", ch, value),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_origins() {
        for origin in ["devel/libfoo", "x11-toolkits/gtk30", "lang/gcc12+", "www/p5-Foo_Bar.pm"] {
            assert!(validate_origin(origin).is_ok(), "{}", origin);
        }
    }

    #[test]
    fn test_invalid_origins() {
        for origin in ["", "libfoo", "devel/", "/libfoo", "devel/libfoo/extra", "devel/lib foo", "../libfoo", "devel/.."] {
            assert!(
                matches!(validate_origin(origin), Err(BumpError::InvalidOrigin(_, _))),
                "{}",
                origin
            );
        }
    }

    #[test]
    fn test_library_name() {
        assert!(validate_library_name("libfoo.so").is_ok());
        assert!(validate_library_name("").is_err());
        assert!(validate_library_name("lib foo").is_err());
        assert!(validate_library_name("lib/foo").is_err());
    }

    #[test]
    fn test_versions() {
        assert!(validate_versions("3", "4").is_ok());
        assert!(validate_versions("1.2", "1.3").is_ok());
        assert!(validate_versions("", "4").is_err());
        assert!(validate_versions("3", " 4").is_err());
    }

    #[test]
    fn test_versions_must_differ() {
        assert!(matches!(
            validate_versions("3", "3"),
            Err(BumpError::InvalidArgument(_, _))
        ));
    }
}
