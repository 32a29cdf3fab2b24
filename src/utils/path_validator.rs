//! Path validation
//!
//! Stored paths are in-app relative paths. Absolute paths, parent
//! traversal, and anything carrying a URL scheme are rejected so a
//! redirect can never leave the configured application origin.

use url::Url;

#[derive(Debug)]
pub enum PathValidationError {
    EmptyPath,
    AbsolutePath(String),
    ParentTraversal(String),
    HasScheme(String),
}

impl std::fmt::Display for PathValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "path cannot be empty"),
            Self::AbsolutePath(p) => write!(f, "expected relative path, got absolute: {}", p),
            Self::ParentTraversal(p) => write!(f, "path cannot contain '../': {}", p),
            Self::HasScheme(p) => write!(f, "path cannot be a full URL: {}", p),
        }
    }
}

impl std::error::Error for PathValidationError {}

/// Validate a candidate path and return it trimmed.
///
/// Checks, in order:
/// 1. non-empty after trimming
/// 2. not absolute (no leading `/`, which also covers `//host` forms)
/// 3. no `../` segments
/// 4. not parseable as an absolute URL (no scheme)
pub fn validate_relative_path(path: &str) -> Result<&str, PathValidationError> {
    let path = path.trim();

    if path.is_empty() {
        return Err(PathValidationError::EmptyPath);
    }

    if path.starts_with('/') {
        return Err(PathValidationError::AbsolutePath(path.to_string()));
    }

    if path == ".." || path.contains("../") {
        return Err(PathValidationError::ParentTraversal(path.to_string()));
    }

    if Url::parse(path).is_ok() {
        return Err(PathValidationError::HasScheme(path.to_string()));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert_eq!(validate_relative_path("d/abc123").unwrap(), "d/abc123");
        assert_eq!(
            validate_relative_path("d/abc123/my-dash?viewPanel=2&from=now-6h").unwrap(),
            "d/abc123/my-dash?viewPanel=2&from=now-6h"
        );
        assert_eq!(validate_relative_path("explore?left=%7B%7D").unwrap(), "explore?left=%7B%7D");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(validate_relative_path("  d/abc  ").unwrap(), "d/abc");
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(
            validate_relative_path(""),
            Err(PathValidationError::EmptyPath)
        ));
        assert!(matches!(
            validate_relative_path("   "),
            Err(PathValidationError::EmptyPath)
        ));
    }

    #[test]
    fn test_absolute_path() {
        assert!(matches!(
            validate_relative_path("/etc/passwd"),
            Err(PathValidationError::AbsolutePath(_))
        ));
        // protocol-relative URLs are absolute too
        assert!(matches!(
            validate_relative_path("//evil.example/phish"),
            Err(PathValidationError::AbsolutePath(_))
        ));
    }

    #[test]
    fn test_parent_traversal() {
        assert!(matches!(
            validate_relative_path("a/../../b"),
            Err(PathValidationError::ParentTraversal(_))
        ));
        assert!(matches!(
            validate_relative_path("../admin"),
            Err(PathValidationError::ParentTraversal(_))
        ));
        assert!(matches!(
            validate_relative_path(".."),
            Err(PathValidationError::ParentTraversal(_))
        ));
    }

    #[test]
    fn test_scheme_rejected() {
        assert!(matches!(
            validate_relative_path("http://evil.example"),
            Err(PathValidationError::HasScheme(_))
        ));
        assert!(matches!(
            validate_relative_path("https://evil.example/x"),
            Err(PathValidationError::HasScheme(_))
        ));
        assert!(matches!(
            validate_relative_path("javascript:alert(1)"),
            Err(PathValidationError::HasScheme(_))
        ));
        assert!(matches!(
            validate_relative_path("data:text/html,x"),
            Err(PathValidationError::HasScheme(_))
        ));
    }

    #[test]
    fn test_colon_after_slash_is_relative() {
        // a colon later in the path is not a scheme separator
        assert!(validate_relative_path("d/abc:def").is_ok());
    }
}
