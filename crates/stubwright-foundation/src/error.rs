//! Error handling for the stubwright system

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type used throughout stubwright
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StubError {
    /// The target declaration is absent from the source tree
    #[error("Declaration not found: {name}")]
    DeclarationNotFound { name: String },

    /// The framework identifier is not one of the supported set
    #[error("Unsupported test framework: '{identifier}' (expected one of: junit3, junit4, testng)")]
    UnsupportedFramework { identifier: String },

    /// Rendered edits could not be applied to the supplied original text
    #[error("Failed to apply edits: {message}")]
    DiffApplication { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl StubError {
    /// Create a new declaration-not-found error
    pub fn declaration_not_found(name: impl Into<String>) -> Self {
        Self::DeclarationNotFound { name: name.into() }
    }

    /// Create a new unsupported-framework error
    pub fn unsupported_framework(identifier: impl Into<String>) -> Self {
        Self::UnsupportedFramework {
            identifier: identifier.into(),
        }
    }

    /// Create a new diff application error
    pub fn diff_application(message: impl Into<String>) -> Self {
        Self::DiffApplication {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error bound to the file it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Io {
            message: format!("{}: {}", path.display(), source),
            path: Some(path),
            source: Some(source),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        use error_codes::*;

        match self {
            Self::DeclarationNotFound { .. } => E2001_DECLARATION_NOT_FOUND,
            Self::UnsupportedFramework { .. } => E2002_UNSUPPORTED_FRAMEWORK,
            Self::DiffApplication { .. } => E2003_DIFF_APPLICATION,
            Self::Parse { .. } => E2004_PARSE,
            Self::Config { .. } => E2005_CONFIG,
            Self::Io { .. } => E2006_IO,
        }
    }
}

impl From<std::io::Error> for StubError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

/// Result type alias for convenience
pub type StubResult<T> = Result<T, StubError>;

/// Standardized error codes for reports
pub mod error_codes {
    pub const E2001_DECLARATION_NOT_FOUND: &str = "E2001";
    pub const E2002_UNSUPPORTED_FRAMEWORK: &str = "E2002";
    pub const E2003_DIFF_APPLICATION: &str = "E2003";
    pub const E2004_PARSE: &str = "E2004";
    pub const E2005_CONFIG: &str = "E2005";
    pub const E2006_IO: &str = "E2006";
}

/// Serializable error report, printed by the CLI in JSON mode
///
/// # Example
/// ```rust
/// use stubwright_foundation::error::{ErrorReport, StubError};
///
/// let report = ErrorReport::from(&StubError::declaration_not_found("testArea"));
/// assert_eq!(report.code, "E2001");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional actionable suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&StubError> for ErrorReport {
    fn from(err: &StubError) -> Self {
        let suggestion = match err {
            StubError::DeclarationNotFound { .. } => {
                Some("Check that the test method exists in the file".to_string())
            }
            StubError::UnsupportedFramework { .. } => Some(
                "Set testing.framework to junit3, junit4 or testng".to_string(),
            ),
            StubError::DiffApplication { .. } => {
                Some("Re-read the file and retry; it may have changed on disk".to_string())
            }
            _ => None,
        };

        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion,
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            StubError::declaration_not_found("a"),
            StubError::unsupported_framework("b"),
            StubError::diff_application("c"),
            StubError::parse("d"),
            StubError::config("e"),
            StubError::from(std::io::Error::other("f")),
        ];
        let mut codes: Vec<_> = errors.iter().map(StubError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_unsupported_framework_message_names_identifier() {
        let err = StubError::unsupported_framework("spock");
        assert!(err.to_string().contains("'spock'"));
    }

    #[test]
    fn test_report_display_includes_suggestion() {
        let report = ErrorReport::from(&StubError::declaration_not_found("testArea"));
        let rendered = report.to_string();
        assert!(rendered.starts_with("[E2001] Declaration not found: testArea"));
        assert!(rendered.contains("Suggestion:"));
    }

    #[test]
    fn test_parse_error_has_no_suggestion() {
        let report = ErrorReport::from(&StubError::parse("bad grammar"));
        assert_eq!(report.suggestion, None);
    }
}
