//! Result and error types for tablecheck.

use thiserror::Error;

/// Result type for tablecheck operations
pub type CheckResult<T> = Result<T, CheckError>;

/// One visible header cell, captured for resolution diagnostics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HeaderInfo {
    /// Value of the column-identifier attribute, if present
    pub key: Option<String>,
    /// Trimmed header text
    pub text: String,
}

impl std::fmt::Display for HeaderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "data-column='{}', text='{}'",
            self.key.as_deref().unwrap_or(""),
            self.text
        )
    }
}

fn markup_suffix(markup: &str) -> String {
    if markup.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", markup.trim())
    }
}

fn header_dump(headers: &[HeaderInfo]) -> String {
    if headers.is_empty() {
        return "no visible headers".to_string();
    }
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("[{i}] {h}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while verifying a table
#[derive(Debug, Error)]
pub enum CheckError {
    /// Column key has no matching visible header
    #[error("Column '{key}' not found among visible headers ({})", header_dump(.headers))]
    ColumnNotFound {
        /// Logical column key
        key: String,
        /// Every visible header at resolution time
        headers: Vec<HeaderInfo>,
    },

    /// Filter control exposes no options
    #[error("No items found in {control} dropdown{}", markup_suffix(.markup))]
    EmptyDropdown {
        /// Filter control description
        control: String,
        /// Panel markup, empty when unavailable
        markup: String,
    },

    /// Dropdown item violates the checkbox/label contract
    #[error("Dropdown item {index} is malformed ({reason}): {markup}")]
    StructuralMismatch {
        /// 1-based item position
        index: usize,
        /// Which part of the contract failed
        reason: String,
        /// Raw item markup
        markup: String,
    },

    /// Table or label content differs from expectation
    #[error("{step}: expected {expected}, got {actual}")]
    AssertionMismatch {
        /// Step of the selection sequence
        step: String,
        /// Expected content
        expected: String,
        /// Actual content
        actual: String,
    },

    /// An element wait exceeded its bound
    #[error("Timed out after {ms}ms waiting for {what}")]
    InteractionTimeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Driver-level failure (lost connection, protocol error)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CheckError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(what: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::InteractionTimeout {
            what: what.into(),
            ms: timeout.as_millis() as u64,
        }
    }

    /// Create an assertion mismatch
    #[must_use]
    pub fn mismatch(
        step: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionMismatch {
            step: step.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether this error aborts the running scenario.
    ///
    /// Interaction faults propagate; content mismatches are collected.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InteractionTimeout { .. }
                | Self::Navigation { .. }
                | Self::Driver { .. }
                | Self::BrowserLaunch { .. }
                | Self::Io(_)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_column_not_found_dumps_headers() {
        let err = CheckError::ColumnNotFound {
            key: "ytd".to_string(),
            headers: vec![
                HeaderInfo {
                    key: Some("name".to_string()),
                    text: "Name".to_string(),
                },
                HeaderInfo {
                    key: None,
                    text: "Chart".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("'ytd'"));
        assert!(msg.contains("[0] data-column='name', text='Name'"));
        assert!(msg.contains("[1] data-column='', text='Chart'"));
    }

    #[test]
    fn test_column_not_found_without_headers() {
        let err = CheckError::ColumnNotFound {
            key: "ytd".to_string(),
            headers: vec![],
        };
        assert!(err.to_string().contains("no visible headers"));
    }

    #[test]
    fn test_timeout_message() {
        let err = CheckError::timeout("dropdown", Duration::from_secs(5));
        assert_eq!(
            err.to_string(),
            "Timed out after 5000ms waiting for dropdown"
        );
    }

    #[test]
    fn test_empty_dropdown_carries_markup() {
        let with_markup = CheckError::EmptyDropdown {
            control: "ytd".to_string(),
            markup: " <p>none</p>\n".to_string(),
        };
        assert_eq!(
            with_markup.to_string(),
            "No items found in ytd dropdown: <p>none</p>"
        );
        let bare = CheckError::EmptyDropdown {
            control: "ytd".to_string(),
            markup: String::new(),
        };
        assert_eq!(bare.to_string(), "No items found in ytd dropdown");
    }

    #[test]
    fn test_fatality() {
        assert!(CheckError::timeout("x", Duration::from_millis(1)).is_fatal());
        assert!(CheckError::driver("gone").is_fatal());
        assert!(!CheckError::mismatch("step", "a", "b").is_fatal());
        assert!(!CheckError::EmptyDropdown {
            control: "ytd".to_string(),
            markup: String::new(),
        }
        .is_fatal());
        assert!(!CheckError::ColumnNotFound {
            key: "k".to_string(),
            headers: vec![]
        }
        .is_fatal());
    }

    #[test]
    fn test_mismatch_message() {
        let err = CheckError::mismatch("single select", "'5.00%'", "'3.00%'");
        assert_eq!(
            err.to_string(),
            "single select: expected '5.00%', got '3.00%'"
        );
    }
}
