//! Accumulated scenario failures.
//!
//! Content mismatches do not stop a scenario; they are recorded here and
//! turned into a pass/fail decision once the scenario ends, so one run
//! reports every defect it can observe.

use crate::result::CheckError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Category of a recorded failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Column key had no visible header
    Resolution,
    /// Filter control exposed no options
    EmptyDropdown,
    /// Dropdown item broke the checkbox/label contract
    StructuralMismatch,
    /// Table or label content differed from expectation
    AssertionMismatch,
    /// External wait or interaction failed
    InteractionTimeout,
}

impl DiagnosticKind {
    /// Classify an error
    #[must_use]
    pub const fn of(error: &CheckError) -> Self {
        match error {
            CheckError::ColumnNotFound { .. } => Self::Resolution,
            CheckError::EmptyDropdown { .. } => Self::EmptyDropdown,
            CheckError::StructuralMismatch { .. } => Self::StructuralMismatch,
            CheckError::InteractionTimeout { .. }
            | CheckError::Navigation { .. }
            | CheckError::Driver { .. }
            | CheckError::BrowserLaunch { .. }
            | CheckError::Io(_) => Self::InteractionTimeout,
            CheckError::AssertionMismatch { .. } | CheckError::Config { .. } | CheckError::Yaml(_) => {
                Self::AssertionMismatch
            }
        }
    }

    /// Stable snake_case name, as serialized
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolution => "resolution",
            Self::EmptyDropdown => "empty_dropdown",
            Self::StructuralMismatch => "structural_mismatch",
            Self::AssertionMismatch => "assertion_mismatch",
            Self::InteractionTimeout => "interaction_timeout",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Failure category
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
    /// Index of this failure in the sequence
    pub index: usize,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Failure collector owned by one scenario run
///
/// ## Example
///
/// ```
/// use tablecheck::Diagnostics;
///
/// let mut diag = Diagnostics::new();
/// diag.assert_eq(&"3.00%", &"5.00%", "single select");
/// diag.assert_contains("All YTD", "All YTD", "initial trigger text");
/// assert_eq!(diag.failure_count(), 1);
/// assert_eq!(diag.assertion_count(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    failures: Vec<Diagnostic>,
    assertion_count: usize,
}

impl Diagnostics {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert two values are equal
    pub fn assert_eq<T: PartialEq + Debug>(&mut self, actual: &T, expected: &T, step: &str) -> bool {
        self.assertion_count += 1;
        if actual == expected {
            return true;
        }
        self.push(
            DiagnosticKind::AssertionMismatch,
            format!("{step}: expected {expected:?}, got {actual:?}"),
        );
        false
    }

    /// Assert a condition holds
    pub fn assert_true(&mut self, condition: bool, message: impl Into<String>) -> bool {
        self.assertion_count += 1;
        if !condition {
            self.push(DiagnosticKind::AssertionMismatch, message.into());
        }
        condition
    }

    /// Assert a string contains a substring
    pub fn assert_contains(&mut self, haystack: &str, needle: &str, step: &str) -> bool {
        self.assertion_count += 1;
        if haystack.contains(needle) {
            return true;
        }
        self.push(
            DiagnosticKind::AssertionMismatch,
            format!("{step}: expected '{haystack}' to contain '{needle}'"),
        );
        false
    }

    /// Record a non-fatal error
    pub fn record(&mut self, error: &CheckError) {
        self.assertion_count += 1;
        self.push(DiagnosticKind::of(error), error.to_string());
    }

    /// Record a custom failure
    pub fn fail(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.assertion_count += 1;
        self.push(kind, message.into());
    }

    fn push(&mut self, kind: DiagnosticKind, message: String) {
        tracing::warn!(?kind, "{message}");
        let index = self.failures.len();
        self.failures.push(Diagnostic {
            kind,
            message,
            index,
        });
    }

    /// All failures in recording order
    #[must_use]
    pub fn failures(&self) -> &[Diagnostic] {
        &self.failures
    }

    /// Number of failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of checks performed
    #[must_use]
    pub const fn assertion_count(&self) -> usize {
        self.assertion_count
    }

    /// Whether nothing failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether a failure of this kind was recorded
    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.failures.iter().any(|d| d.kind == kind)
    }

    /// Take the recorded failures
    #[must_use]
    pub fn into_failures(self) -> Vec<Diagnostic> {
        self.failures
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod collector_tests {
        use super::*;

        #[test]
        fn test_new_is_empty() {
            let diag = Diagnostics::new();
            assert!(diag.all_passed());
            assert_eq!(diag.failure_count(), 0);
            assert_eq!(diag.assertion_count(), 0);
        }

        #[test]
        fn test_failures_accumulate_in_order() {
            let mut diag = Diagnostics::new();
            assert!(!diag.assert_eq(&1, &2, "first"));
            assert!(diag.assert_true(true, "unused"));
            assert!(!diag.assert_contains("All", "YTD", "second"));
            assert_eq!(diag.failure_count(), 2);
            assert_eq!(diag.assertion_count(), 3);
            assert_eq!(diag.failures()[0].index, 0);
            assert_eq!(diag.failures()[1].index, 1);
            assert!(diag.failures()[1].message.contains("to contain 'YTD'"));
        }

        #[test]
        fn test_record_classifies_errors() {
            let mut diag = Diagnostics::new();
            diag.record(&CheckError::EmptyDropdown {
                control: "ytd".to_string(),
                markup: String::new(),
            });
            diag.record(&CheckError::ColumnNotFound {
                key: "ytd".to_string(),
                headers: vec![],
            });
            assert!(diag.has(DiagnosticKind::EmptyDropdown));
            assert!(diag.has(DiagnosticKind::Resolution));
            assert!(!diag.has(DiagnosticKind::StructuralMismatch));
        }

        #[test]
        fn test_into_failures() {
            let mut diag = Diagnostics::new();
            diag.fail(DiagnosticKind::StructuralMismatch, "item 2 broken");
            let failures = diag.into_failures();
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].to_string(), "item 2 broken");
        }
    }

    mod kind_tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_timeout_kind() {
            let err = CheckError::timeout("dropdown", Duration::from_secs(5));
            assert_eq!(DiagnosticKind::of(&err), DiagnosticKind::InteractionTimeout);
        }

        #[test]
        fn test_mismatch_kind() {
            let err = CheckError::mismatch("step", "a", "b");
            assert_eq!(DiagnosticKind::of(&err), DiagnosticKind::AssertionMismatch);
        }

        #[test]
        fn test_display_matches_serde_name() {
            for kind in [
                DiagnosticKind::Resolution,
                DiagnosticKind::EmptyDropdown,
                DiagnosticKind::StructuralMismatch,
                DiagnosticKind::AssertionMismatch,
                DiagnosticKind::InteractionTimeout,
            ] {
                let json = serde_json::to_string(&kind).unwrap();
                assert_eq!(json, format!("\"{kind}\""));
            }
        }
    }
}
