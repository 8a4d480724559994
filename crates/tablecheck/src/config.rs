//! Suite configuration
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! runs the two built-in scenarios against `http://localhost:8000/demo.html`.
//!
//! ```yaml
//! url: http://localhost:8000/demo.html
//! timeouts:
//!   ready_ms: 20000
//! settle:
//!   mode: fixed
//!   delay_ms: 1000
//!   close_delay_ms: 200
//! scenarios:
//!   - name: ytd-multiselect
//!     column_key: ytd
//!     control: { kind: global, filter_key: ytd }
//!     format: { kind: percent, decimals: 2 }
//!     all_label: All YTD
//! ```

use crate::result::{CheckError, CheckResult};
use crate::scenario::ScenarioSpec;
use crate::selectors::WidgetSelectors;
use crate::wait::{SettlePolicy, Timeouts};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Page the built-in scenarios target
pub const DEFAULT_URL: &str = "http://localhost:8000/demo.html";

/// Configuration of one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Page under test
    pub url: String,
    /// Bounded waits
    pub timeouts: Timeouts,
    /// Settle points after actions
    pub settle: SettlePolicy,
    /// Where failure screenshots go; `None` disables them
    pub screenshot_dir: Option<PathBuf>,
    /// Widget DOM vocabulary
    pub selectors: WidgetSelectors,
    /// Scenarios in run order
    pub scenarios: Vec<ScenarioSpec>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeouts: Timeouts::default(),
            settle: SettlePolicy::default(),
            screenshot_dir: Some(PathBuf::from(".")),
            selectors: WidgetSelectors::default(),
            scenarios: ScenarioSpec::builtins(),
        }
    }
}

impl SuiteConfig {
    /// Parse and validate YAML.
    ///
    /// # Errors
    ///
    /// Malformed YAML or an invalid configuration.
    pub fn from_yaml(yaml: &str) -> CheckResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    ///
    /// # Errors
    ///
    /// Unreadable file, malformed YAML or an invalid configuration.
    pub fn load(path: &Path) -> CheckResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_yaml(&yaml)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> CheckResult<()> {
        if self.url.trim().is_empty() {
            return Err(config_error("url must not be empty"));
        }
        if self.scenarios.is_empty() {
            return Err(config_error("at least one scenario is required"));
        }
        let mut seen = HashSet::new();
        for spec in &self.scenarios {
            if spec.name.trim().is_empty() {
                return Err(config_error("scenario name must not be empty"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(config_error(format!("duplicate scenario '{}'", spec.name)));
            }
            if spec.column_key.trim().is_empty() {
                return Err(config_error(format!(
                    "scenario '{}' has an empty column_key",
                    spec.name
                )));
            }
        }
        if let SettlePolicy::UntilStable {
            interval_ms: 0, ..
        } = self.settle
        {
            return Err(config_error("settle interval_ms must be positive"));
        }
        Ok(())
    }

    /// Scenarios named in `names`, in the order given; all when empty.
    ///
    /// # Errors
    ///
    /// A name with no configured scenario.
    pub fn select(&self, names: &[String]) -> CheckResult<Vec<&ScenarioSpec>> {
        if names.is_empty() {
            return Ok(self.scenarios.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.scenarios
                    .iter()
                    .find(|s| &s.name == name)
                    .ok_or_else(|| {
                        let known: Vec<_> = self.scenarios.iter().map(|s| s.name.as_str()).collect();
                        config_error(format!(
                            "unknown scenario '{name}' (available: {})",
                            known.join(", ")
                        ))
                    })
            })
            .collect()
    }
}

fn config_error(message: impl Into<String>) -> CheckError {
    CheckError::Config {
        message: message.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::format::ValueFormat;
    use crate::selectors::FilterControl;
    use std::io::Write;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_empty_document_uses_defaults() {
            let config = SuiteConfig::from_yaml("{}").unwrap();
            assert_eq!(config, SuiteConfig::default());
            assert_eq!(config.url, DEFAULT_URL);
            assert_eq!(config.scenarios.len(), 2);
        }

        #[test]
        fn test_partial_overrides() {
            let yaml = r"
url: http://example.test/table.html
timeouts:
  ready_ms: 20000
settle:
  mode: fixed
  delay_ms: 500
  close_delay_ms: 100
screenshot_dir: null
selectors:
  container_id: other-table
";
            let config = SuiteConfig::from_yaml(yaml).unwrap();
            assert_eq!(config.url, "http://example.test/table.html");
            assert_eq!(config.timeouts.ready_ms, 20_000);
            assert_eq!(config.timeouts.load_ms, 60_000);
            assert_eq!(
                config.settle,
                SettlePolicy::Fixed {
                    delay_ms: 500,
                    close_delay_ms: 100
                }
            );
            assert!(config.screenshot_dir.is_none());
            assert_eq!(config.selectors.container_id, "other-table");
            assert_eq!(config.selectors.ready_class, "dynamic-table-wrapper");
        }

        #[test]
        fn test_custom_scenario() {
            let yaml = r"
scenarios:
  - name: sector
    column_key: sector
    control: { kind: header, column_key: sector }
    format: { kind: raw }
    all_label: All Sector
    verify_selection: false
";
            let config = SuiteConfig::from_yaml(yaml).unwrap();
            assert_eq!(config.scenarios.len(), 1);
            let spec = &config.scenarios[0];
            assert_eq!(spec.format, ValueFormat::Raw);
            assert_eq!(
                spec.control,
                FilterControl::Header {
                    column_key: "sector".to_string()
                }
            );
        }

        #[test]
        fn test_malformed_yaml() {
            let err = SuiteConfig::from_yaml("url: [unterminated").unwrap_err();
            assert!(matches!(err, CheckError::Yaml(_)));
        }

        #[test]
        fn test_load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "url: http://localhost:9000/").unwrap();
            let config = SuiteConfig::load(file.path()).unwrap();
            assert_eq!(config.url, "http://localhost:9000/");
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let err = SuiteConfig::load(Path::new("/nonexistent/tablecheck.yaml")).unwrap_err();
            assert!(matches!(err, CheckError::Io(_)));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_rejects_duplicates() {
            let mut config = SuiteConfig::default();
            config.scenarios.push(ScenarioSpec::flag_filter());
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("duplicate scenario 'flag-filter'"));
        }

        #[test]
        fn test_rejects_empty_scenarios() {
            assert!(SuiteConfig::from_yaml("scenarios: []").is_err());
        }

        #[test]
        fn test_rejects_zero_interval() {
            let yaml = "settle: { mode: until_stable, interval_ms: 0, max_wait_ms: 100 }";
            assert!(SuiteConfig::from_yaml(yaml).is_err());
        }
    }

    mod select_tests {
        use super::*;

        #[test]
        fn test_select_all_when_empty() {
            let config = SuiteConfig::default();
            assert_eq!(config.select(&[]).unwrap().len(), 2);
        }

        #[test]
        fn test_select_keeps_requested_order() {
            let config = SuiteConfig::default();
            let names = vec!["ytd-multiselect".to_string(), "flag-filter".to_string()];
            let picked: Vec<_> = config
                .select(&names)
                .unwrap()
                .into_iter()
                .map(|s| s.name.as_str())
                .collect();
            assert_eq!(picked, vec!["ytd-multiselect", "flag-filter"]);
        }

        #[test]
        fn test_unknown_name_lists_available() {
            let err = SuiteConfig::default()
                .select(&["nope".to_string()])
                .unwrap_err();
            assert!(err.to_string().contains("available: flag-filter, ytd-multiselect"));
        }
    }
}
