//! ScenarioRunner
//!
//! A scenario locates one filter control, opens it, checks every dropdown
//! entry against the checkbox/label contract, optionally runs the selection
//! sequence, then closes the dropdown and confirms it closed.
//!
//! Content mismatches accumulate in the scenario's [`Diagnostics`]; the
//! first interaction fault aborts the scenario, captures a screenshot and
//! marks it failed.

use crate::config::SuiteConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::driver::{OptionItem, UiDriver};
use crate::filter::{FilterOption, FilterStateDriver, OptionEntry};
use crate::format::ValueFormat;
use crate::page::{self, TablePage};
use crate::result::{CheckError, CheckResult};
use crate::selectors::FilterControl;
use crate::wait::SettlePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Items whose details are logged even when they pass
const LOGGED_ITEMS: usize = 5;

fn default_true() -> bool {
    true
}

/// One named verification against one filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Scenario name, also used for screenshot file names
    pub name: String,
    /// Key of the column the control filters
    pub column_key: String,
    /// The control to drive
    pub control: FilterControl,
    /// How the column renders raw option values
    #[serde(default)]
    pub format: ValueFormat,
    /// Summary text shown when nothing is checked
    pub all_label: String,
    /// Run the selection sequence after the structural checks
    #[serde(default = "default_true")]
    pub verify_selection: bool,
}

impl ScenarioSpec {
    /// Header multi-select of the flag column, structure only
    #[must_use]
    pub fn flag_filter() -> Self {
        Self {
            name: "flag-filter".to_string(),
            column_key: "countryCode".to_string(),
            control: FilterControl::Header {
                column_key: "countryCode".to_string(),
            },
            format: ValueFormat::Raw,
            all_label: "All Flag".to_string(),
            verify_selection: false,
        }
    }

    /// Global multi-select of the YTD column with the full sequence
    #[must_use]
    pub fn ytd_multiselect() -> Self {
        Self {
            name: "ytd-multiselect".to_string(),
            column_key: "ytd".to_string(),
            control: FilterControl::Global {
                filter_key: "ytd".to_string(),
            },
            format: ValueFormat::Percent { decimals: 2 },
            all_label: "All YTD".to_string(),
            verify_selection: true,
        }
    }

    /// Both built-in scenarios
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![Self::flag_filter(), Self::ytd_multiselect()]
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// No failure recorded and no fault raised
    pub passed: bool,
    /// Every recorded failure, in order
    pub diagnostics: Vec<Diagnostic>,
    /// The fault that aborted the scenario
    pub fatal: Option<String>,
    /// Where the failure screenshot was written
    pub screenshot: Option<PathBuf>,
    /// Number of checks performed
    pub checks: usize,
    /// Wall-clock duration
    pub duration_ms: u64,
}

/// Outcome of a suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Page under test
    pub url: String,
    /// One report per scenario, in run order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Whether every scenario passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.passed)
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| !s.passed).count()
    }
}

/// Runs scenarios against an already loaded page
#[derive(Debug)]
pub struct ScenarioRunner<'d, D: UiDriver> {
    page: TablePage<'d, D>,
    settle: SettlePolicy,
    screenshot_dir: Option<&'d Path>,
}

impl<'d, D: UiDriver> ScenarioRunner<'d, D> {
    /// Runner using the suite's selectors, timeouts and settle policy
    #[must_use]
    pub fn new(driver: &'d D, config: &'d SuiteConfig) -> Self {
        Self {
            page: TablePage::new(driver, &config.selectors, config.timeouts),
            settle: config.settle,
            screenshot_dir: config.screenshot_dir.as_deref(),
        }
    }

    /// Run one scenario to completion; never fails, the report says how it went
    pub async fn run(&self, spec: &ScenarioSpec) -> ScenarioReport {
        let start = Instant::now();
        tracing::info!(scenario = %spec.name, control = %spec.control, "running scenario");
        let mut diag = Diagnostics::new();

        let (fatal, screenshot) = match self.execute(spec, &mut diag).await {
            Ok(()) => (None, None),
            Err(err) => {
                tracing::error!(scenario = %spec.name, "{err}");
                diag.fail(
                    DiagnosticKind::InteractionTimeout,
                    format!("Test script error: {err}"),
                );
                (Some(err.to_string()), self.capture(&spec.name).await)
            }
        };

        let passed = fatal.is_none() && diag.all_passed();
        let checks = diag.assertion_count();
        let report = ScenarioReport {
            name: spec.name.clone(),
            passed,
            diagnostics: diag.into_failures(),
            fatal,
            screenshot,
            checks,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        if report.passed {
            tracing::info!(scenario = %report.name, checks, "scenario passed");
        } else {
            tracing::warn!(
                scenario = %report.name,
                failures = report.diagnostics.len(),
                "scenario failed"
            );
        }
        report
    }

    async fn execute(&self, spec: &ScenarioSpec, diag: &mut Diagnostics) -> CheckResult<()> {
        self.page.wait_ready().await?;
        tracing::info!("table container is ready");

        if let FilterControl::Header { column_key } = &spec.control {
            self.page.wait_header(column_key).await?;
            tracing::info!(column = %column_key, "header cell is visible");
        }

        let mut driver = FilterStateDriver::new(&self.page, spec, self.settle);
        let panel = driver.open().await?;

        let items = self.page.option_items(&panel).await?;
        tracing::info!(count = items.len(), "dropdown items found");

        if items.is_empty() {
            diag.record(&CheckError::EmptyDropdown {
                control: spec.control.to_string(),
                markup: self.page.markup(&panel).await?,
            });
        } else {
            let entries = self.inspect_items(&items, diag).await?;
            if spec.verify_selection {
                driver.run_sequence(&entries, diag).await?;
            }
        }

        driver.close(&panel, diag).await
    }

    /// Check every item against the checkbox/label contract.
    ///
    /// Violations are recorded; entries whose checkbox can be toggled are returned.
    async fn inspect_items(
        &self,
        items: &[OptionItem<D::Element>],
        diag: &mut Diagnostics,
    ) -> CheckResult<Vec<OptionEntry<D::Element>>> {
        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let index = i + 1;
            let checkbox = self.page.checkbox(item).await?;
            let label = self.page.label(item).await?;
            let (Some(checkbox), Some(label)) = (checkbox, label) else {
                diag.record(&CheckError::StructuralMismatch {
                    index,
                    reason: "missing checkbox or label".to_string(),
                    markup: self.page.markup(item).await?,
                });
                continue;
            };

            let checkbox_visible = self.page.is_visible(&checkbox).await?;
            let raw_value = trimmed(self.page.attribute(&checkbox, "value").await?);
            let checkbox_id = self.page.attribute(&checkbox, "id").await?;
            let label_visible = self.page.is_visible(&label).await?;
            let label_text = self.page.text(&label).await?.trim().to_string();
            let label_for = self.page.attribute(&label, "for").await?;

            let mut broken = Vec::new();
            if !checkbox_visible {
                broken.push("checkbox hidden");
            }
            if raw_value.is_empty() {
                broken.push("empty checkbox value");
            }
            if !label_visible {
                broken.push("label hidden");
            }
            if label_text.is_empty() {
                broken.push("empty label text");
            }
            if label_for.is_none() || label_for != checkbox_id {
                broken.push("label 'for' does not match checkbox id");
            }

            if i < LOGGED_ITEMS || !broken.is_empty() {
                tracing::debug!(
                    index,
                    value = %raw_value,
                    id = ?checkbox_id,
                    label = %label_text,
                    label_for = ?label_for,
                    "dropdown item"
                );
            }

            if !broken.is_empty() {
                diag.record(&CheckError::StructuralMismatch {
                    index,
                    reason: broken.join(", "),
                    markup: self.page.markup(item).await?,
                });
                if !checkbox_visible {
                    continue;
                }
            }

            entries.push(OptionEntry {
                option: FilterOption {
                    raw_value,
                    label: label_text,
                    checkbox_id: checkbox_id.unwrap_or_default(),
                },
                checkbox,
            });
        }
        Ok(entries)
    }

    async fn capture(&self, name: &str) -> Option<PathBuf> {
        let dir = self.screenshot_dir?;
        let shot = match self.page.driver().screenshot().await {
            Ok(shot) => shot,
            Err(err) => {
                tracing::warn!("screenshot failed: {err}");
                return None;
            }
        };
        let path = dir.join(format!("{}_error.png", name.replace(['/', '\\', ' '], "_")));
        let written = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, &shot.data).await
        };
        match written.await {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = shot.size_bytes(), "saved screenshot");
                Some(path)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "could not write screenshot: {err}");
                None
            }
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Run the selected scenarios in order, each on a freshly loaded page.
///
/// `names` empty runs every configured scenario.
///
/// # Errors
///
/// Navigation failures and unknown scenario names.
pub async fn run_suite<D: UiDriver>(
    driver: &mut D,
    config: &SuiteConfig,
    names: &[String],
) -> CheckResult<SuiteReport> {
    let selected = config.select(names)?;

    let mut scenarios = Vec::with_capacity(selected.len());
    for spec in selected {
        page::open(driver, &config.url, &config.timeouts).await?;
        let runner = ScenarioRunner::new(&*driver, config);
        scenarios.push(runner.run(spec).await);
    }
    Ok(SuiteReport {
        url: config.url.clone(),
        scenarios,
    })
}
