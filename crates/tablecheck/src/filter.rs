//! FilterStateDriver
//!
//! Drives one multi-select control through
//! `Closed -> Open -> {check/uncheck}* -> Closed` and, after every action,
//! compares the trigger's summary text and the filtered column against what
//! the current [`SelectionState`] implies.
//!
//! Sequence run by [`FilterStateDriver::run_sequence`]:
//!
//! ```text
//! initial      all-label, unfiltered snapshot
//! select one   summary names v1, every cell == f(v1)
//! select two   summary names v1 and v2, every cell in {f(v1), f(v2)}
//! select three summary "3 selected" (only with more than two options), undone
//! deselect two summary names v1, every cell == f(v1)
//! clear        all-label, snapshot equals the initial one
//! ```
//!
//! Mismatches are recorded in [`Diagnostics`]; driver faults propagate.

use crate::column::ColumnResolver;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::driver::{Checkbox, OptionsPanel, UiDriver};
use crate::format::ValueFormatter;
use crate::page::TablePage;
use crate::result::{CheckError, CheckResult};
use crate::scenario::ScenarioSpec;
use crate::snapshot::{ColumnSnapshot, RowSnapshot, TableSnapshotReader};
use crate::wait::SettlePolicy;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Data of one dropdown entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Trimmed checkbox value
    pub raw_value: String,
    /// Trimmed label text
    pub label: String,
    /// Checkbox `id`
    pub checkbox_id: String,
}

/// A dropdown entry together with its checkbox handle
#[derive(Debug)]
pub struct OptionEntry<E> {
    /// Extracted data
    pub option: FilterOption,
    /// Handle used to toggle the entry
    pub checkbox: Checkbox<E>,
}

/// Raw values currently checked in one control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    checked: BTreeSet<String>,
}

impl SelectionState {
    /// Mark a value checked; false if it already was
    pub fn check(&mut self, raw: &str) -> bool {
        self.checked.insert(raw.to_string())
    }

    /// Mark a value unchecked; false if it was not checked
    pub fn uncheck(&mut self, raw: &str) -> bool {
        self.checked.remove(raw)
    }

    /// Whether `raw` is checked
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.checked.contains(raw)
    }

    /// Number of checked values
    #[must_use]
    pub fn len(&self) -> usize {
        self.checked.len()
    }

    /// Whether nothing is checked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Checked values in dropdown order
    #[must_use]
    pub fn in_order<'a, E>(&self, options: &'a [OptionEntry<E>]) -> Vec<&'a str> {
        options
            .iter()
            .map(|e| e.option.raw_value.as_str())
            .filter(|v| self.contains(v))
            .collect()
    }
}

/// What the trigger's summary text must show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryExpectation {
    /// Nothing checked: the all-label
    All(String),
    /// One or two checked: the raw values, comma-joined
    Values(Vec<String>),
    /// Three or more checked: `<n> selected`
    Count(usize),
}

impl SummaryExpectation {
    /// Expectation for checked values given in dropdown order
    #[must_use]
    pub fn for_selection(all_label: &str, checked: &[&str]) -> Self {
        match checked.len() {
            0 => Self::All(all_label.to_string()),
            1 | 2 => Self::Values(checked.iter().map(|v| (*v).to_string()).collect()),
            n => Self::Count(n),
        }
    }

    /// Whether trigger text satisfies the expectation
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::All(label) => text.contains(label.as_str()),
            Self::Values(values) => {
                values.iter().all(|v| text.contains(v.as_str()))
                    && (values.len() < 2 || text.contains(','))
            }
            Self::Count(n) => text.contains(&format!("{n} selected")),
        }
    }
}

impl fmt::Display for SummaryExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All(label) => write!(f, "text containing '{label}'"),
            Self::Values(values) => write!(f, "text naming '{}'", values.join(", ")),
            Self::Count(n) => write!(f, "text containing '{n} selected'"),
        }
    }
}

/// Drives one filter control for one scenario
#[derive(Debug)]
pub struct FilterStateDriver<'p, 'd, D: UiDriver> {
    page: &'p TablePage<'d, D>,
    spec: &'p ScenarioSpec,
    formatter: ValueFormatter,
    settle: SettlePolicy,
    selection: SelectionState,
    column_reported: bool,
}

impl<'p, 'd, D: UiDriver> FilterStateDriver<'p, 'd, D> {
    /// Driver for the control named by `spec`
    #[must_use]
    pub fn new(page: &'p TablePage<'d, D>, spec: &'p ScenarioSpec, settle: SettlePolicy) -> Self {
        Self {
            page,
            spec,
            formatter: ValueFormatter::new(spec.format),
            settle,
            selection: SelectionState::default(),
            column_reported: false,
        }
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Click the trigger and wait for the option panel.
    ///
    /// A panel that never appears is an interaction timeout.
    pub async fn open(&self) -> CheckResult<OptionsPanel<D::Element>> {
        let trigger = self.page.trigger(&self.spec.control).await?;
        self.page.toggle(&trigger).await?;
        let panel = self.page.wait_options_open(&self.spec.control).await?;
        tracing::info!(control = %self.spec.control, "dropdown open");
        Ok(panel)
    }

    /// Click the trigger again and assert the panel is hidden
    pub async fn close(
        &self,
        panel: &OptionsPanel<D::Element>,
        diag: &mut Diagnostics,
    ) -> CheckResult<()> {
        let trigger = self.page.trigger(&self.spec.control).await?;
        self.page.toggle(&trigger).await?;
        match self.settle {
            SettlePolicy::Fixed { close_delay_ms, .. } => {
                self.page.pause(Duration::from_millis(close_delay_ms)).await;
            }
            SettlePolicy::UntilStable { interval_ms, .. } => {
                for _ in 0..self.settle.max_polls() {
                    if !self.page.is_visible(panel).await? {
                        break;
                    }
                    self.page.pause(Duration::from_millis(interval_ms)).await;
                }
            }
        }
        let still_open = self.page.is_visible(panel).await?;
        if diag.assert_true(
            !still_open,
            "Dropdown did not close after clicking trigger again",
        ) {
            tracing::info!(control = %self.spec.control, "dropdown closed");
        }
        Ok(())
    }

    /// Run the selection sequence over the entries of an open dropdown.
    ///
    /// Leaves the selection empty when it completes.
    pub async fn run_sequence(
        &mut self,
        options: &[OptionEntry<D::Element>],
        diag: &mut Diagnostics,
    ) -> CheckResult<()> {
        let Some(first) = options.first() else {
            diag.record(&CheckError::EmptyDropdown {
                control: self.spec.control.to_string(),
                markup: String::new(),
            });
            return Ok(());
        };

        let initial_label = self.trigger_text().await?;
        diag.assert_contains(&initial_label, &self.spec.all_label, "Initial trigger text");

        let initial = self.read_column("initial", diag).await?;
        if let Some(snapshot) = &initial {
            diag.assert_true(
                !snapshot.is_empty(),
                format!("Could not retrieve initial {} data from table", self.spec.column_key),
            );
        }
        let initial = initial.unwrap_or_default();

        let v1 = &first.option;
        if !diag.assert_true(
            !v1.label.is_empty() && !v1.raw_value.is_empty(),
            "First dropdown item lacks label text or checkbox value",
        ) {
            return Ok(());
        }

        self.select(first).await?;
        self.verify("select one", options, &initial, diag).await?;

        if let Some(second) = options.get(1) {
            self.select(second).await?;
            self.verify("select two", options, &initial, diag).await?;

            if let Some(third) = options.get(2) {
                self.select(third).await?;
                self.verify("select three", options, &initial, diag).await?;
                self.deselect(third).await?;
                self.verify_summary("deselect third", options, diag).await?;
            }

            self.deselect(second).await?;
            self.verify("deselect second", options, &initial, diag).await?;
        }

        self.deselect(first).await?;
        self.verify_summary("clear", options, diag).await?;
        if let Some(cleared) = self.read_column("clear", diag).await? {
            if diag.assert_eq(&cleared.len(), &initial.len(), "clear: row count") {
                diag.assert_eq(&cleared.values(), &initial.values(), "clear: row values");
            }
        }
        Ok(())
    }

    async fn select(&mut self, entry: &OptionEntry<D::Element>) -> CheckResult<()> {
        tracing::info!(
            raw = %entry.option.raw_value,
            expected = %self.formatter.format(&entry.option.raw_value),
            "checking option"
        );
        self.page.check(&entry.checkbox).await?;
        self.selection.check(&entry.option.raw_value);
        self.settle().await
    }

    async fn deselect(&mut self, entry: &OptionEntry<D::Element>) -> CheckResult<()> {
        tracing::info!(raw = %entry.option.raw_value, "unchecking option");
        self.page.uncheck(&entry.checkbox).await?;
        self.selection.uncheck(&entry.option.raw_value);
        self.settle().await
    }

    /// Summary and rows after a selection change
    async fn verify(
        &mut self,
        step: &str,
        options: &[OptionEntry<D::Element>],
        initial: &ColumnSnapshot,
        diag: &mut Diagnostics,
    ) -> CheckResult<()> {
        self.verify_summary(step, options, diag).await?;
        let Some(snapshot) = self.read_column(step, diag).await? else {
            return Ok(());
        };

        let selected = self.selection.in_order(options);
        let expected = self.formatter.format_all(&selected);
        tracing::debug!(step, ?expected, actual = ?snapshot.values(), "comparing rows");

        if snapshot.is_empty() && !initial.is_empty() {
            diag.fail(
                DiagnosticKind::AssertionMismatch,
                format!("{step}: no data shown after filtering for {expected:?}"),
            );
        }
        let outside = snapshot.outside(&expected);
        if !outside.is_empty() {
            diag.record(&CheckError::mismatch(
                step,
                format!("only {expected:?}"),
                format!("{outside:?}"),
            ));
        }
        for value in &expected {
            if initial.contains(value) && !snapshot.contains(value) {
                diag.record(&CheckError::mismatch(
                    step,
                    format!("at least one row showing '{value}'"),
                    "none",
                ));
            }
        }
        Ok(())
    }

    async fn verify_summary(
        &self,
        step: &str,
        options: &[OptionEntry<D::Element>],
        diag: &mut Diagnostics,
    ) -> CheckResult<()> {
        let checked = self.selection.in_order(options);
        let expected = SummaryExpectation::for_selection(&self.spec.all_label, &checked);
        let text = self.trigger_text().await?;
        tracing::debug!(step, text = %text, "trigger text");
        if !expected.matches(&text) {
            diag.record(&CheckError::mismatch(
                format!("{step}: trigger text"),
                expected.to_string(),
                format!("'{text}'"),
            ));
        }
        Ok(())
    }

    async fn trigger_text(&self) -> CheckResult<String> {
        let trigger = self.page.trigger(&self.spec.control).await?;
        Ok(self.page.text(&trigger).await?.trim().to_string())
    }

    /// Resolve the column afresh and read it.
    ///
    /// `None` when the column is not visible; the step is marked failed.
    async fn read_column(
        &mut self,
        step: &str,
        diag: &mut Diagnostics,
    ) -> CheckResult<Option<ColumnSnapshot>> {
        let index = match ColumnResolver::new(self.page).resolve(&self.spec.column_key).await {
            Ok(index) => index,
            Err(err @ CheckError::ColumnNotFound { .. }) => {
                if !self.column_reported {
                    diag.record(&err);
                    self.column_reported = true;
                }
                diag.fail(
                    DiagnosticKind::Resolution,
                    format!(
                        "{step}: rows not verified, column '{}' unresolved",
                        self.spec.column_key
                    ),
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let snapshot = TableSnapshotReader::new(self.page).read(index).await?;
        for short in snapshot.short_rows() {
            diag.fail(
                DiagnosticKind::Resolution,
                format!(
                    "{step}: row {} has {} visible cells, column index {index} out of bounds",
                    short.row, short.visible_cells
                ),
            );
        }
        Ok(Some(snapshot))
    }

    async fn fingerprint(&self) -> CheckResult<(String, Vec<RowSnapshot>)> {
        let label = self.trigger_text().await?;
        let rows = TableSnapshotReader::new(self.page).read_rows().await?;
        Ok((label, rows))
    }

    async fn settle(&self) -> CheckResult<()> {
        match self.settle {
            SettlePolicy::Fixed { delay_ms, .. } => {
                self.page.pause(Duration::from_millis(delay_ms)).await;
            }
            SettlePolicy::UntilStable {
                interval_ms,
                max_wait_ms,
            } => {
                let mut last = self.fingerprint().await?;
                for _ in 1..self.settle.max_polls() {
                    self.page.pause(Duration::from_millis(interval_ms)).await;
                    let next = self.fingerprint().await?;
                    if next == last {
                        return Ok(());
                    }
                    last = next;
                }
                tracing::warn!(max_wait_ms, "table did not settle, continuing");
            }
        }
        Ok(())
    }
}
