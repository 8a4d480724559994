//! In-memory rendition of the table widget.
//!
//! [`MockTable`] implements [`UiDriver`] by simulating the DOM the widget
//! renders: header cells (some hidden), body rows with placeholder rows when
//! nothing matches, per-column and global multi-select dropdowns with
//! checkbox/label items, and the summary label rules. Waits never sleep; they
//! advance a simulated clock so tests stay fast and deterministic.
//!
//! [`MockFaults`] injects widget defects so failure paths can be exercised.

use crate::driver::{Screenshot, UiDriver};
use crate::format::ValueFormatter;
use crate::result::{CheckError, CheckResult};
use crate::selectors::{FilterControl, WidgetSelectors};
use crate::wait::LoadState;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// How a column renders its raw values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// Raw value as-is
    Text,
    /// `value * 100` with the given fraction digits and a `%` suffix
    Percent(usize),
}

/// Column definition of the simulated table
#[derive(Debug, Clone)]
pub struct MockColumn {
    key: String,
    header: String,
    visible: bool,
    format: CellFormat,
}

impl MockColumn {
    /// Plain text column
    #[must_use]
    pub fn text(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            visible: true,
            format: CellFormat::Text,
        }
    }

    /// Percentage column
    #[must_use]
    pub fn percent(key: impl Into<String>, header: impl Into<String>, decimals: usize) -> Self {
        Self {
            format: CellFormat::Percent(decimals),
            ..Self::text(key, header)
        }
    }

    /// Start hidden
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn render(&self, raw: &str) -> String {
        match self.format {
            CellFormat::Text => raw.to_string(),
            CellFormat::Percent(decimals) => ValueFormatter::percent(decimals).format(raw),
        }
    }
}

/// Widget defects to simulate
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MockFaults {
    /// Option position whose label points at the wrong checkbox id
    pub mislabeled_option: Option<usize>,
    /// Option position whose checkbox has an empty value
    pub blank_value_option: Option<usize>,
    /// Checking options does not filter rows
    pub ignore_filters: bool,
    /// Clicking an open trigger leaves the dropdown open
    pub sticky_dropdown: bool,
    /// Summary shows a count for any non-empty selection
    pub count_summary: bool,
    /// Container never receives its ready class
    pub never_ready: bool,
    /// Dropdowns render no option items
    pub empty_options: bool,
    /// Uncheck calls that time out before the widget responds again
    pub uncheck_timeouts: usize,
}

#[derive(Debug)]
struct MockFilter {
    control: FilterControl,
    column: usize,
    options: Vec<String>,
    checked: BTreeSet<usize>,
    open: bool,
}

#[derive(Debug)]
struct MockState {
    url: String,
    columns: Vec<MockColumn>,
    rows: Vec<Vec<String>>,
    filters: Vec<MockFilter>,
    loading: bool,
    faults: MockFaults,
    history: Vec<String>,
    clock: Duration,
    screenshots: usize,
}

/// Simulated DOM node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockElement {
    /// Root container
    Container,
    /// Header cell by column position
    Header(usize),
    /// Body row by data position
    Row(usize),
    /// Placeholder row
    PlaceholderRow,
    /// Data cell
    Cell {
        /// Data position
        row: usize,
        /// Column position
        col: usize,
    },
    /// Placeholder cell
    PlaceholderCell,
    /// Filter trigger
    Trigger(usize),
    /// Filter option panel
    Options(usize),
    /// Option entry
    Item {
        /// Filter position
        filter: usize,
        /// Option position
        option: usize,
    },
    /// Option checkbox
    Checkbox {
        /// Filter position
        filter: usize,
        /// Option position
        option: usize,
    },
    /// Option label
    Label {
        /// Filter position
        filter: usize,
        /// Option position
        option: usize,
    },
}

/// Builder for [`MockTable`]
#[derive(Debug, Default)]
pub struct MockTableBuilder {
    selectors: WidgetSelectors,
    columns: Vec<MockColumn>,
    rows: Vec<Vec<String>>,
    filters: Vec<FilterControl>,
    faults: MockFaults,
    loading: bool,
}

impl MockTableBuilder {
    /// Add a column
    #[must_use]
    pub fn column(mut self, column: MockColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a data row of raw values, one per column
    #[must_use]
    pub fn row(mut self, values: &[&str]) -> Self {
        self.rows
            .push(values.iter().map(|v| (*v).to_string()).collect());
        self
    }

    /// Add a multi-select in the header of `key`
    #[must_use]
    pub fn header_filter(mut self, key: impl Into<String>) -> Self {
        self.filters.push(FilterControl::Header {
            column_key: key.into(),
        });
        self
    }

    /// Add a multi-select in the global filter bar for `key`
    #[must_use]
    pub fn global_filter(mut self, key: impl Into<String>) -> Self {
        self.filters.push(FilterControl::Global {
            filter_key: key.into(),
        });
        self
    }

    /// Inject widget defects
    #[must_use]
    pub fn faults(mut self, faults: MockFaults) -> Self {
        self.faults = faults;
        self
    }

    /// Use a custom selector vocabulary
    #[must_use]
    pub fn selectors(mut self, selectors: WidgetSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Start in the loading state
    #[must_use]
    pub const fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    /// Build the table; filters on unknown columns are dropped
    #[must_use]
    pub fn build(self) -> MockTable {
        let filters = self
            .filters
            .into_iter()
            .filter_map(|control| {
                let column = self.columns.iter().position(|c| c.key == control.key())?;
                let options = unique_sorted(self.rows.iter().filter_map(|r| r.get(column)));
                Some(MockFilter {
                    control,
                    column,
                    options,
                    checked: BTreeSet::new(),
                    open: false,
                })
            })
            .collect();
        MockTable {
            selectors: self.selectors,
            state: Mutex::new(MockState {
                url: "about:blank".to_string(),
                columns: self.columns,
                rows: self.rows,
                filters,
                loading: self.loading,
                faults: self.faults,
                history: Vec::new(),
                clock: Duration::ZERO,
                screenshots: 0,
            }),
        }
    }
}

/// Numeric values sort numerically, anything else lexically, as the widget does
fn unique_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut unique: Vec<String> = values
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if unique.iter().all(|v| v.parse::<f64>().is_ok()) {
        unique.sort_by(|a, b| {
            let (x, y) = (a.parse::<f64>(), b.parse::<f64>());
            match (x, y) {
                (Ok(x), Ok(y)) => x.total_cmp(&y),
                _ => a.cmp(b),
            }
        });
    }
    unique
}

/// Simulated table widget
#[derive(Debug)]
pub struct MockTable {
    selectors: WidgetSelectors,
    state: Mutex<MockState>,
}

impl MockTable {
    /// Start building a table
    #[must_use]
    pub fn builder() -> MockTableBuilder {
        MockTableBuilder::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recorded driver calls
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Whether a call with this prefix was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(prefix))
    }

    /// Simulated time spent in waits
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.lock().clock
    }

    /// Number of screenshots captured
    #[must_use]
    pub fn screenshots_taken(&self) -> usize {
        self.lock().screenshots
    }

    /// Last navigated URL
    #[must_use]
    pub fn current_url(&self) -> String {
        self.lock().url.clone()
    }

    /// Raw values currently checked in the filter for `key`
    #[must_use]
    pub fn checked_values(&self, key: &str) -> Vec<String> {
        let state = self.lock();
        state
            .filters
            .iter()
            .find(|f| f.control.key() == key)
            .map(|f| f.checked.iter().map(|&i| f.options[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Whether the dropdown for `key` is open
    #[must_use]
    pub fn is_open(&self, key: &str) -> bool {
        self.lock()
            .filters
            .iter()
            .any(|f| f.control.key() == key && f.open)
    }

    /// Toggle the loading placeholder
    pub fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    /// Show or hide a column
    pub fn set_column_visible(&self, key: &str, visible: bool) {
        let mut state = self.lock();
        if let Some(col) = state.columns.iter_mut().find(|c| c.key == key) {
            col.visible = visible;
        }
    }

    fn query(&self, state: &MockState, selector: &str) -> Vec<MockElement> {
        let s = &self.selectors;
        if selector == s.container_ready() {
            return if state.faults.never_ready {
                vec![]
            } else {
                vec![MockElement::Container]
            };
        }
        if selector == s.header_cells() {
            return (0..state.columns.len()).map(MockElement::Header).collect();
        }
        if selector == s.body_rows() {
            let shown = state.displayed_rows();
            return if state.loading || shown.is_empty() {
                vec![MockElement::PlaceholderRow]
            } else {
                shown.into_iter().map(MockElement::Row).collect()
            };
        }
        if let Some(col) = state
            .columns
            .iter()
            .position(|c| s.header_cell(&c.key) == selector)
        {
            return vec![MockElement::Header(col)];
        }
        for (i, f) in state.filters.iter().enumerate() {
            if selector == s.trigger(&f.control) {
                return vec![MockElement::Trigger(i)];
            }
            if selector == s.options_panel(&f.control) {
                return vec![MockElement::Options(i)];
            }
        }
        vec![]
    }

    fn query_within(&self, state: &MockState, parent: MockElement, selector: &str) -> Vec<MockElement> {
        let s = &self.selectors;
        match parent {
            MockElement::Row(row) if selector == s.row_cells() => (0..state.columns.len())
                .map(|col| MockElement::Cell { row, col })
                .collect(),
            MockElement::PlaceholderRow if selector == s.row_cells() => {
                vec![MockElement::PlaceholderCell]
            }
            MockElement::Options(filter) if selector == s.option_items() => {
                if state.faults.empty_options {
                    return vec![];
                }
                (0..state.filters[filter].options.len())
                    .map(|option| MockElement::Item { filter, option })
                    .collect()
            }
            MockElement::Item { filter, option } if selector == s.item_checkbox() => {
                vec![MockElement::Checkbox { filter, option }]
            }
            MockElement::Item { filter, option } if selector == s.item_label() => {
                vec![MockElement::Label { filter, option }]
            }
            _ => vec![],
        }
    }

    fn checkbox_id(&self, state: &MockState, filter: usize, option: usize) -> String {
        let f = &state.filters[filter];
        format!(
            "dt-gms-{}-{}-{}",
            self.selectors.container_id,
            f.control.key(),
            f.options[option].replace(char::is_whitespace, "-")
        )
    }

    fn item_markup(&self, state: &MockState, filter: usize, option: usize) -> String {
        let id = self.checkbox_id(state, filter, option);
        let label_for = if state.faults.mislabeled_option == Some(option) {
            format!("{id}-x")
        } else {
            id.clone()
        };
        let value = if state.faults.blank_value_option == Some(option) {
            ""
        } else {
            &state.filters[filter].options[option]
        };
        format!(
            "<input type=\"checkbox\" id=\"{id}\" value=\"{value}\"><label for=\"{label_for}\">{}</label>",
            state.filters[filter].options[option]
        )
    }

    fn set_checked(state: &mut MockState, element: MockElement, checked: bool) -> CheckResult<()> {
        let MockElement::Checkbox { filter, option } = element else {
            return Err(CheckError::driver(format!("{element:?} is not a checkbox")));
        };
        if !state.filters[filter].open {
            return Err(CheckError::driver(format!("{element:?} is not visible")));
        }
        let set = &mut state.filters[filter].checked;
        if checked {
            set.insert(option);
        } else {
            set.remove(&option);
        }
        Ok(())
    }
}

impl MockState {
    fn displayed_rows(&self) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&i| self.faults.ignore_filters || self.row_matches(i))
            .collect()
    }

    fn row_matches(&self, row: usize) -> bool {
        self.filters.iter().all(|f| {
            f.checked.is_empty()
                || self.rows[row]
                    .get(f.column)
                    .is_some_and(|v| f.checked.iter().any(|&o| f.options[o] == v.trim()))
        })
    }

    fn summary(&self, filter: usize) -> String {
        let f = &self.filters[filter];
        let n = f.checked.len();
        if n == 0 {
            format!("All {}", self.columns[f.column].header)
        } else if n <= 2 && !self.faults.count_summary {
            f.checked
                .iter()
                .map(|&o| f.options[o].as_str())
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            format!("{n} selected")
        }
    }

    fn trigger_visible(&self, filter: usize) -> bool {
        let f = &self.filters[filter];
        match f.control {
            FilterControl::Header { .. } => self.columns[f.column].visible,
            FilterControl::Global { .. } => true,
        }
    }

    fn visible(&self, element: MockElement) -> bool {
        match element {
            MockElement::Container => !self.faults.never_ready,
            MockElement::Header(col) => self.columns[col].visible,
            MockElement::Row(row) => !self.loading && self.displayed_rows().contains(&row),
            MockElement::Cell { row, col } => {
                self.visible(MockElement::Row(row)) && self.columns[col].visible
            }
            MockElement::PlaceholderRow | MockElement::PlaceholderCell => true,
            MockElement::Trigger(f) => self.trigger_visible(f),
            MockElement::Options(f)
            | MockElement::Item { filter: f, .. }
            | MockElement::Checkbox { filter: f, .. }
            | MockElement::Label { filter: f, .. } => self.filters[f].open,
        }
    }
}

#[async_trait]
impl UiDriver for MockTable {
    type Element = MockElement;

    async fn navigate(
        &mut self,
        url: &str,
        wait_until: LoadState,
        _timeout: Duration,
    ) -> CheckResult<()> {
        let mut state = self.lock();
        state.history.push(format!("navigate:{url}:{wait_until}"));
        state.url = url.to_string();
        for filter in &mut state.filters {
            filter.open = false;
            filter.checked.clear();
        }
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> CheckResult<MockElement> {
        let mut state = self.lock();
        state.history.push(format!("wait_for_visible:{selector}"));
        let found = self
            .query(&state, selector)
            .into_iter()
            .find(|&e| state.visible(e));
        match found {
            Some(e) => Ok(e),
            None => {
                state.clock += timeout;
                Err(CheckError::timeout(format!("'{selector}' to be visible"), timeout))
            }
        }
    }

    async fn locate_all(&self, selector: &str) -> CheckResult<Vec<MockElement>> {
        let state = self.lock();
        Ok(self.query(&state, selector))
    }

    async fn locate_within(
        &self,
        parent: &MockElement,
        selector: &str,
    ) -> CheckResult<Vec<MockElement>> {
        let state = self.lock();
        Ok(self.query_within(&state, *parent, selector))
    }

    async fn is_visible(&self, element: &MockElement) -> CheckResult<bool> {
        Ok(self.lock().visible(*element))
    }

    async fn text_content(&self, element: &MockElement) -> CheckResult<String> {
        let state = self.lock();
        let text = match *element {
            MockElement::Header(col) => state.columns[col].header.clone(),
            MockElement::Cell { row, col } => {
                let raw = state.rows[row].get(col).map_or("", String::as_str);
                state.columns[col].render(raw)
            }
            MockElement::PlaceholderCell => {
                if state.loading {
                    "Loading...".to_string()
                } else {
                    "No results found.".to_string()
                }
            }
            MockElement::Trigger(f) => format!(" {} ", state.summary(f)),
            MockElement::Label { filter, option } | MockElement::Item { filter, option } => {
                state.filters[filter].options[option].clone()
            }
            _ => String::new(),
        };
        Ok(text)
    }

    async fn attribute(&self, element: &MockElement, name: &str) -> CheckResult<Option<String>> {
        let state = self.lock();
        let value = match (*element, name) {
            (MockElement::Header(col), n) if n == self.selectors.column_key_attr => {
                Some(state.columns[col].key.clone())
            }
            (MockElement::Checkbox { filter, option }, "value") => {
                if state.faults.blank_value_option == Some(option) {
                    Some(String::new())
                } else {
                    Some(state.filters[filter].options[option].clone())
                }
            }
            (MockElement::Checkbox { filter, option }, "id") => {
                Some(self.checkbox_id(&state, filter, option))
            }
            (MockElement::Checkbox { .. }, "type") => Some("checkbox".to_string()),
            (MockElement::Label { filter, option }, "for") => {
                let id = self.checkbox_id(&state, filter, option);
                if state.faults.mislabeled_option == Some(option) {
                    Some(format!("{id}-x"))
                } else {
                    Some(id)
                }
            }
            _ => None,
        };
        Ok(value)
    }

    async fn inner_html(&self, element: &MockElement) -> CheckResult<String> {
        let state = self.lock();
        let html = match *element {
            MockElement::Item { filter, option } => self.item_markup(&state, filter, option),
            MockElement::Options(filter) if !state.faults.empty_options => {
                let count = state.filters[filter].options.len();
                (0..count)
                    .map(|o| {
                        format!(
                            "<div class=\"{}\">{}</div>",
                            self.selectors.option_item,
                            self.item_markup(&state, filter, o)
                        )
                    })
                    .collect()
            }
            MockElement::Options(_) => {
                "<span class=\"dt-no-options\">No options</span>".to_string()
            }
            _ => String::new(),
        };
        Ok(html)
    }

    async fn click(&self, element: &MockElement) -> CheckResult<()> {
        let mut state = self.lock();
        state.history.push(format!("click:{element:?}"));
        match *element {
            MockElement::Trigger(f) => {
                let was_open = state.filters[f].open;
                if was_open && state.faults.sticky_dropdown {
                    return Ok(());
                }
                for filter in &mut state.filters {
                    filter.open = false;
                }
                state.filters[f].open = !was_open;
            }
            MockElement::Checkbox { filter, option } => {
                let checked = state.filters[filter].checked.contains(&option);
                Self::set_checked(&mut state, *element, !checked)?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn check(&self, element: &MockElement) -> CheckResult<()> {
        let mut state = self.lock();
        state.history.push(format!("check:{element:?}"));
        Self::set_checked(&mut state, *element, true)
    }

    async fn uncheck(&self, element: &MockElement) -> CheckResult<()> {
        let mut state = self.lock();
        state.history.push(format!("uncheck:{element:?}"));
        if state.faults.uncheck_timeouts > 0 {
            state.faults.uncheck_timeouts -= 1;
            let timeout = Duration::from_secs(10);
            state.clock += timeout;
            return Err(CheckError::timeout("checkbox", timeout));
        }
        Self::set_checked(&mut state, *element, false)
    }

    async fn wait(&self, duration: Duration) {
        let mut state = self.lock();
        state.history.push(format!("wait:{}", duration.as_millis()));
        state.clock += duration;
    }

    async fn screenshot(&self) -> CheckResult<Screenshot> {
        let mut state = self.lock();
        state.screenshots += 1;
        Ok(Screenshot::new(PNG_MAGIC.to_vec()))
    }
}

/// The demo table the widget ships with, trimmed to the filtered columns
#[must_use]
pub fn demo_table() -> MockTable {
    MockTable::builder()
        .column(MockColumn::text("name", "Name"))
        .column(MockColumn::text("countryCode", "Flag"))
        .column(MockColumn::text("sector", "Sector").hidden())
        .column(MockColumn::percent("ytd", "YTD", 2))
        .row(&["Alpha Fund", "FR", "Tech", "0.05"])
        .row(&["Beta Fund", "US", "Energy", "-0.02"])
        .row(&["Gamma Fund", "DE", "Tech", "0.05"])
        .row(&["Delta Fund", "US", "Health", "0.12"])
        .row(&["Epsilon Fund", "GB", "Energy", "-0.02"])
        .row(&["Zeta Fund", "FR", "Health", "0.031"])
        .header_filter("countryCode")
        .global_filter("ytd")
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn selectors() -> WidgetSelectors {
        WidgetSelectors::default()
    }

    fn ytd() -> FilterControl {
        FilterControl::Global {
            filter_key: "ytd".to_string(),
        }
    }

    #[test]
    fn test_options_sort_numerically() {
        let values = ["0.12", "-0.02", "0.05", "0.05", " "].map(String::from);
        assert_eq!(unique_sorted(values.iter()), vec!["-0.02", "0.05", "0.12"]);
    }

    #[test]
    fn test_options_sort_lexically_when_mixed() {
        let values = ["US", "FR", "DE"].map(String::from);
        assert_eq!(unique_sorted(values.iter()), vec!["DE", "FR", "US"]);
    }

    #[test]
    fn test_percent_render() {
        let col = MockColumn::percent("ytd", "YTD", 2);
        assert_eq!(col.render("0.05"), "5.00%");
        assert_eq!(col.render("n/a"), "n/a");
    }

    #[test]
    fn test_percent_render_matches_formatter() {
        let col = MockColumn::percent("ytd", "YTD", 2);
        assert_eq!(col.render("12.345"), "1 234.50%");
        assert_eq!(col.render("0.00125"), "0.13%");
    }

    #[tokio::test]
    async fn test_navigate_resets_filters() {
        let mut mock = demo_table();
        mock.click(&MockElement::Trigger(1)).await.unwrap();
        mock.check(&MockElement::Checkbox { filter: 1, option: 0 }).await.unwrap();

        mock.navigate("http://example.test/", LoadState::Load, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!mock.is_open("ytd"));
        assert!(mock.checked_values("ytd").is_empty());
        assert_eq!(mock.current_url(), "http://example.test/");
    }

    #[tokio::test]
    async fn test_uncheck_timeouts_are_used_up() {
        let mock = MockTable::builder()
            .column(MockColumn::percent("ytd", "YTD", 2))
            .row(&["0.05"])
            .global_filter("ytd")
            .faults(MockFaults {
                uncheck_timeouts: 1,
                ..MockFaults::default()
            })
            .build();
        let checkbox = MockElement::Checkbox { filter: 0, option: 0 };
        mock.click(&MockElement::Trigger(0)).await.unwrap();
        mock.check(&checkbox).await.unwrap();

        let err = mock.uncheck(&checkbox).await.unwrap_err();
        assert!(matches!(err, CheckError::InteractionTimeout { ms: 10_000, .. }));
        assert_eq!(mock.checked_values("ytd"), vec!["0.05"]);

        mock.uncheck(&checkbox).await.unwrap();
        assert!(mock.checked_values("ytd").is_empty());
    }

    #[tokio::test]
    async fn test_rows_and_placeholder() {
        let mock = demo_table();
        let rows = mock.locate_all(&selectors().body_rows()).await.unwrap();
        assert_eq!(rows.len(), 6);

        mock.set_loading(true);
        let rows = mock.locate_all(&selectors().body_rows()).await.unwrap();
        assert_eq!(rows, vec![MockElement::PlaceholderRow]);
        let cells = mock.locate_within(&rows[0], "td").await.unwrap();
        assert_eq!(mock.text_content(&cells[0]).await.unwrap(), "Loading...");
    }

    #[tokio::test]
    async fn test_checking_filters_rows_and_updates_summary() {
        let mock = demo_table();
        let s = selectors();
        let trigger = mock.wait_for_visible(&s.trigger(&ytd()), Duration::from_secs(1)).await.unwrap();
        mock.click(&trigger).await.unwrap();
        assert!(mock.is_open("ytd"));

        mock.check(&MockElement::Checkbox { filter: 1, option: 2 }).await.unwrap();
        assert_eq!(mock.checked_values("ytd"), vec!["0.05"]);
        assert_eq!(mock.text_content(&trigger).await.unwrap().trim(), "0.05");
        assert_eq!(mock.locate_all(&s.body_rows()).await.unwrap().len(), 2);

        mock.check(&MockElement::Checkbox { filter: 1, option: 0 }).await.unwrap();
        assert_eq!(mock.text_content(&trigger).await.unwrap().trim(), "-0.02, 0.05");
        mock.check(&MockElement::Checkbox { filter: 1, option: 3 }).await.unwrap();
        assert_eq!(mock.text_content(&trigger).await.unwrap().trim(), "3 selected");
    }

    #[tokio::test]
    async fn test_check_requires_open_dropdown() {
        let mock = demo_table();
        let err = mock
            .check(&MockElement::Checkbox { filter: 1, option: 0 })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not visible"));
    }

    #[tokio::test]
    async fn test_opening_one_dropdown_closes_others() {
        let mock = demo_table();
        mock.click(&MockElement::Trigger(0)).await.unwrap();
        mock.click(&MockElement::Trigger(1)).await.unwrap();
        assert!(!mock.is_open("countryCode"));
        assert!(mock.is_open("ytd"));
    }

    #[tokio::test]
    async fn test_wait_for_visible_advances_clock_on_timeout() {
        let mock = MockTable::builder()
            .faults(MockFaults {
                never_ready: true,
                ..MockFaults::default()
            })
            .build();
        let err = mock
            .wait_for_visible(&selectors().container_ready(), Duration::from_secs(15))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::InteractionTimeout { ms: 15_000, .. }));
        assert_eq!(mock.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_mislabeled_option_markup() {
        let mock = MockTable::builder()
            .column(MockColumn::text("countryCode", "Flag"))
            .row(&["FR"])
            .header_filter("countryCode")
            .faults(MockFaults {
                mislabeled_option: Some(0),
                ..MockFaults::default()
            })
            .build();
        let item = MockElement::Item { filter: 0, option: 0 };
        let html = mock.inner_html(&item).await.unwrap();
        assert!(html.contains("for=\"dt-gms-main-dynamic-table-countryCode-FR-x\""));
        let label_for = mock
            .attribute(&MockElement::Label { filter: 0, option: 0 }, "for")
            .await
            .unwrap();
        let id = mock
            .attribute(&MockElement::Checkbox { filter: 0, option: 0 }, "id")
            .await
            .unwrap();
        assert_ne!(label_for, id);
    }
}
