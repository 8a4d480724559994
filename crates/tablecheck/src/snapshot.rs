//! TableSnapshotReader
//!
//! Reads the rendered body rows into plain strings. Only visible cells count,
//! and placeholder rows ("No results found.", "Loading...") are dropped.
//!
//! An empty table and a table that has not rendered yet both read as an
//! empty snapshot. Callers decide what that means for their step.

use crate::column::VisibleColumnIndex;
use crate::driver::UiDriver;
use crate::page::TablePage;
use crate::result::CheckResult;
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)no results|loading").expect("valid placeholder pattern"))
}

/// Whether cell text marks a placeholder row
#[must_use]
pub fn is_placeholder_text(text: &str) -> bool {
    placeholder_pattern().is_match(text)
}

/// Visible cell texts of one data row, trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RowSnapshot(Vec<String>);

impl RowSnapshot {
    /// Row from cell texts
    #[must_use]
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    /// Cell texts in visible order
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// Text at a visible column position
    #[must_use]
    pub fn get(&self, index: VisibleColumnIndex) -> Option<&str> {
        self.0.get(index.get()).map(String::as_str)
    }

    /// Number of visible cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no visible cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A data row too short for the requested column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortRow {
    /// Position among data rows
    pub row: usize,
    /// Visible cells the row had
    pub visible_cells: usize,
}

/// One column's values, one per data row in row order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSnapshot {
    index: VisibleColumnIndex,
    values: Vec<String>,
    short_rows: Vec<ShortRow>,
}

impl ColumnSnapshot {
    /// Values in row order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no data row contributed a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column position this snapshot was read at
    #[must_use]
    pub const fn index(&self) -> VisibleColumnIndex {
        self.index
    }

    /// Data rows that had no cell at the column position
    #[must_use]
    pub fn short_rows(&self) -> &[ShortRow] {
        &self.short_rows
    }

    /// Whether every value is one of `allowed`
    #[must_use]
    pub fn all_in<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        self.values
            .iter()
            .all(|v| allowed.iter().any(|a| a.as_ref() == v))
    }

    /// Values not among `allowed`, deduplicated in first-seen order
    #[must_use]
    pub fn outside<S: AsRef<str>>(&self, allowed: &[S]) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for v in &self.values {
            if !allowed.iter().any(|a| a.as_ref() == v) && !out.contains(&v.as_str()) {
                out.push(v);
            }
        }
        out
    }

    /// Whether `value` occurs at least once
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

fn column_of(rows: &[RowSnapshot], index: VisibleColumnIndex) -> ColumnSnapshot {
    let mut snapshot = ColumnSnapshot {
        index,
        ..ColumnSnapshot::default()
    };
    for (row, cells) in rows.iter().enumerate() {
        match cells.get(index) {
            Some(text) => snapshot.values.push(text.to_string()),
            None => {
                tracing::debug!(row, cells = cells.len(), %index, "row too short for column");
                snapshot.short_rows.push(ShortRow {
                    row,
                    visible_cells: cells.len(),
                });
            }
        }
    }
    snapshot
}

/// Reads rendered rows through a page
#[derive(Debug)]
pub struct TableSnapshotReader<'p, 'd, D: UiDriver> {
    page: &'p TablePage<'d, D>,
}

impl<'p, 'd, D: UiDriver> TableSnapshotReader<'p, 'd, D> {
    /// Reader over a page
    #[must_use]
    pub const fn new(page: &'p TablePage<'d, D>) -> Self {
        Self { page }
    }

    /// Every data row's visible cell texts, placeholders excluded
    pub async fn read_rows(&self) -> CheckResult<Vec<RowSnapshot>> {
        let mut rows = Vec::new();
        let mut skipped = 0_usize;
        for row in self.page.body_rows().await? {
            let mut cells = Vec::new();
            for cell in self.page.cells(&row).await? {
                if self.page.is_visible(&cell).await? {
                    cells.push(self.page.text(&cell).await?.trim().to_string());
                }
            }
            if cells.len() == 1 && is_placeholder_text(&cells[0]) {
                skipped += 1;
                continue;
            }
            rows.push(RowSnapshot::new(cells));
        }
        tracing::debug!(rows = rows.len(), skipped, "read table rows");
        Ok(rows)
    }

    /// Values of one visible column.
    ///
    /// Rows too short for `index` contribute no value and are listed in
    /// [`ColumnSnapshot::short_rows`].
    pub async fn read(&self, index: VisibleColumnIndex) -> CheckResult<ColumnSnapshot> {
        let rows = self.read_rows().await?;
        let snapshot = column_of(&rows, index);
        tracing::debug!(values = ?snapshot.values(), "column snapshot");
        Ok(snapshot)
    }
}
