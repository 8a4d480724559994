//! ColumnResolver
//!
//! Maps a logical column key to its position among the currently visible
//! header cells. Hidden columns stay in the DOM, so positions shift whenever
//! the widget toggles visibility; resolve again after every action that may
//! do so.

use crate::driver::UiDriver;
use crate::page::TablePage;
use crate::result::{CheckError, CheckResult, HeaderInfo};

/// Position of a column among visible header cells, 0-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisibleColumnIndex(usize);

impl VisibleColumnIndex {
    /// Wrap a raw position
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw position
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VisibleColumnIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves column keys against the live header row
#[derive(Debug)]
pub struct ColumnResolver<'p, 'd, D: UiDriver> {
    page: &'p TablePage<'d, D>,
}

impl<'p, 'd, D: UiDriver> ColumnResolver<'p, 'd, D> {
    /// Resolver over a page
    #[must_use]
    pub const fn new(page: &'p TablePage<'d, D>) -> Self {
        Self { page }
    }

    /// Position of `key` among visible headers.
    ///
    /// # Errors
    ///
    /// [`CheckError::ColumnNotFound`] carrying every visible header when no
    /// visible header carries `key`; driver errors propagate.
    pub async fn resolve(&self, key: &str) -> CheckResult<VisibleColumnIndex> {
        let mut visible = Vec::new();
        for header in self.page.header_cells().await? {
            if !self.page.is_visible(&header).await? {
                continue;
            }
            let header_key = self.page.column_key(&header).await?;
            if header_key.as_deref() == Some(key) {
                let index = VisibleColumnIndex::new(visible.len());
                tracing::debug!(key, %index, "resolved column");
                return Ok(index);
            }
            visible.push(header);
        }

        let mut headers = Vec::with_capacity(visible.len());
        for header in &visible {
            headers.push(HeaderInfo {
                key: self.page.column_key(header).await?,
                text: self.page.text(header).await?.trim().to_string(),
            });
        }
        tracing::debug!(key, visible = headers.len(), "column not among visible headers");
        Err(CheckError::ColumnNotFound {
            key: key.to_string(),
            headers,
        })
    }
}
