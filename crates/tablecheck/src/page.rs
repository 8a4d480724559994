//! Page object for the table widget.
//!
//! Wraps a [`UiDriver`] with the widget's selector vocabulary and hands out
//! typed handles.

use crate::driver::{
    BodyRow, Cell, Checkbox, Container, Handle, HeaderCell, Label, OptionItem, OptionsPanel,
    Trigger, UiDriver,
};
use crate::result::CheckResult;
use crate::selectors::{FilterControl, WidgetSelectors};
use crate::wait::{LoadState, Timeouts};
use std::time::Duration;

/// Typed view of the table widget on the current page
#[derive(Debug)]
pub struct TablePage<'d, D: UiDriver> {
    driver: &'d D,
    selectors: &'d WidgetSelectors,
    timeouts: Timeouts,
}

impl<'d, D: UiDriver> TablePage<'d, D> {
    /// Create a page object over an already navigated driver
    pub const fn new(driver: &'d D, selectors: &'d WidgetSelectors, timeouts: Timeouts) -> Self {
        Self {
            driver,
            selectors,
            timeouts,
        }
    }

    /// Underlying driver
    pub const fn driver(&self) -> &'d D {
        self.driver
    }

    /// Selector vocabulary
    pub const fn selectors(&self) -> &'d WidgetSelectors {
        self.selectors
    }

    /// Configured timeouts
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Wait for the container to carry its ready marker class
    pub async fn wait_ready(&self) -> CheckResult<Container<D::Element>> {
        let el = self
            .driver
            .wait_for_visible(&self.selectors.container_ready(), self.timeouts.ready())
            .await?;
        Ok(Container::new(el))
    }

    /// Every header cell in document order, hidden ones included
    pub async fn header_cells(&self) -> CheckResult<Vec<HeaderCell<D::Element>>> {
        let els = self.driver.locate_all(&self.selectors.header_cells()).await?;
        Ok(els.into_iter().map(HeaderCell::new).collect())
    }

    /// Column key of a header cell
    pub async fn column_key(&self, header: &HeaderCell<D::Element>) -> CheckResult<Option<String>> {
        self.driver
            .attribute(header.element(), &self.selectors.column_key_attr)
            .await
    }

    /// Wait for the header cell of a column to become visible
    pub async fn wait_header(&self, key: &str) -> CheckResult<HeaderCell<D::Element>> {
        let el = self
            .driver
            .wait_for_visible(&self.selectors.header_cell(key), self.timeouts.element())
            .await?;
        Ok(HeaderCell::new(el))
    }

    /// Every body row in document order
    pub async fn body_rows(&self) -> CheckResult<Vec<BodyRow<D::Element>>> {
        let els = self.driver.locate_all(&self.selectors.body_rows()).await?;
        Ok(els.into_iter().map(BodyRow::new).collect())
    }

    /// Every cell of a row, hidden ones included
    pub async fn cells(&self, row: &BodyRow<D::Element>) -> CheckResult<Vec<Cell<D::Element>>> {
        let els = self
            .driver
            .locate_within(row.element(), self.selectors.row_cells())
            .await?;
        Ok(els.into_iter().map(Cell::new).collect())
    }

    /// Wait for a filter control's trigger to become visible
    pub async fn trigger(&self, control: &FilterControl) -> CheckResult<Trigger<D::Element>> {
        let el = self
            .driver
            .wait_for_visible(&self.selectors.trigger(control), self.timeouts.element())
            .await?;
        Ok(Trigger::new(el))
    }

    /// Wait for a filter control's option panel to become visible
    pub async fn wait_options_open(
        &self,
        control: &FilterControl,
    ) -> CheckResult<OptionsPanel<D::Element>> {
        let el = self
            .driver
            .wait_for_visible(
                &self.selectors.options_panel(control),
                self.timeouts.dropdown(),
            )
            .await?;
        Ok(OptionsPanel::new(el))
    }

    /// Option entries of an open panel
    pub async fn option_items(
        &self,
        panel: &OptionsPanel<D::Element>,
    ) -> CheckResult<Vec<OptionItem<D::Element>>> {
        let els = self
            .driver
            .locate_within(panel.element(), &self.selectors.option_items())
            .await?;
        Ok(els.into_iter().map(OptionItem::new).collect())
    }

    /// Checkbox of an option entry, if the entry has one
    pub async fn checkbox(
        &self,
        item: &OptionItem<D::Element>,
    ) -> CheckResult<Option<Checkbox<D::Element>>> {
        let els = self
            .driver
            .locate_within(item.element(), self.selectors.item_checkbox())
            .await?;
        Ok(els.into_iter().next().map(Checkbox::new))
    }

    /// Label of an option entry, if the entry has one
    pub async fn label(&self, item: &OptionItem<D::Element>) -> CheckResult<Option<Label<D::Element>>> {
        let els = self
            .driver
            .locate_within(item.element(), self.selectors.item_label())
            .await?;
        Ok(els.into_iter().next().map(Label::new))
    }

    /// Text content of any handle
    pub async fn text<H: Handle<D::Element> + Sync>(&self, handle: &H) -> CheckResult<String> {
        self.driver.text_content(handle.element()).await
    }

    /// Visibility of any handle
    pub async fn is_visible<H: Handle<D::Element> + Sync>(&self, handle: &H) -> CheckResult<bool> {
        self.driver.is_visible(handle.element()).await
    }

    /// Attribute of any handle
    pub async fn attribute<H: Handle<D::Element> + Sync>(
        &self,
        handle: &H,
        name: &str,
    ) -> CheckResult<Option<String>> {
        self.driver.attribute(handle.element(), name).await
    }

    /// Markup of any handle
    pub async fn markup<H: Handle<D::Element> + Sync>(&self, handle: &H) -> CheckResult<String> {
        self.driver.inner_html(handle.element()).await
    }

    /// Click a trigger to toggle its dropdown
    pub async fn toggle(&self, trigger: &Trigger<D::Element>) -> CheckResult<()> {
        self.driver.click(trigger.element()).await
    }

    /// Check a checkbox
    pub async fn check(&self, checkbox: &Checkbox<D::Element>) -> CheckResult<()> {
        self.driver.check(checkbox.element()).await
    }

    /// Uncheck a checkbox
    pub async fn uncheck(&self, checkbox: &Checkbox<D::Element>) -> CheckResult<()> {
        self.driver.uncheck(checkbox.element()).await
    }

    /// Fixed pause
    pub async fn pause(&self, duration: Duration) {
        self.driver.wait(duration).await;
    }
}

/// Navigate a driver to the table page
pub async fn open<D: UiDriver>(driver: &mut D, url: &str, timeouts: &Timeouts) -> CheckResult<()> {
    tracing::info!(url, "navigating");
    driver
        .navigate(url, LoadState::NetworkIdle, timeouts.load())
        .await
}
