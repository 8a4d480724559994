//! DOM contract of the table widget under test.
//!
//! All CSS selectors the engine issues are built here, so a widget that
//! renders different class names only needs a different [`WidgetSelectors`].

use serde::{Deserialize, Serialize};

/// Selector vocabulary of the table widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSelectors {
    /// Id of the root container
    pub container_id: String,
    /// Class the widget adds to the container once initialised
    pub ready_class: String,
    /// Attribute carrying the column key on header cells
    pub column_key_attr: String,
    /// Attribute carrying the column key on global filter wrappers
    pub filter_key_attr: String,
    /// Class of the per-column multi-select wrapper inside a header cell
    pub header_multiselect: String,
    /// Class of the per-column trigger
    pub header_trigger: String,
    /// Class of the per-column option panel
    pub header_dropdown: String,
    /// Class of the global filter bar
    pub global_filter_bar: String,
    /// Class of the global trigger
    pub global_trigger: String,
    /// Class of the global option panel
    pub global_options: String,
    /// Class of one option entry
    pub option_item: String,
}

impl Default for WidgetSelectors {
    fn default() -> Self {
        Self {
            container_id: "main-dynamic-table".to_string(),
            ready_class: "dynamic-table-wrapper".to_string(),
            column_key_attr: "data-column".to_string(),
            filter_key_attr: "data-filter-key".to_string(),
            header_multiselect: "dt-header-multiselect".to_string(),
            header_trigger: "dt-multiselect-trigger".to_string(),
            header_dropdown: "dt-multiselect-dropdown".to_string(),
            global_filter_bar: "dynamic-table-filter-control".to_string(),
            global_trigger: "dt-custom-select-trigger".to_string(),
            global_options: "dt-custom-options".to_string(),
            option_item: "dt-multiselect-item".to_string(),
        }
    }
}

impl WidgetSelectors {
    /// Container once the widget has initialised
    #[must_use]
    pub fn container_ready(&self) -> String {
        format!("#{}.{}", self.container_id, self.ready_class)
    }

    /// Every header cell, visible or not
    #[must_use]
    pub fn header_cells(&self) -> String {
        format!("#{} thead th", self.container_id)
    }

    /// Header cell of one column
    #[must_use]
    pub fn header_cell(&self, key: &str) -> String {
        format!("th[{}='{key}']", self.column_key_attr)
    }

    /// Every body row
    #[must_use]
    pub fn body_rows(&self) -> String {
        format!("#{} tbody tr", self.container_id)
    }

    /// Cells within a row
    #[must_use]
    pub fn row_cells(&self) -> &'static str {
        "td"
    }

    /// Option entries within a panel
    #[must_use]
    pub fn option_items(&self) -> String {
        format!(".{}", self.option_item)
    }

    /// Checkbox within an option entry
    #[must_use]
    pub fn item_checkbox(&self) -> &'static str {
        "input[type='checkbox']"
    }

    /// Label within an option entry
    #[must_use]
    pub fn item_label(&self) -> &'static str {
        "label"
    }

    /// Trigger of a filter control
    #[must_use]
    pub fn trigger(&self, control: &FilterControl) -> String {
        match control {
            FilterControl::Header { column_key } => format!(
                "{} .{} .{}",
                self.header_cell(column_key),
                self.header_multiselect,
                self.header_trigger
            ),
            FilterControl::Global { filter_key } => format!(
                "{} .{}",
                self.global_filter(filter_key),
                self.global_trigger
            ),
        }
    }

    /// Option panel of a filter control
    #[must_use]
    pub fn options_panel(&self, control: &FilterControl) -> String {
        match control {
            FilterControl::Header { column_key } => format!(
                "{} .{} .{}",
                self.header_cell(column_key),
                self.header_multiselect,
                self.header_dropdown
            ),
            FilterControl::Global { filter_key } => format!(
                "{} .{}",
                self.global_filter(filter_key),
                self.global_options
            ),
        }
    }

    fn global_filter(&self, key: &str) -> String {
        format!(
            ".{} div[{}='{key}']",
            self.global_filter_bar, self.filter_key_attr
        )
    }
}

/// Which filter control a scenario drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterControl {
    /// Multi-select embedded in a column header
    Header {
        /// Column key of the header cell
        column_key: String,
    },
    /// Multi-select in the global filter bar
    Global {
        /// Filter key of the control wrapper
        filter_key: String,
    },
}

impl FilterControl {
    /// Key of the filtered column
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Header { column_key } => column_key,
            Self::Global { filter_key } => filter_key,
        }
    }
}

impl std::fmt::Display for FilterControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header { column_key } => write!(f, "'{column_key}' header multi-select"),
            Self::Global { filter_key } => write!(f, "'{filter_key}' global multi-select"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_match_widget() {
        let s = WidgetSelectors::default();
        assert_eq!(s.container_ready(), "#main-dynamic-table.dynamic-table-wrapper");
        assert_eq!(s.header_cells(), "#main-dynamic-table thead th");
        assert_eq!(s.body_rows(), "#main-dynamic-table tbody tr");
        assert_eq!(s.header_cell("countryCode"), "th[data-column='countryCode']");
    }

    #[test]
    fn test_header_control_selectors() {
        let s = WidgetSelectors::default();
        let control = FilterControl::Header {
            column_key: "countryCode".to_string(),
        };
        assert_eq!(
            s.trigger(&control),
            "th[data-column='countryCode'] .dt-header-multiselect .dt-multiselect-trigger"
        );
        assert_eq!(
            s.options_panel(&control),
            "th[data-column='countryCode'] .dt-header-multiselect .dt-multiselect-dropdown"
        );
    }

    #[test]
    fn test_global_control_selectors() {
        let s = WidgetSelectors::default();
        let control = FilterControl::Global {
            filter_key: "ytd".to_string(),
        };
        assert_eq!(
            s.trigger(&control),
            ".dynamic-table-filter-control div[data-filter-key='ytd'] .dt-custom-select-trigger"
        );
        assert_eq!(
            s.options_panel(&control),
            ".dynamic-table-filter-control div[data-filter-key='ytd'] .dt-custom-options"
        );
        assert_eq!(control.key(), "ytd");
        assert_eq!(control.to_string(), "'ytd' global multi-select");
    }
}
