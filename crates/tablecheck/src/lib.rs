//! Tablecheck: End-to-End Verification of Multi-Select Table Filters
//!
//! Drives a client-rendered data table through its per-column and global
//! multi-select filters and checks, after every selection change, that the
//! rendered rows and the summary label match the selection.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                      TABLECHECK Architecture                      │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐   │
//! │  │ Scenario     │──►│ FilterState      │──►│ UiDriver         │   │
//! │  │ Runner       │   │ Driver           │   │ (CDP or mock)    │   │
//! │  └──────┬───────┘   └────────┬─────────┘   └──────────────────┘   │
//! │         │                    │                                    │
//! │         ▼                    ▼                                    │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐   │
//! │  │ Diagnostics  │◄──│ TableSnapshot    │◄──│ ColumnResolver   │   │
//! │  │              │   │ Reader           │   │                  │   │
//! │  └──────────────┘   └──────────────────┘   └──────────────────┘   │
//! │                              ▲                                    │
//! │                     ValueFormatter (expected cell text)           │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use tablecheck::{mock::demo_table, run_suite, SuiteConfig};
//!
//! # tokio_test_block(async {
//! let mut table = demo_table();
//! let config = SuiteConfig { screenshot_dir: None, ..SuiteConfig::default() };
//! let report = run_suite(&mut table, &config, &[]).await.unwrap();
//! assert!(report.passed());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod browser;
mod column;
mod config;
mod diagnostics;
mod driver;
mod filter;
mod format;
mod page;
mod result;
mod scenario;
mod selectors;
mod snapshot;
mod wait;

/// In-memory table widget for tests and demos
pub mod mock;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::CdpDriver;
pub use column::{ColumnResolver, VisibleColumnIndex};
pub use config::{SuiteConfig, DEFAULT_URL};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use driver::{
    BodyRow, Cell, Checkbox, Container, Handle, HeaderCell, Label, OptionItem, OptionsPanel,
    Screenshot, Trigger, UiDriver,
};
pub use filter::{FilterOption, FilterStateDriver, OptionEntry, SelectionState, SummaryExpectation};
pub use format::{format_percent, parse_percent, ValueFormat, ValueFormatter, DEFAULT_PERCENT_DECIMALS};
pub use page::{open, TablePage};
pub use result::{CheckError, CheckResult, HeaderInfo};
pub use scenario::{run_suite, ScenarioReport, ScenarioRunner, ScenarioSpec, SuiteReport};
pub use selectors::{FilterControl, WidgetSelectors};
pub use snapshot::{is_placeholder_text, ColumnSnapshot, RowSnapshot, ShortRow, TableSnapshotReader};
pub use wait::{
    LoadState, SettlePolicy, Timeouts, DEFAULT_DROPDOWN_TIMEOUT_MS, DEFAULT_ELEMENT_TIMEOUT_MS,
    DEFAULT_LOAD_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_READY_TIMEOUT_MS,
    NETWORK_IDLE_THRESHOLD_MS,
};
