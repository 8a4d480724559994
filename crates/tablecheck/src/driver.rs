//! UiDriver - Abstract Browser Automation Trait
//!
//! The verification engine never talks to a browser directly. It consumes
//! this capability, which is implemented by [`crate::browser::CdpDriver`]
//! (Chromium over CDP) and by [`crate::mock::MockTable`] (an in-memory
//! rendition of the widget used by tests).
//!
//! Elements come back untyped from the driver and are immediately wrapped in
//! typed handles ([`Checkbox`], [`Label`], [`Trigger`], ...) by
//! [`crate::page::TablePage`], so only a checkbox can be checked and only a
//! trigger can open a dropdown.

use crate::result::CheckResult;
use crate::wait::LoadState;
use async_trait::async_trait;
use std::time::Duration;

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Timestamp when screenshot was taken
    pub timestamp: std::time::SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            timestamp: std::time::SystemTime::now(),
        }
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if screenshot has data
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Abstract driver trait for browser automation
///
/// Every call is a suspension point. Waits return
/// [`crate::CheckError::InteractionTimeout`] when their bound elapses.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Opaque element reference
    type Element: Send + Sync + std::fmt::Debug;

    /// Navigate to URL and wait for the given load state
    async fn navigate(
        &mut self,
        url: &str,
        wait_until: LoadState,
        timeout: Duration,
    ) -> CheckResult<()>;

    /// Wait until the first element matching `selector` is visible
    async fn wait_for_visible(&self, selector: &str, timeout: Duration)
        -> CheckResult<Self::Element>;

    /// All elements matching `selector`, in document order
    async fn locate_all(&self, selector: &str) -> CheckResult<Vec<Self::Element>>;

    /// All descendants of `parent` matching `selector`, in document order
    async fn locate_within(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> CheckResult<Vec<Self::Element>>;

    /// Whether the element is currently rendered visibly
    async fn is_visible(&self, element: &Self::Element) -> CheckResult<bool>;

    /// Text content of the element (untrimmed)
    async fn text_content(&self, element: &Self::Element) -> CheckResult<String>;

    /// Attribute value, `None` if absent
    async fn attribute(&self, element: &Self::Element, name: &str)
        -> CheckResult<Option<String>>;

    /// Inner markup, for diagnostics
    async fn inner_html(&self, element: &Self::Element) -> CheckResult<String>;

    /// Click element
    async fn click(&self, element: &Self::Element) -> CheckResult<()>;

    /// Ensure a checkbox is checked, clicking only if it is not
    async fn check(&self, element: &Self::Element) -> CheckResult<()>;

    /// Ensure a checkbox is unchecked, clicking only if it is
    async fn uncheck(&self, element: &Self::Element) -> CheckResult<()>;

    /// Suspend for a fixed duration
    async fn wait(&self, duration: Duration);

    /// Capture the current viewport
    async fn screenshot(&self) -> CheckResult<Screenshot>;
}

/// Common access to the element behind a typed handle
pub trait Handle<E> {
    /// Underlying element
    fn element(&self) -> &E;
}

macro_rules! typed_handle {
    ($(#[$doc:meta] $name:ident),* $(,)?) => {
        $(
            #[$doc]
            #[derive(Debug)]
            pub struct $name<E>(E);

            impl<E> $name<E> {
                /// Wrap a raw element
                pub const fn new(element: E) -> Self {
                    Self(element)
                }

                /// Unwrap into the raw element
                pub fn into_inner(self) -> E {
                    self.0
                }
            }

            impl<E> Handle<E> for $name<E> {
                fn element(&self) -> &E {
                    &self.0
                }
            }
        )*
    };
}

typed_handle! {
    /// Table root container
    Container,
    /// `th` cell in the table head
    HeaderCell,
    /// `tr` in the table body
    BodyRow,
    /// `td` within a body row
    Cell,
    /// Element that opens and closes a filter dropdown
    Trigger,
    /// Container of the dropdown's option items
    OptionsPanel,
    /// One checkbox + label entry of a dropdown
    OptionItem,
    /// Checkbox input of an option item
    Checkbox,
    /// Label of an option item
    Label,
}
