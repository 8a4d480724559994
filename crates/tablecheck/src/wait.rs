//! Wait policies
//!
//! Every interaction with the page is a suspension point. Element waits are
//! hard-bounded; post-action settling is either a fixed delay or a poll until
//! the rendered state stops changing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Full page load timeout (60 seconds)
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 60_000;

/// Timeout for the table container to become ready (15 seconds)
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 15_000;

/// Timeout for header cells and filter triggers (10 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 10_000;

/// Timeout for a dropdown to open (5 seconds)
pub const DEFAULT_DROPDOWN_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Network idle threshold (500ms without requests)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

// =============================================================================
// LOAD STATE
// =============================================================================

/// Page load states a navigation can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
    /// Wait for network to be idle (no requests for 500ms)
    NetworkIdle,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Bounded waits used by a scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Page navigation
    pub load_ms: u64,
    /// Table container readiness
    pub ready_ms: u64,
    /// Headers and triggers
    pub element_ms: u64,
    /// Dropdown option panels
    pub dropdown_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            load_ms: DEFAULT_LOAD_TIMEOUT_MS,
            ready_ms: DEFAULT_READY_TIMEOUT_MS,
            element_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            dropdown_ms: DEFAULT_DROPDOWN_TIMEOUT_MS,
        }
    }
}

impl Timeouts {
    /// Navigation timeout
    #[must_use]
    pub const fn load(&self) -> Duration {
        Duration::from_millis(self.load_ms)
    }

    /// Container readiness timeout
    #[must_use]
    pub const fn ready(&self) -> Duration {
        Duration::from_millis(self.ready_ms)
    }

    /// Element visibility timeout
    #[must_use]
    pub const fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    /// Dropdown visibility timeout
    #[must_use]
    pub const fn dropdown(&self) -> Duration {
        Duration::from_millis(self.dropdown_ms)
    }
}

// =============================================================================
// SETTLE POLICY
// =============================================================================

/// How to decide that the widget has finished re-rendering after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettlePolicy {
    /// Sleep a fixed amount after every action
    Fixed {
        /// Delay after a check/uncheck
        delay_ms: u64,
        /// Delay after the closing click on a trigger
        close_delay_ms: u64,
    },
    /// Poll the rendered state until two consecutive reads agree
    UntilStable {
        /// Pause between reads
        interval_ms: u64,
        /// Give up polling after this long and proceed
        max_wait_ms: u64,
    },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::UntilStable {
            interval_ms: 250,
            max_wait_ms: 3_000,
        }
    }
}

impl SettlePolicy {
    /// One second after a check, 200 ms after closing
    #[must_use]
    pub const fn legacy() -> Self {
        Self::Fixed {
            delay_ms: 1_000,
            close_delay_ms: 200,
        }
    }

    /// Upper bound on polling rounds for `UntilStable`, at least two
    #[must_use]
    pub const fn max_polls(&self) -> u64 {
        match self {
            Self::Fixed { .. } => 0,
            Self::UntilStable {
                interval_ms,
                max_wait_ms,
            } => {
                let rounds = if *interval_ms == 0 {
                    2
                } else {
                    *max_wait_ms / *interval_ms
                };
                if rounds < 2 {
                    2
                } else {
                    rounds
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod load_state_tests {
        use super::*;

        #[test]
        fn test_event_names() {
            assert_eq!(LoadState::Load.event_name(), "load");
            assert_eq!(LoadState::DomContentLoaded.event_name(), "DOMContentLoaded");
            assert_eq!(LoadState::NetworkIdle.to_string(), "networkidle");
        }

        #[test]
        fn test_default_is_load() {
            assert_eq!(LoadState::default(), LoadState::Load);
        }
    }

    mod timeout_tests {
        use super::*;

        #[test]
        fn test_defaults_match_bounds() {
            let t = Timeouts::default();
            assert_eq!(t.load(), Duration::from_secs(60));
            assert_eq!(t.ready(), Duration::from_secs(15));
            assert_eq!(t.element(), Duration::from_secs(10));
            assert_eq!(t.dropdown(), Duration::from_secs(5));
        }
    }

    mod settle_tests {
        use super::*;

        #[test]
        fn test_default_polls_until_stable() {
            assert!(matches!(
                SettlePolicy::default(),
                SettlePolicy::UntilStable { .. }
            ));
            assert_eq!(SettlePolicy::default().max_polls(), 12);
        }

        #[test]
        fn test_max_polls_floor() {
            let p = SettlePolicy::UntilStable {
                interval_ms: 500,
                max_wait_ms: 100,
            };
            assert_eq!(p.max_polls(), 2);
            let zero = SettlePolicy::UntilStable {
                interval_ms: 0,
                max_wait_ms: 100,
            };
            assert_eq!(zero.max_polls(), 2);
        }

        #[test]
        fn test_legacy_delays() {
            assert_eq!(
                SettlePolicy::legacy(),
                SettlePolicy::Fixed {
                    delay_ms: 1_000,
                    close_delay_ms: 200
                }
            );
        }

        #[test]
        fn test_yaml_shape() {
            let p: SettlePolicy =
                serde_yaml_ng::from_str("mode: fixed\ndelay_ms: 10\nclose_delay_ms: 5\n")
                    .unwrap();
            assert_eq!(
                p,
                SettlePolicy::Fixed {
                    delay_ms: 10,
                    close_delay_ms: 5
                }
            );
        }
    }
}
