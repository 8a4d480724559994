//! Logging configuration
//!
//! Logs go to stderr so `--json` output on stdout stays parseable.

use crate::config::Verbosity;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset and no `-v`/`-q` flag is given
pub const DEFAULT_FILTER: &str = "tablecheck=info,warn";

/// Filter directive for a verbosity level
#[must_use]
pub const fn directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => DEFAULT_FILTER,
        Verbosity::Verbose => "tablecheck=debug,info",
        Verbosity::Debug => "debug",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` applies at normal verbosity; `-v` and `-q` override it.
pub fn init(verbosity: Verbosity) {
    let filter = match verbosity {
        Verbosity::Normal => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        other => EnvFilter::new(directive(other)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
