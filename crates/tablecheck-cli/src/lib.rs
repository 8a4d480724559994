//! Tablecheck CLI Library
//!
//! Command-line front end for the `tablecheck` verification engine: flag
//! parsing, configuration overrides, logging setup, driver selection and
//! report rendering.

#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg};
pub use config::{browser_config, suite_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{scenario_lines, summary_line, Reporter};
pub use runner::execute;
