//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Tablecheck: verify multi-select filtering of a client-rendered data table
#[derive(Parser, Debug)]
#[command(name = "tablecheck")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Suite configuration file (YAML)
    #[arg(short, long, env = "TABLECHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Page under test (overrides the configuration)
    #[arg(long, env = "TABLECHECK_URL")]
    pub url: Option<String>,

    /// Run only this scenario (repeatable, runs in the given order)
    #[arg(short, long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Path to the chromium binary (auto-detected when absent)
    #[arg(long, env = "TABLECHECK_CHROMIUM")]
    pub chromium_path: Option<String>,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Directory for failure screenshots
    #[arg(long)]
    pub screenshot_dir: Option<PathBuf>,

    /// Print the suite report as JSON
    #[arg(long)]
    pub json: bool,

    /// List configured scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// Run against the built-in in-memory table instead of a browser
    #[arg(long)]
    pub demo: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only failures and errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
