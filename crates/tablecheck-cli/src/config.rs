//! CLI configuration

use crate::commands::Cli;
use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use tablecheck::{BrowserConfig, SuiteConfig};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures and errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - engine debug logs
    Verbose,
    /// Debug - debug logs from every crate
    Debug,
}

impl Verbosity {
    /// From the `-q`/`-v` flags
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// Presentation settings derived from the flags
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Print the report as JSON
    pub json: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set JSON output
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self::new()
            .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
            .with_color(cli.color.into())
            .with_json(cli.json)
    }
}

/// Suite configuration from `--config` (or defaults) with flag overrides applied
pub fn suite_config(cli: &Cli) -> CliResult<SuiteConfig> {
    let mut config = match &cli.config {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.url.clone_from(url);
    }
    if let Some(dir) = &cli.screenshot_dir {
        config.screenshot_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Browser settings from the flags
#[must_use]
pub fn browser_config(cli: &Cli) -> BrowserConfig {
    let mut config = BrowserConfig::default().with_headless(!cli.headed);
    if cli.no_sandbox {
        config = config.with_no_sandbox();
    }
    if let Some(path) = &cli.chromium_path {
        config = config.with_chromium_path(path);
    }
    config
}
