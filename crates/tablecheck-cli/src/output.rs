//! Report rendering and progress display

use crate::error::CliResult;
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tablecheck::{ScenarioReport, SuiteConfig, SuiteReport};

/// Writes suite results to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            spinner: None,
            use_color,
            quiet,
        }
    }

    /// Show a spinner on stderr while the suite runs
    pub fn start(&mut self, message: &str) {
        if self.quiet {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Remove the spinner
    pub fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print every scenario and the summary
    pub fn report(&self, suite: &SuiteReport) -> CliResult<()> {
        for scenario in &suite.scenarios {
            if scenario.passed && self.quiet {
                continue;
            }
            for line in scenario_lines(scenario, self.use_color) {
                self.term.write_line(&line)?;
            }
        }
        if !self.quiet {
            self.term.write_line("")?;
            self.term.write_line(&summary_line(suite, self.use_color))?;
        }
        Ok(())
    }

    /// Print the report as pretty JSON
    pub fn json(&self, suite: &SuiteReport) -> CliResult<()> {
        self.term.write_line(&serde_json::to_string_pretty(suite)?)?;
        Ok(())
    }

    /// Print the configured scenarios
    pub fn list(&self, config: &SuiteConfig) -> CliResult<()> {
        let bold = Style::new().bold().force_styling(self.use_color);
        for spec in &config.scenarios {
            let mode = if spec.verify_selection {
                "selection sequence"
            } else {
                "structure only"
            };
            self.term.write_line(&format!(
                "{} {} on column '{}' ({mode})",
                bold.apply_to(&spec.name),
                spec.control,
                spec.column_key
            ))?;
        }
        Ok(())
    }
}

/// Lines printed for one scenario: a PASS/FAIL line, then one line per failure
#[must_use]
pub fn scenario_lines(report: &ScenarioReport, use_color: bool) -> Vec<String> {
    let green = Style::new().green().bold().force_styling(use_color);
    let red = Style::new().red().bold().force_styling(use_color);
    let dim = Style::new().dim().force_styling(use_color);

    let mut lines = Vec::with_capacity(report.diagnostics.len() + 3);
    if report.passed {
        lines.push(format!(
            "{} {} {}",
            green.apply_to("PASS"),
            report.name,
            dim.apply_to(format!("({} checks, {} ms)", report.checks, report.duration_ms))
        ));
        return lines;
    }

    lines.push(format!(
        "{} {} {}",
        red.apply_to("FAIL"),
        report.name,
        dim.apply_to(format!(
            "({} failure(s), {} ms)",
            report.diagnostics.len(),
            report.duration_ms
        ))
    ));
    for diagnostic in &report.diagnostics {
        lines.push(format!(
            "  - {} {}",
            dim.apply_to(format!("[{}]", diagnostic.kind)),
            diagnostic.message
        ));
    }
    if let Some(fatal) = &report.fatal {
        lines.push(format!("  {} {fatal}", red.apply_to("aborted:")));
    }
    if let Some(path) = &report.screenshot {
        lines.push(format!("  screenshot: {}", path.display()));
    }
    lines
}

/// Totals line
#[must_use]
pub fn summary_line(suite: &SuiteReport, use_color: bool) -> String {
    let failed = suite.failed_count();
    let passed = suite.scenarios.len() - failed;
    let base = if failed == 0 {
        Style::new().green()
    } else {
        Style::new().red()
    };
    let style = base.bold().force_styling(use_color);
    format!(
        "{} {} scenario(s): {passed} passed, {failed} failed",
        style.apply_to(if failed == 0 { "ok." } else { "FAILED." }),
        suite.scenarios.len()
    )
}
