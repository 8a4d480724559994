//! Tablecheck CLI: verify multi-select table filters
//!
//! ## Usage
//!
//! ```bash
//! tablecheck                                   # built-in suite, default URL
//! tablecheck --url http://localhost:9000/      # another page
//! tablecheck --scenario ytd-multiselect --json # one scenario, JSON report
//! tablecheck --config suite.yaml --headed      # custom suite, visible browser
//! tablecheck --demo                            # in-memory table, no browser
//! ```

use clap::Parser;
use std::process::ExitCode;
use tablecheck_cli::{
    execute, logging, suite_config, Cli, CliConfig, CliError, CliResult, Reporter,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::from(&cli);
    logging::init(config.verbosity);

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: CliConfig) -> CliResult<()> {
    let suite = suite_config(cli)?;
    let mut reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    if cli.list {
        return reporter.list(&suite);
    }

    let rt = tokio::runtime::Runtime::new()?;
    if !config.json {
        reporter.start(&format!("Checking {}", suite.url));
    }
    let result = rt.block_on(execute(cli, &suite));
    reporter.finish();
    let report = result?;

    if config.json {
        reporter.json(&report)?;
    } else {
        reporter.report(&report)?;
    }

    match report.failed_count() {
        0 => Ok(()),
        n => Err(CliError::scenarios_failed(n)),
    }
}
