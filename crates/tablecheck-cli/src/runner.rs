//! Suite execution against Chromium or the in-memory demo table

use crate::commands::Cli;
use crate::error::CliResult;
use tablecheck::{run_suite, SuiteConfig, SuiteReport};

/// Run the selected scenarios of `suite` on the driver the flags ask for
pub async fn execute(cli: &Cli, suite: &SuiteConfig) -> CliResult<SuiteReport> {
    // fail on unknown names before paying for a browser launch
    suite.select(&cli.scenarios)?;

    if cli.demo {
        tracing::info!("running against the in-memory demo table");
        let mut table = tablecheck::mock::demo_table();
        return Ok(run_suite(&mut table, suite, &cli.scenarios).await?);
    }
    run_in_browser(cli, suite).await
}

#[cfg(feature = "browser")]
async fn run_in_browser(cli: &Cli, suite: &SuiteConfig) -> CliResult<SuiteReport> {
    let config = crate::config::browser_config(cli);
    let mut driver = tablecheck::CdpDriver::launch(&config).await?;
    let result = run_suite(&mut driver, suite, &cli.scenarios).await;
    if let Err(err) = driver.close().await {
        tracing::warn!("browser did not shut down cleanly: {err}");
    }
    Ok(result?)
}

#[cfg(not(feature = "browser"))]
async fn run_in_browser(_cli: &Cli, _suite: &SuiteConfig) -> CliResult<SuiteReport> {
    Err(crate::error::CliError::BrowserUnavailable)
}
