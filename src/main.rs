//! pricefill - Populate the local Azure retail pricing cache
//!
//! Fetches every catalogued (service, region) price list that is not yet on
//! disk and writes it as a JSON file. Existing files are left untouched, so
//! an interrupted run can simply be started again.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use pricefill::cache::RegionCache;
use pricefill::cli::{Cli, RunConfig};
use pricefill::data::{Catalog, PricesClient};
use pricefill::driver::Driver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    pricefill::init_tracing();

    let config = RunConfig::from_cli(&cli);
    let client = PricesClient::with_options(&config.api_url, config.timeout, config.page_delay)?;
    let driver = Driver::new(
        client,
        RegionCache::with_dir(config.output_dir),
        Catalog::azure_defaults(),
    )
    .with_write_delay(config.write_delay);

    let mut stdout = io::stdout();
    let summary = driver.run(&mut stdout).await;

    let _ = writeln!(stdout, "\nDone!");
    let _ = writeln!(stdout, "{}", summary);

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
