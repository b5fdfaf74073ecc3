//! Command-line interface parsing for pricefill
//!
//! Every flag is optional: running with no arguments reproduces the default
//! population run against the public Retail Prices API.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cache::DEFAULT_BASE_DIR;
use crate::data::prices::{DEFAULT_API_URL, DEFAULT_PAGE_DELAY, DEFAULT_TIMEOUT};
use crate::driver::DEFAULT_WRITE_DELAY;

/// pricefill - Populate the local Azure retail pricing cache
#[derive(Parser, Debug)]
#[command(name = "pricefill")]
#[command(about = "Fetch missing Azure retail pricing files, one per service and region")]
#[command(version)]
pub struct Cli {
    /// Root directory holding one subdirectory per region
    #[arg(long, value_name = "DIR", env = "PRICEFILL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Retail Prices API endpoint
    #[arg(long, value_name = "URL", env = "PRICEFILL_API_URL")]
    pub api_url: Option<String>,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, value_name = "SECS", env = "PRICEFILL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Pause before each follow-up page request, in milliseconds
    #[arg(long, value_name = "MS")]
    pub page_delay_ms: Option<u64>,

    /// Pause after each file written, in milliseconds
    #[arg(long, value_name = "MS")]
    pub write_delay_ms: Option<u64>,
}

/// Settings for one population run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub api_url: String,
    pub timeout: Duration,
    pub page_delay: Duration,
    pub write_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_BASE_DIR),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_delay: DEFAULT_PAGE_DELAY,
            write_delay: DEFAULT_WRITE_DELAY,
        }
    }
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments, falling back to defaults
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            output_dir: cli.output_dir.clone().unwrap_or(defaults.output_dir),
            api_url: cli.api_url.clone().unwrap_or(defaults.api_url),
            timeout: cli.timeout_secs.map(Duration::from_secs).unwrap_or(defaults.timeout),
            page_delay: cli
                .page_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_delay),
            write_delay: cli
                .write_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.write_delay),
        }
    }
}
