//! Sequential cache population
//!
//! Walks every (service, region) pair of a [`Catalog`], skipping pairs that
//! are already cached and fetching + writing the rest. A failure on one pair
//! is reported and never stops the run.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::RegionCache;
use crate::data::{Catalog, FetchError, PriceItem, PriceSheet, PricesClient, ServiceEntry};

/// Default pause after each successful write
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(300);

/// Anything that can produce the full price list for a service in a region
#[async_trait]
pub trait PriceSource {
    async fn fetch_prices(&self, service_name: &str, region: &str) -> Result<Vec<PriceItem>, FetchError>;
}

#[async_trait]
impl PriceSource for PricesClient {
    async fn fetch_prices(&self, service_name: &str, region: &str) -> Result<Vec<PriceItem>, FetchError> {
        self.fetch_all(service_name, region).await
    }
}

/// Errors that can occur while populating a single pair
#[derive(Debug, Error)]
pub enum PairError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write cache file: {0}")]
    Io(#[from] io::Error),
}

/// What happened to one (service, region) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// A cache file already existed; nothing was fetched
    Skipped,
    /// A new cache file was written with `count` items
    Written { count: usize },
    /// Fetching or writing failed
    Failed { reason: String },
}

/// Outcome of one pair, with enough context to print a report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    pub service: String,
    pub region: String,
    pub file_stem: String,
    pub outcome: PairOutcome,
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = format!("{}/{}.json", self.region, self.file_stem);
        match &self.outcome {
            PairOutcome::Skipped => write!(f, "SKIP {} (exists)", file),
            PairOutcome::Written { count } => write!(f, "OK   {} ({} items)", file, count),
            PairOutcome::Failed { reason } => write!(f, "ERR  {}: {}", file, reason),
        }
    }
}

/// Reports for every pair visited, in processing order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<PairReport>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&PairOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Written: {}, skipped: {}, failed: {}",
            self.written(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Drives a full population run over a catalog
pub struct Driver<S> {
    source: S,
    cache: RegionCache,
    catalog: Catalog,
    write_delay: Duration,
}

impl<S: PriceSource> Driver<S> {
    pub fn new(source: S, cache: RegionCache, catalog: Catalog) -> Self {
        Self {
            source,
            cache,
            catalog,
            write_delay: DEFAULT_WRITE_DELAY,
        }
    }

    /// Sets the pause after each successful write
    pub fn with_write_delay(mut self, write_delay: Duration) -> Self {
        self.write_delay = write_delay;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Visits every pair, services in catalog order then regions in list order
    ///
    /// One report line per pair is written to `out` as soon as the pair is
    /// done. Output errors are ignored; the returned summary is authoritative.
    pub async fn run<W: Write>(&self, out: &mut W) -> RunSummary {
        info!(
            services = self.catalog.services.len(),
            regions = self.catalog.regions.len(),
            pairs = self.catalog.pair_count(),
            base_dir = %self.cache.base_dir().display(),
            "starting pricing cache population"
        );

        let mut summary = RunSummary::default();

        for service in &self.catalog.services {
            for region in &self.catalog.regions {
                let outcome = self.process_pair(service, region).await;
                let report = PairReport {
                    service: service.api_name.clone(),
                    region: region.clone(),
                    file_stem: service.file_stem.clone(),
                    outcome,
                };

                let _ = writeln!(out, "{}", report);
                let _ = out.flush();
                summary.reports.push(report);
            }
        }

        summary
    }

    async fn process_pair(&self, service: &ServiceEntry, region: &str) -> PairOutcome {
        if self.cache.contains(region, &service.file_stem) {
            return PairOutcome::Skipped;
        }

        match self.populate(service, region).await {
            Ok(count) => {
                tokio::time::sleep(self.write_delay).await;
                PairOutcome::Written { count }
            }
            Err(e) => {
                warn!(service = %service.api_name, region, error = %e, "failed to populate pair");
                PairOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetches every page for the pair, then writes the sheet in one go
    async fn populate(&self, service: &ServiceEntry, region: &str) -> Result<usize, PairError> {
        let items = self
            .source
            .fetch_prices(&service.api_name, service.api_region(region))
            .await?;

        let sheet = PriceSheet::new(items);
        self.cache.write(region, &service.file_stem, &sheet)?;
        Ok(sheet.count())
    }
}
