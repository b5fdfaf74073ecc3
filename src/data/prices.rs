//! Azure Retail Prices API client
//!
//! Fetches every price item for a service in a region, following the
//! `NextPageLink` pagination chain until the API stops returning one.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use super::{PriceItem, PricePage};

/// Public Retail Prices endpoint
pub const DEFAULT_API_URL: &str = "https://prices.azure.com/api/retail/prices";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause before each follow-up page request
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(200);

/// Characters left unescaped in the filter value; spaces become `%20`
const FILTER_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Errors that can occur when fetching price pages
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or timed out
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Response body was not valid JSON for a price page
    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configured or returned URL could not be parsed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// `NextPageLink` pointed away from the configured API origin
    #[error("Refusing to follow next page link to a different origin: {0}")]
    ForeignNextPage(String),
}

/// Client for the paginated Retail Prices API
#[derive(Debug, Clone)]
pub struct PricesClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Endpoint the `$filter` query is appended to
    base_url: Url,
    /// Throttle between page requests
    page_delay: Duration,
}

impl PricesClient {
    /// Creates a client for the public endpoint with default timeout and delay
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(DEFAULT_API_URL, DEFAULT_TIMEOUT, DEFAULT_PAGE_DELAY)
    }

    /// Creates a client against a custom endpoint
    ///
    /// # Arguments
    /// * `base_url` - Endpoint URL, e.g. a local mock server in tests
    /// * `timeout` - Bound applied to every request
    /// * `page_delay` - Pause before each follow-up page request
    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        page_delay: Duration,
    ) -> Result<Self, FetchError> {
        let base_url = parse_url(base_url)?;
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            page_delay,
        })
    }

    /// OData filter selecting one service in one region
    pub fn filter_expression(service_name: &str, region: &str) -> String {
        format!(
            "serviceName eq '{}' and armRegionName eq '{}'",
            service_name, region
        )
    }

    /// URL of the first page for a service/region query
    pub fn first_page_url(&self, service_name: &str, region: &str) -> Url {
        let filter = Self::filter_expression(service_name, region);
        let param = format!("$filter={}", utf8_percent_encode(&filter, FILTER_VALUE));

        let mut url = self.base_url.clone();
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{}&{}", existing, param),
            _ => param,
        };
        url.set_query(Some(&query));
        url
    }

    /// Fetches all price items for a service in a region
    ///
    /// # Arguments
    /// * `service_name` - Exact `serviceName` as known to the API
    /// * `region` - ARM region name, or `Global`
    ///
    /// # Returns
    /// * `Ok(Vec<PriceItem>)` - Items from every page, in page order
    /// * `Err(FetchError)` - The first failure encountered; no retry is attempted
    pub async fn fetch_all(
        &self,
        service_name: &str,
        region: &str,
    ) -> Result<Vec<PriceItem>, FetchError> {
        let first = self.fetch_page(self.first_page_url(service_name, region)).await?;
        let mut items = first.items;
        let mut next_link = present(first.next_page_link);
        let mut page_number = 1;

        debug!(service_name, region, page_number, total = items.len(), "fetched price page");

        while let Some(link) = next_link.take() {
            let url = self.checked_next_page(&link)?;
            tokio::time::sleep(self.page_delay).await;

            let page = self.fetch_page(url).await?;
            page_number += 1;
            items.extend(page.items);
            next_link = present(page.next_page_link);

            debug!(service_name, region, page_number, total = items.len(), "fetched price page");
        }

        Ok(items)
    }

    /// Parses a next page link and checks it stays on the configured origin
    fn checked_next_page(&self, link: &str) -> Result<Url, FetchError> {
        let url = parse_url(link)?;
        if url.origin() != self.base_url.origin() {
            return Err(FetchError::ForeignNextPage(link.to_string()));
        }
        Ok(url)
    }

    /// Fetches and decodes a single page
    async fn fetch_page(&self, url: Url) -> Result<PricePage, FetchError> {
        let response = self.http_client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// An empty or blank `NextPageLink` ends pagination like a missing one
fn present(link: Option<String>) -> Option<String> {
    link.filter(|l| !l.trim().is_empty())
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
