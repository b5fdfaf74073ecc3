//! Pricing data models and the upstream API client
//!
//! Price items are kept as raw JSON values: they are written to disk exactly
//! as the Retail Prices API returned them.

pub mod catalog;
pub mod prices;

pub use catalog::{Catalog, ServiceEntry, GLOBAL_REGION};
pub use prices::{FetchError, PricesClient};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One upstream billing-meter record, never inspected
pub type PriceItem = Value;

/// Currency every cached price sheet is labelled with
pub const BILLING_CURRENCY: &str = "USD";

/// A single page of the Retail Prices API response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricePage {
    /// Items on this page; absent is treated as empty
    #[serde(rename = "Items", default)]
    pub items: Vec<PriceItem>,
    /// Fully-qualified URL of the next page, if any
    #[serde(rename = "NextPageLink", default)]
    pub next_page_link: Option<String>,
}

/// The cache file written for one (service, region) pair
///
/// Field order matches the upstream response envelope. `count` is derived
/// from `items` at construction and cannot drift from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSheet {
    #[serde(rename = "BillingCurrency")]
    billing_currency: String,
    #[serde(rename = "CustomerEntityId")]
    customer_entity_id: String,
    #[serde(rename = "CustomerEntityType")]
    customer_entity_type: String,
    #[serde(rename = "Items")]
    items: Vec<PriceItem>,
    #[serde(rename = "Count")]
    count: usize,
}

impl PriceSheet {
    pub fn new(items: Vec<PriceItem>) -> Self {
        Self {
            billing_currency: BILLING_CURRENCY.to_string(),
            customer_entity_id: "Default".to_string(),
            customer_entity_type: "Retail".to_string(),
            count: items.len(),
            items,
        }
    }

    pub fn items(&self) -> &[PriceItem] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn billing_currency(&self) -> &str {
        &self.billing_currency
    }
}
