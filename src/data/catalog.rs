//! Static catalog of services and regions to populate
//!
//! The catalog is plain data: callers build one (usually via
//! [`Catalog::azure_defaults`]) and hand it to the driver.

/// Region token used for services whose prices are not region-specific
pub const GLOBAL_REGION: &str = "Global";

/// A service queried from the pricing API and the file stem it is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Service name exactly as the API's `serviceName` field spells it
    pub api_name: String,
    /// Output file name without the `.json` extension
    pub file_stem: String,
    /// Whether the service is priced under the `Global` pseudo-region
    pub global_pricing: bool,
}

impl ServiceEntry {
    pub fn regional(api_name: &str, file_stem: &str) -> Self {
        Self {
            api_name: api_name.to_string(),
            file_stem: file_stem.to_string(),
            global_pricing: false,
        }
    }

    pub fn global(api_name: &str, file_stem: &str) -> Self {
        Self {
            global_pricing: true,
            ..Self::regional(api_name, file_stem)
        }
    }

    /// Region token to send to the API while iterating `region`
    ///
    /// Global-pricing services always resolve to [`GLOBAL_REGION`]; the
    /// output path keeps using the iterated region.
    pub fn api_region<'a>(&self, region: &'a str) -> &'a str {
        if self.global_pricing {
            GLOBAL_REGION
        } else {
            region
        }
    }
}

/// Services and regions to populate, in processing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub services: Vec<ServiceEntry>,
    pub regions: Vec<String>,
}

impl Catalog {
    pub fn new(services: Vec<ServiceEntry>, regions: Vec<String>) -> Self {
        Self { services, regions }
    }

    /// The Azure services and regions the pricing data set is built from
    pub fn azure_defaults() -> Self {
        let services = vec![
            ServiceEntry::regional("IoT Hub", "iot_hub"),
            ServiceEntry::regional("IoT Central", "azure_iot_central"),
            ServiceEntry::regional("Digital Twins", "azure_digital_twins"),
            ServiceEntry::regional("Azure Container Apps", "azure_container_apps"),
            ServiceEntry::global("Load Balancer", "azure_load_balancer"),
            ServiceEntry::global("Traffic Manager", "azure_traffic_manager"),
            ServiceEntry::regional("SignalR", "azure_signalr_service"),
            ServiceEntry::regional("Azure API for FHIR", "azure_api_for_fhir"),
        ];
        let regions = ["eastus2", "canadacentral", "swedencentral", "westeurope", "brazilsouth"]
            .iter()
            .map(|r| r.to_string())
            .collect();

        Self::new(services, regions)
    }

    /// Number of (service, region) pairs a run will visit
    pub fn pair_count(&self) -> usize {
        self.services.len() * self.regions.len()
    }
}
