//! Integration tests for a population run against a mock pricing API

use std::fs;
use std::io;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricefill::cache::RegionCache;
use pricefill::data::{Catalog, PricesClient, ServiceEntry};
use pricefill::driver::{Driver, PairOutcome};

const PRICES_PATH: &str = "/api/retail/prices";

fn client_for(server: &MockServer) -> PricesClient {
    PricesClient::with_options(
        &format!("{}{}", server.uri(), PRICES_PATH),
        Duration::from_secs(5),
        Duration::ZERO,
    )
    .expect("client should build")
}

fn read_sheet(temp_dir: &TempDir, relative: &str) -> Value {
    let content = fs::read_to_string(temp_dir.path().join(relative)).expect("cache file");
    serde_json::from_str(&content).expect("valid JSON")
}

#[tokio::test]
async fn test_multi_page_response_is_merged_into_one_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRICES_PATH))
        .and(query_param(
            "$filter",
            "serviceName eq 'Digital Twins' and armRegionName eq 'swedencentral'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [{"meterId": "a"}, {"meterId": "b"}],
            "NextPageLink": format!("{}{}?$skip=2", server.uri(), PRICES_PATH),
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PRICES_PATH))
        .and(query_param("$skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [{"meterId": "c"}],
        })))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let catalog = Catalog::new(
        vec![ServiceEntry::regional("Digital Twins", "azure_digital_twins")],
        vec!["swedencentral".to_string()],
    );
    let driver = Driver::new(
        client_for(&server),
        RegionCache::with_dir(temp_dir.path().to_path_buf()),
        catalog,
    )
    .with_write_delay(Duration::ZERO);

    let summary = driver.run(&mut io::sink()).await;

    assert_eq!(summary.reports[0].outcome, PairOutcome::Written { count: 3 });

    let sheet = read_sheet(&temp_dir, "swedencentral/azure_digital_twins.json");
    assert_eq!(sheet["Count"], 3);
    assert_eq!(sheet["BillingCurrency"], "USD");
    assert_eq!(sheet["CustomerEntityId"], "Default");
    assert_eq!(sheet["CustomerEntityType"], "Retail");
    assert_eq!(
        sheet["Items"],
        json!([{"meterId": "a"}, {"meterId": "b"}, {"meterId": "c"}])
    );
}

#[tokio::test]
async fn test_global_service_request_uses_global_region() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRICES_PATH))
        .and(query_param(
            "$filter",
            "serviceName eq 'Traffic Manager' and armRegionName eq 'Global'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [{"meterName": "DNS Queries"}],
        })))
        .expect(2)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let catalog = Catalog::new(
        vec![ServiceEntry::global("Traffic Manager", "azure_traffic_manager")],
        vec!["eastus2".to_string(), "brazilsouth".to_string()],
    );
    let driver = Driver::new(
        client_for(&server),
        RegionCache::with_dir(temp_dir.path().to_path_buf()),
        catalog,
    )
    .with_write_delay(Duration::ZERO);

    let summary = driver.run(&mut io::sink()).await;

    assert_eq!(summary.written(), 2);
    assert_eq!(read_sheet(&temp_dir, "eastus2/azure_traffic_manager.json")["Count"], 1);
    assert_eq!(read_sheet(&temp_dir, "brazilsouth/azure_traffic_manager.json")["Count"], 1);
}

#[tokio::test]
async fn test_failed_service_does_not_block_the_next_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param(
            "$filter",
            "serviceName eq 'IoT Hub' and armRegionName eq 'eastus2'",
        ))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param(
            "$filter",
            "serviceName eq 'SignalR' and armRegionName eq 'eastus2'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [{"meterId": "s1"}],
        })))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let catalog = Catalog::new(
        vec![
            ServiceEntry::regional("IoT Hub", "iot_hub"),
            ServiceEntry::regional("SignalR", "azure_signalr_service"),
        ],
        vec!["eastus2".to_string()],
    );
    let driver = Driver::new(
        client_for(&server),
        RegionCache::with_dir(temp_dir.path().to_path_buf()),
        catalog,
    )
    .with_write_delay(Duration::ZERO);

    let mut out = Vec::new();
    let summary = driver.run(&mut out).await;

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.written(), 1);
    assert!(!temp_dir.path().join("eastus2/iot_hub.json").exists());
    assert!(temp_dir.path().join("eastus2/azure_signalr_service.json").exists());

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("ERR  eastus2/iot_hub.json: HTTP 500"));
    assert!(output.contains("OK   eastus2/azure_signalr_service.json (1 items)"));
}
