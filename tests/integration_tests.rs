use httpmock::prelude::*;
use postcode_metrics::{
    CliConfig, LocalStorage, Metric, PriceStrategy, PropertyDataClient, ReportEngine, TomlConfig,
};
use postcode_metrics::core::ApiKey;
use std::path::Path;
use tempfile::TempDir;

fn cli_config(base_url: String, output_path: &str, postcodes: &[&str]) -> CliConfig {
    CliConfig {
        postcodes: postcodes.iter().map(|p| p.to_string()).collect(),
        metrics: vec![Metric::AvgAskingPrice, Metric::RentalYieldPct],
        price_strategy: PriceStrategy::Keywords,
        base_url,
        api_key: ApiKey::new("TESTKEY"),
        timeout_secs: 5,
        output_path: output_path.to_string(),
        verbose: false,
        json_logs: false,
    }
}

#[tokio::test]
async fn test_end_to_end_report_with_real_http() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let cb1_prices = server.mock(|when, then| {
        when.method(GET)
            .path("/prices")
            .query_param("key", "TESTKEY")
            .query_param("postcode", "CB1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "success",
                "postcode": "CB1",
                "data": {"points_analysed": 40, "average": "£512,250"}
            }));
    });
    let cb2_prices = server.mock(|when, then| {
        when.method(GET).path("/prices").query_param("postcode", "CB2");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"data": {"average": 645000}}));
    });
    let yields = server.mock(|when, then| {
        when.method(GET).path("/yields");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "data": {"long_let": {"points_analysed": 22, "gross_yield": "3.4%"}}
            }));
    });

    let config = cli_config(server.base_url(), &output_path, &["CB1", "CB2"]);
    let client = PropertyDataClient::from_config(&config).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let engine = ReportEngine::new(client, storage, config);

    let summary = engine.run().await.unwrap();

    cb1_prices.assert();
    cb2_prices.assert();
    yields.assert_hits(2);

    assert_eq!(summary.charts().len(), 2);
    assert!(Path::new(&output_path).join("avg_price_postcodes.svg").exists());
    assert!(Path::new(&output_path).join("rental_yield_postcodes.svg").exists());

    let price_csv =
        std::fs::read_to_string(Path::new(&output_path).join("avg_price_postcodes.csv")).unwrap();
    assert_eq!(price_csv, "Postcode,Avg_asking_price\nCB1,512250\nCB2,645000\n");

    let yield_csv =
        std::fs::read_to_string(Path::new(&output_path).join("rental_yield_postcodes.csv"))
            .unwrap();
    assert_eq!(yield_csv, "Postcode,Rental_yield_pct\nCB1,3.4\nCB2,3.4\n");
}

#[tokio::test]
async fn test_failing_postcode_does_not_abort_batch() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/prices").query_param("postcode", "CB2");
        then.status(200).json_body(serde_json::json!({"data": {"average": 600000}}));
    });
    let failing = server.mock(|when, then| {
        when.method(GET).path("/prices").query_param("postcode", "SW1");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/prices").query_param("postcode", "M1");
        then.status(200).json_body(serde_json::json!({"data": {"average": "250,000"}}));
    });

    let mut config = cli_config(server.base_url(), &output_path, &["CB2", "SW1", "M1"]);
    config.metrics = vec![Metric::AvgAskingPrice];

    let client = PropertyDataClient::from_config(&config).unwrap();
    let engine = ReportEngine::new(client, LocalStorage::new(output_path.clone()), config);

    let summary = engine.run().await.unwrap();

    failing.assert();
    assert_eq!(summary.metrics.len(), 1);
    assert_eq!(summary.metrics[0].rows, 3);
    assert_eq!(summary.metrics[0].present, 2);

    let csv =
        std::fs::read_to_string(Path::new(&output_path).join("avg_price_postcodes.csv")).unwrap();
    assert_eq!(csv, "Postcode,Avg_asking_price\nCB2,600000\nSW1,\nM1,250000\n");
}

#[tokio::test]
async fn test_all_missing_metric_writes_no_chart() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/yields");
        then.status(200)
            .json_body(serde_json::json!({"status": "success", "message": "not enough data"}));
    });

    let mut config = cli_config(server.base_url(), &output_path, &["CB1", "CB2"]);
    config.metrics = vec![Metric::RentalYieldPct];

    let client = PropertyDataClient::from_config(&config).unwrap();
    let engine = ReportEngine::new(client, LocalStorage::new(output_path.clone()), config);

    let summary = engine.run().await.unwrap();

    assert!(summary.charts().is_empty());
    assert!(!Path::new(&output_path).join("rental_yield_postcodes.svg").exists());
    assert!(Path::new(&output_path).join("rental_yield_postcodes.csv").exists());
}

#[tokio::test]
async fn test_empty_postcode_list_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({}));
    });

    let toml_content = format!(
        r#"
[api]
base_url = "{}"
api_key = "TESTKEY"

[report]
postcodes = []
output_path = "{}"
"#,
        server.base_url(),
        output_path
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let client = PropertyDataClient::from_config(&config).unwrap();
    let engine = ReportEngine::new(client, LocalStorage::new(output_path.clone()), config);

    let summary = engine.run().await.unwrap();

    api_mock.assert_hits(0);
    assert!(summary.charts().is_empty());
    assert!(summary.metrics.iter().all(|m| m.rows == 0));
    assert!(!Path::new(&output_path).join("avg_price_postcodes.svg").exists());
}

#[tokio::test]
async fn test_raw_average_strategy_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/prices").query_param("postcode", "CB2");
        then.status(200).json_body(serde_json::json!({
            "data": {
                "average": 1,
                "raw_data": [{"price": 300000}, {"price": 400000}, {"price": 500000}]
            }
        }));
    });

    let toml_content = format!(
        r#"
[api]
base_url = "{}"
api_key = "TESTKEY"

[report]
postcodes = ["CB2"]
metrics = ["price"]
price_strategy = "raw-average"
output_path = "{}"
"#,
        server.base_url(),
        output_path
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let client = PropertyDataClient::from_config(&config).unwrap();
    let engine = ReportEngine::new(client, LocalStorage::new(output_path.clone()), config);

    engine.run().await.unwrap();

    let csv =
        std::fs::read_to_string(Path::new(&output_path).join("avg_price_postcodes.csv")).unwrap();
    assert_eq!(csv, "Postcode,Avg_asking_price\nCB2,400000\n");
}
