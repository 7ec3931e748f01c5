use clap::Parser;
use postcode_metrics::config::is_default_key;
use postcode_metrics::utils::error::ErrorSeverity;
use postcode_metrics::utils::{logger, validation::Validate};
use postcode_metrics::{CliConfig, LocalStorage, PropertyDataClient, ReportEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 只在存在時載入
    dotenvy::dotenv().ok();

    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting postcode-metrics CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if is_default_key(&config.api_key) {
        tracing::warn!("🔑 PROPERTYDATA_API_KEY not set, using the built-in default key");
    }

    let client = match PropertyDataClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    let storage = LocalStorage::new(config.output_path.clone());
    let engine = ReportEngine::new(client, storage, config);

    match engine.run().await {
        Ok(summary) => {
            for metric in &summary.metrics {
                match &metric.chart_path {
                    Some(path) => println!(
                        "📊 {}: {}/{} postcodes charted -> {}",
                        metric.metric, metric.present, metric.rows, path
                    ),
                    None => println!("📭 {}: no data, chart skipped", metric.metric),
                }
                println!("📁 Table saved to: {}", metric.csv_path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
