use clap::Parser;
use postcode_metrics::config::is_default_key;
use postcode_metrics::core::ConfigProvider;
use postcode_metrics::utils::error::ErrorSeverity;
use postcode_metrics::utils::{logger, validation::Validate};
use postcode_metrics::{LocalStorage, PropertyDataClient, ReportEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Postcode market report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "report.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the postcode list from config (comma separated)
    #[arg(long, value_delimiter = ',')]
    postcodes: Option<Vec<String>>,

    /// Dry run - show what would be fetched without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based postcode report");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(postcodes) = args.postcodes.clone() {
        tracing::info!("🔧 Postcodes overridden to: {}", postcodes.join(", "));
        config.report.postcodes = postcodes;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&config);
        return Ok(());
    }

    if is_default_key(config.api_key()) {
        tracing::warn!("🔑 PROPERTYDATA_API_KEY not set, using the built-in default key");
    }

    let client = match PropertyDataClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };
    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = ReportEngine::new(client, storage, config);

    match engine.run().await {
        Ok(summary) => {
            println!("✅ Report completed, {} chart(s) written", summary.charts().len());
            for path in summary.charts() {
                println!("📊 {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report_name());
    println!("  API: {}", config.base_url());
    println!("  Timeout: {:?}", config.timeout());
    println!("  Postcodes: {}", config.postcodes().join(", "));
    println!(
        "  Metrics: {}",
        config
            .metrics()
            .iter()
            .map(|m| m.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Price strategy: {:?}", config.price_strategy());
    println!("  Output: {}", config.output_path());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Requests that would be sent:");
    for metric in config.metrics() {
        for postcode in config.postcodes() {
            println!(
                "  GET {}/{}?postcode={}",
                config.base_url().trim_end_matches('/'),
                metric.endpoint(),
                postcode
            );
        }
    }

    println!();
    println!("💾 Files that may be written:");
    for metric in config.metrics() {
        println!("  {}/{}.svg", config.output_path(), metric.file_stem());
        println!("  {}/{}.csv", config.output_path(), metric.file_stem());
    }

    if config.postcodes().is_empty() {
        println!();
        println!("⚠️ Postcode list is empty: the tables will be empty and no chart is drawn");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
