use anyhow::Context;
use clap::Parser;
use postcode_metrics::config::resolve_api_key;
use postcode_metrics::core::extractor::{
    average_price_from_raw, extract_avg_price, extract_rental_yield,
};
use postcode_metrics::core::fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use postcode_metrics::core::MarketDataSource;
use postcode_metrics::utils::logger;
use postcode_metrics::PropertyDataClient;
use std::time::Duration;

/// 抓一次端點並顯示各種擷取方式的結果，用來檢查回應格式是否改變
#[derive(Parser)]
#[command(name = "probe-endpoint")]
#[command(about = "Fetch one endpoint and show what the extractors find in it")]
struct Args {
    postcode: String,

    #[arg(default_value = "prices")]
    endpoint: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Skip printing the raw JSON body
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logger::init_cli_logger(false);

    let client = PropertyDataClient::new(
        &args.base_url,
        resolve_api_key(),
        Duration::from_secs(args.timeout_secs),
    )?;

    println!("🚀 Probing {}/{} for {}", client.base_url(), args.endpoint, args.postcode);

    let body = client
        .fetch(&args.postcode, &args.endpoint)
        .await
        .with_context(|| format!("fetching '{}' for {}", args.endpoint, args.postcode))?;

    if !args.quiet {
        println!("{}", serde_json::to_string_pretty(&body)?);
        println!();
    }

    let show = |name: &str, value: Option<f64>| match value {
        Some(v) => println!("  ✅ {:<22} {}", name, v),
        None => println!("  ❌ {:<22} missing", name),
    };

    println!("📊 Extraction results:");
    show("average price", extract_avg_price(&body));
    show("raw-data average price", average_price_from_raw(&body));
    show("rental yield", extract_rental_yield(&body));

    Ok(())
}
