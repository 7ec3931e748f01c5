use crate::config::{API_KEY_ENV, DEFAULT_API_KEY};
use crate::core::fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::{ApiKey, ConfigProvider, Metric, PriceStrategy};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "postcode-metrics")]
#[command(about = "Fetch UK postcode market metrics and chart them")]
pub struct CliConfig {
    #[arg(long, value_delimiter = ',', default_value = "CB1,CB2")]
    pub postcodes: Vec<String>,

    #[arg(long, value_delimiter = ',', default_value = "price,yield")]
    pub metrics: Vec<Metric>,

    #[arg(long, default_value = "keywords", help = "keywords | raw-average")]
    pub price_strategy: PriceStrategy,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = API_KEY_ENV,
        default_value = DEFAULT_API_KEY,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub api_key: ApiKey,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn postcodes(&self) -> &[String] {
        &self.postcodes
    }

    fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    fn price_strategy(&self) -> PriceStrategy {
        self.price_strategy
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("api_key", self.api_key.expose())?;
        validation::validate_range("timeout_secs", self.timeout_secs, 1, 300)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_postcodes("postcodes", &self.postcodes)?;
        Ok(())
    }
}
