pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{storage::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{engine::ReportEngine, fetcher::PropertyDataClient, reporter::Reporter};
pub use domain::model::{Metric, MetricRow, MetricTable, PriceStrategy};
pub use utils::error::{MetricsError, Result};
