pub mod chart;
pub mod engine;
pub mod extractor;
pub mod fetcher;
pub mod reporter;

pub use crate::domain::model::{Metric, MetricRow, MetricTable, PriceStrategy};
pub use crate::domain::ports::{ApiKey, ConfigProvider, MarketDataSource, Storage};
pub use crate::utils::error::Result;
