use crate::core::extractor::{average_price_from_raw, extract_avg_price, extract_rental_yield};
use crate::core::{MarketDataSource, Metric, MetricRow, MetricTable, PriceStrategy};
use crate::utils::error::Result;

/// 依序抓取每個郵遞區號並組成結果表
pub struct Reporter<'a, M: MarketDataSource + ?Sized> {
    source: &'a M,
    price_strategy: PriceStrategy,
}

impl<'a, M: MarketDataSource + ?Sized> Reporter<'a, M> {
    pub fn new(source: &'a M) -> Self {
        Self {
            source,
            price_strategy: PriceStrategy::default(),
        }
    }

    pub fn with_price_strategy(mut self, strategy: PriceStrategy) -> Self {
        self.price_strategy = strategy;
        self
    }

    /// 單一郵遞區號失敗時只記錄警告，該列剩下的欄位保持缺值，繼續下一個。
    pub async fn build_table(
        &self,
        postcodes: &[String],
        want_price: bool,
        want_yield: bool,
    ) -> MetricTable {
        let mut metrics = Vec::new();
        if want_price {
            metrics.push(Metric::AvgAskingPrice);
        }
        if want_yield {
            metrics.push(Metric::RentalYieldPct);
        }

        let mut table = MetricTable::new(metrics);

        for postcode in postcodes {
            let mut row = MetricRow::new(postcode.clone());

            if let Err(e) = self.fill_row(&mut row, &table.metrics).await {
                tracing::warn!("⚠️ Fetch failed for {}: {}", postcode, e);
            }

            table.rows.push(row);
        }

        table.coerce_numeric();

        tracing::info!(
            "📋 Built table with {} rows for {}",
            table.len(),
            table
                .metrics
                .iter()
                .map(|m| m.label())
                .collect::<Vec<_>>()
                .join(", ")
        );

        table
    }

    async fn fill_row(&self, row: &mut MetricRow, metrics: &[Metric]) -> Result<()> {
        for metric in metrics {
            let response = self.source.fetch(&row.postcode, metric.endpoint()).await?;
            let value = self.extract(*metric, &response);

            if value.is_none() {
                tracing::debug!("No {} found in response for {}", metric, row.postcode);
            }
            row.set(*metric, value);
        }
        Ok(())
    }

    fn extract(&self, metric: Metric, response: &serde_json::Value) -> Option<f64> {
        match (metric, self.price_strategy) {
            (Metric::AvgAskingPrice, PriceStrategy::Keywords) => extract_avg_price(response),
            (Metric::AvgAskingPrice, PriceStrategy::RawAverage) => average_price_from_raw(response),
            (Metric::RentalYieldPct, _) => extract_rental_yield(response),
        }
    }
}
