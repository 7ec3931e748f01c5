use crate::core::chart::render_bar_chart;
use crate::core::reporter::Reporter;
use crate::core::{ConfigProvider, MarketDataSource, Metric, MetricTable, Storage};
use crate::utils::error::{MetricsError, Result};
use std::path::Path;

/// 單一指標的執行結果
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub metric: Metric,
    pub rows: usize,
    pub present: usize,
    pub chart_path: Option<String>,
    pub csv_path: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    pub metrics: Vec<MetricSummary>,
}

impl ReportSummary {
    pub fn charts(&self) -> Vec<&str> {
        self.metrics
            .iter()
            .filter_map(|m| m.chart_path.as_deref())
            .collect()
    }
}

pub struct ReportEngine<M: MarketDataSource, S: Storage, C: ConfigProvider> {
    source: M,
    storage: S,
    config: C,
}

impl<M: MarketDataSource, S: Storage, C: ConfigProvider> ReportEngine<M, S, C> {
    pub fn new(source: M, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    /// 每個指標各自建表（價格與收益率互不影響），再輸出圖表與 CSV。
    pub async fn run(&self) -> Result<ReportSummary> {
        let postcodes = self.config.postcodes();
        tracing::info!(
            "🚀 Starting report for {} postcode(s): {}",
            postcodes.len(),
            postcodes.join(", ")
        );

        let reporter = Reporter::new(&self.source).with_price_strategy(self.config.price_strategy());
        let mut summary = ReportSummary::default();

        for metric in self.config.metrics() {
            let table = reporter
                .build_table(
                    postcodes,
                    *metric == Metric::AvgAskingPrice,
                    *metric == Metric::RentalYieldPct,
                )
                .await;

            summary.metrics.push(self.publish(*metric, &table).await?);
        }

        tracing::info!("✅ Report finished, {} chart(s) written", summary.charts().len());
        Ok(summary)
    }

    async fn publish(&self, metric: Metric, table: &MetricTable) -> Result<MetricSummary> {
        let points = table.present_values(metric);

        let chart_path = if points.is_empty() {
            tracing::warn!("📭 No {} data available to plot, skipping chart", metric);
            println!("No {} data available to plot. Debug info:", metric);
            println!("{}", serde_json::to_string(&table.to_records())?);
            None
        } else {
            let svg = render_bar_chart(metric, &points)?;
            let filename = format!("{}.svg", metric.file_stem());
            self.storage.write_file(&filename, svg.as_bytes()).await?;
            tracing::info!("📊 {} chart saved ({} bars)", metric, points.len());
            Some(self.output_file(&filename))
        };

        let filename = format!("{}.csv", metric.file_stem());
        let csv_data = table_to_csv(table, metric)?;
        self.storage.write_file(&filename, &csv_data).await?;
        tracing::debug!("Wrote {} ({} bytes)", filename, csv_data.len());

        Ok(MetricSummary {
            metric,
            rows: table.len(),
            present: points.len(),
            chart_path,
            csv_path: self.output_file(&filename),
        })
    }

    fn output_file(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

/// 缺值輸出為空欄位
pub fn table_to_csv(table: &MetricTable, metric: Metric) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Postcode", metric.column_name()])?;

    for row in &table.rows {
        let value = row.get(metric).map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([row.postcode.as_str(), value.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| MetricsError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiKey, MetricRow, PriceStrategy};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticSource(HashMap<String, Value>);

    #[async_trait]
    impl MarketDataSource for StaticSource {
        async fn fetch(&self, postcode: &str, endpoint: &str) -> Result<Value> {
            self.0
                .get(&format!("{}/{}", endpoint, postcode))
                .cloned()
                .ok_or_else(|| MetricsError::HttpStatus {
                    status: 404,
                    endpoint: endpoint.to_string(),
                    postcode: postcode.to_string(),
                })
        }
    }

    struct TestConfig {
        api_key: ApiKey,
        postcodes: Vec<String>,
        metrics: Vec<Metric>,
    }

    impl TestConfig {
        fn new(postcodes: &[&str]) -> Self {
            Self {
                api_key: ApiKey::new("k"),
                postcodes: postcodes.iter().map(|p| p.to_string()).collect(),
                metrics: Metric::ALL.to_vec(),
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn base_url(&self) -> &str {
            "http://localhost"
        }
        fn api_key(&self) -> &ApiKey {
            &self.api_key
        }
        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }
        fn output_path(&self) -> &str {
            "./out"
        }
        fn postcodes(&self) -> &[String] {
            &self.postcodes
        }
        fn metrics(&self) -> &[Metric] {
            &self.metrics
        }
        fn price_strategy(&self) -> PriceStrategy {
            PriceStrategy::Keywords
        }
    }

    #[tokio::test]
    async fn test_charts_only_for_columns_with_data() {
        let mut responses = HashMap::new();
        responses.insert("prices/CB1".to_string(), json!({"data": {"average": 450000}}));
        responses.insert("prices/CB2".to_string(), json!({"data": {"average": "£520,000"}}));
        // yields 全部 404

        let storage = MockStorage::new();
        let engine = ReportEngine::new(
            StaticSource(responses),
            storage.clone(),
            TestConfig::new(&["CB1", "CB2"]),
        );

        let summary = engine.run().await.unwrap();

        assert_eq!(summary.metrics.len(), 2);
        assert_eq!(summary.metrics[0].present, 2);
        assert_eq!(summary.metrics[1].present, 0);
        assert_eq!(summary.charts().len(), 1);

        assert!(storage.get_file("avg_price_postcodes.svg").await.is_some());
        assert!(storage.get_file("rental_yield_postcodes.svg").await.is_none());

        let csv = storage.get_file("rental_yield_postcodes.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Postcode,Rental_yield_pct\nCB1,\nCB2,\n"
        );
    }

    #[tokio::test]
    async fn test_empty_postcode_list_writes_no_chart() {
        let storage = MockStorage::new();
        let engine = ReportEngine::new(
            StaticSource(HashMap::new()),
            storage.clone(),
            TestConfig::new(&[]),
        );

        let summary = engine.run().await.unwrap();

        assert!(summary.charts().is_empty());
        assert!(summary.metrics.iter().all(|m| m.rows == 0));
        assert!(storage.get_file("avg_price_postcodes.svg").await.is_none());
    }

    #[test]
    fn test_table_to_csv() {
        let mut table = MetricTable::new(vec![Metric::AvgAskingPrice]);
        let mut row = MetricRow::new("CB1");
        row.avg_asking_price = Some(350000.0);
        table.rows.push(row);
        table.rows.push(MetricRow::new("SW1"));

        let csv = table_to_csv(&table, Metric::AvgAskingPrice).unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Postcode,Avg_asking_price\nCB1,350000\nSW1,\n"
        );
    }
}
