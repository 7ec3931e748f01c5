use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 報表支援的指標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[serde(alias = "price")]
    AvgAskingPrice,
    #[serde(alias = "yield")]
    RentalYieldPct,
}

/// 每個指標對應的圖表外觀
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub title: &'static str,
    pub y_label: &'static str,
    pub color: (u8, u8, u8),
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::AvgAskingPrice, Metric::RentalYieldPct];

    /// API 端點名稱
    pub fn endpoint(&self) -> &'static str {
        match self {
            Metric::AvgAskingPrice => "prices",
            Metric::RentalYieldPct => "yields",
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::AvgAskingPrice => "Avg_asking_price",
            Metric::RentalYieldPct => "Rental_yield_pct",
        }
    }

    /// 輸出檔名（不含副檔名）
    pub fn file_stem(&self) -> &'static str {
        match self {
            Metric::AvgAskingPrice => "avg_price_postcodes",
            Metric::RentalYieldPct => "rental_yield_postcodes",
        }
    }

    pub fn chart_style(&self) -> ChartStyle {
        match self {
            Metric::AvgAskingPrice => ChartStyle {
                title: "Average Asking Price by Postcode",
                y_label: "Average Asking Price (£)",
                // skyblue
                color: (135, 206, 235),
            },
            Metric::RentalYieldPct => ChartStyle {
                title: "Average Rental Yield (%) by Postcode",
                y_label: "Rental Yield (%)",
                // orange
                color: (255, 165, 0),
            },
        }
    }

    /// 用於日誌與診斷的人類可讀名稱
    pub fn label(&self) -> &'static str {
        match self {
            Metric::AvgAskingPrice => "average price",
            Metric::RentalYieldPct => "rental yield",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" | "prices" | "avg_asking_price" => Ok(Metric::AvgAskingPrice),
            "yield" | "yields" | "rental_yield_pct" => Ok(Metric::RentalYieldPct),
            other => Err(format!(
                "unknown metric '{}', expected 'price' or 'yield'",
                other
            )),
        }
    }
}

/// 平均價格的擷取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceStrategy {
    /// 依關鍵字模糊搜尋整份回應
    #[default]
    Keywords,
    /// 取 `data.raw_data[*].price` 的平均
    RawAverage,
}

impl FromStr for PriceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keywords" => Ok(PriceStrategy::Keywords),
            "raw-average" | "raw_average" => Ok(PriceStrategy::RawAverage),
            other => Err(format!(
                "unknown price strategy '{}', expected 'keywords' or 'raw-average'",
                other
            )),
        }
    }
}

/// 單一郵遞區號的結果列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    #[serde(rename = "Postcode")]
    pub postcode: String,
    #[serde(rename = "Avg_asking_price")]
    pub avg_asking_price: Option<f64>,
    #[serde(rename = "Rental_yield_pct")]
    pub rental_yield_pct: Option<f64>,
}

impl MetricRow {
    pub fn new(postcode: impl Into<String>) -> Self {
        Self {
            postcode: postcode.into(),
            avg_asking_price: None,
            rental_yield_pct: None,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AvgAskingPrice => self.avg_asking_price,
            Metric::RentalYieldPct => self.rental_yield_pct,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::AvgAskingPrice => self.avg_asking_price = value,
            Metric::RentalYieldPct => self.rental_yield_pct = value,
        }
    }
}

/// 依輸入順序排列的結果表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    pub rows: Vec<MetricRow>,
    pub metrics: Vec<Metric>,
}

impl MetricTable {
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self {
            rows: Vec::new(),
            metrics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 有值的 (郵遞區號, 數值) 配對，保持原順序
    pub fn present_values(&self, metric: Metric) -> Vec<(&str, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.get(metric).map(|v| (row.postcode.as_str(), v)))
            .collect()
    }

    pub fn has_data(&self, metric: Metric) -> bool {
        self.rows.iter().any(|row| row.get(metric).is_some())
    }

    pub fn missing_count(&self, metric: Metric) -> usize {
        self.rows.iter().filter(|row| row.get(metric).is_none()).count()
    }

    /// 將欄位轉為數值：非有限值視為缺值（不是 0，也不是錯誤）
    pub fn coerce_numeric(&mut self) {
        for metric in self.metrics.clone() {
            for row in &mut self.rows {
                let coerced = row.get(metric).filter(|v| v.is_finite());
                row.set(metric, coerced);
            }
        }
    }

    /// 只保留郵遞區號與已請求欄位的 JSON 記錄，用於診斷輸出
    pub fn to_records(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = serde_json::Map::new();
                record.insert(
                    "Postcode".to_string(),
                    serde_json::Value::String(row.postcode.clone()),
                );
                for metric in &self.metrics {
                    let value = row
                        .get(*metric)
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null);
                    record.insert(metric.column_name().to_string(), value);
                }
                serde_json::Value::Object(record)
            })
            .collect()
    }
}
