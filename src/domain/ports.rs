use crate::domain::model::{Metric, PriceStrategy};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_key(&self) -> &ApiKey;
    fn timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn postcodes(&self) -> &[String];
    fn metrics(&self) -> &[Metric];
    fn price_strategy(&self) -> PriceStrategy;
}

/// 市場資料來源；回傳未經處理的 JSON
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self, postcode: &str, endpoint: &str) -> Result<serde_json::Value>;
}

/// API 金鑰；Debug 與 Display 都不會輸出內容
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

impl std::str::FromStr for ApiKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
