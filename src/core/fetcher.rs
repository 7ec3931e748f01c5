use crate::core::{ApiKey, ConfigProvider, MarketDataSource};
use crate::utils::error::{MetricsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.propertydata.co.uk";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// PropertyData API 用戶端
#[derive(Debug, Clone)]
pub struct PropertyDataClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl PropertyDataClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetricsError::Transport(e.without_url()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.api_key().clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl MarketDataSource for PropertyDataClient {
    async fn fetch(&self, postcode: &str, endpoint: &str) -> Result<serde_json::Value> {
        let url = self.endpoint_url(endpoint);
        // 金鑰放在查詢參數裡，日誌只記錄不含參數的 URL
        tracing::debug!("📡 GET {} (postcode={})", url, postcode);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.expose()), ("postcode", postcode)])
            .send()
            .await
            .map_err(|e| MetricsError::Transport(e.without_url()))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(MetricsError::HttpStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                postcode: postcode.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MetricsError::Transport(e.without_url()))?;

        serde_json::from_slice(&body).map_err(|e| MetricsError::InvalidResponse {
            endpoint: endpoint.to_string(),
            message: format!("response body is not valid JSON: {}", e),
        })
    }
}
