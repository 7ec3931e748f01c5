use crate::config::{resolve_api_key, DEFAULT_POSTCODES};
use crate::core::fetcher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::{ApiKey, ConfigProvider, Metric, PriceStrategy};
use crate::utils::error::{MetricsError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "resolve_api_key")]
    pub api_key: ApiKey,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub name: Option<String>,
    #[serde(default = "default_postcodes")]
    pub postcodes: Vec<String>,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub price_strategy: PriceStrategy,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_postcodes() -> Vec<String> {
    DEFAULT_POSTCODES.iter().map(|p| p.to_string()).collect()
}

fn default_metrics() -> Vec<Metric> {
    Metric::ALL.to_vec()
}

fn default_output_path() -> String {
    ".".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: resolve_api_key(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            name: None,
            postcodes: default_postcodes(),
            metrics: default_metrics(),
            price_strategy: PriceStrategy::default(),
            output_path: default_output_path(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MetricsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| MetricsError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 未解析的 ${VAR} 或空字串視同未設定
        if config.api.api_key.is_empty() || config.api.api_key.expose().starts_with("${") {
            config.api.api_key = resolve_api_key();
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${PROPERTYDATA_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MetricsError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_non_empty_string("api.api_key", self.api.api_key.expose())?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        validation::validate_path("report.output_path", &self.report.output_path)?;
        validation::validate_postcodes("report.postcodes", &self.report.postcodes)?;

        if self.report.metrics.is_empty() {
            return Err(MetricsError::InvalidConfigValueError {
                field: "report.metrics".to_string(),
                value: "[]".to_string(),
                reason: "At least one metric (price, yield) is required".to_string(),
            });
        }

        Ok(())
    }

    pub fn report_name(&self) -> &str {
        self.report.name.as_deref().unwrap_or("postcode-report")
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn api_key(&self) -> &ApiKey {
        &self.api.api_key
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn postcodes(&self) -> &[String] {
        &self.report.postcodes
    }

    fn metrics(&self) -> &[Metric] {
        &self.report.metrics
    }

    fn price_strategy(&self) -> PriceStrategy {
        self.report.price_strategy
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
