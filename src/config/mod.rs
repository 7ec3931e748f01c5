#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::ApiKey;

/// 讀取 API 金鑰的環境變數
pub const API_KEY_ENV: &str = "PROPERTYDATA_API_KEY";
/// 未設定環境變數時的預設金鑰
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_POSTCODES: &[&str] = &["CB1", "CB2"];

/// 環境變數優先，否則使用內建預設值
pub fn resolve_api_key() -> ApiKey {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => ApiKey::new(key.trim()),
        _ => ApiKey::new(DEFAULT_API_KEY),
    }
}

pub fn is_default_key(key: &ApiKey) -> bool {
    key.expose() == DEFAULT_API_KEY
}
