//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{CoreError, CoreResult, Currency, OpportunityFilter};

/// Market data endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Minimum levels requested per depth call (the exchange accepts 5, 10 or 20)
    pub depth_levels: usize,
    /// Serve market data from a recorded JSON fixture instead of the exchange
    pub replay_path: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.huobi.pro".to_string(),
            user_agent: concat!("triarb/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_ms: 5_000,
            max_retries: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
            depth_levels: 5,
            replay_path: None,
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub reference_currency: Currency,
    /// Round-trip taker fee subtracted from the cycle return
    pub fee: f64,
    /// Book levels sampled per leg; 1 means top-of-book only
    pub book_levels: usize,
    pub scan_interval_ms: u64,
    /// 0 disables refreshing
    pub catalog_refresh_secs: u64,
    pub max_concurrent_cycles: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            reference_currency: Currency::new("usdt"),
            fee: 0.002,
            book_levels: 1,
            scan_interval_ms: 1_000,
            catalog_refresh_secs: 3_600,
            max_concurrent_cycles: 16,
        }
    }
}

impl DetectionConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    pub fn catalog_refresh(&self) -> Option<Duration> {
        (self.catalog_refresh_secs > 0).then(|| Duration::from_secs(self.catalog_refresh_secs))
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Complete bot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub provider: ProviderConfig,
    pub detection: DetectionConfig,
    pub report: OpportunityFilter,
    pub logging: LoggingConfig,
}

impl BotConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let d = &self.detection;
        if d.reference_currency.is_empty() {
            return Err(CoreError::InvalidConfig("reference_currency is empty".into()));
        }
        if !(0.0..1.0).contains(&d.fee) {
            return Err(CoreError::InvalidConfig(format!("fee {} outside [0, 1)", d.fee)));
        }
        if d.book_levels == 0 {
            return Err(CoreError::InvalidConfig("book_levels must be at least 1".into()));
        }
        if d.scan_interval_ms == 0 {
            return Err(CoreError::InvalidConfig("scan_interval_ms must be positive".into()));
        }
        if d.max_concurrent_cycles == 0 {
            return Err(CoreError::InvalidConfig(
                "max_concurrent_cycles must be at least 1".into(),
            ));
        }
        if self.provider.request_timeout_ms == 0 {
            return Err(CoreError::InvalidConfig("request_timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.fee, 0.002);
        assert_eq!(config.detection.book_levels, 1);
        assert_eq!(config.detection.reference_currency.as_str(), "usdt");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = BotConfig::default();
        config.detection.fee = 1.5;
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        let mut config = BotConfig::default();
        config.detection.book_levels = 0;
        assert!(config.validate().is_err());

        let mut config = BotConfig::default();
        config.detection.max_concurrent_cycles = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BotConfig =
            serde_json::from_str(r#"{"detection": {"reference_currency": "BTC"}, "logging": {"format": "json"}}"#)
                .unwrap();

        assert_eq!(config.detection.reference_currency.as_str(), "btc");
        assert_eq!(config.detection.scan_interval_ms, 1_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.provider.max_retries, 3);
    }

    #[test]
    fn test_refresh_disabled_at_zero() {
        let mut detection = DetectionConfig::default();
        detection.catalog_refresh_secs = 0;
        assert!(detection.catalog_refresh().is_none());
    }
}
