//! Triangular arbitrage bot
//!
//! Wires configuration, logging and market data into a running scanner

pub mod logging;
pub mod settings;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use triarb_core::ProviderConfig;
use triarb_market_data::{http_client, HuobiClient, InMemoryMarketData, MarketDataProvider};

pub use logging::init_logging;
pub use settings::{load_settings, load_settings_from, CONFIG_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX};

/// Build the market data source: a replay fixture when one is configured,
/// otherwise the live exchange.
pub fn build_provider(config: &ProviderConfig) -> anyhow::Result<Arc<dyn MarketDataProvider>> {
    if let Some(path) = &config.replay_path {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay fixture {}", path))?;
        let provider = InMemoryMarketData::from_json(&raw)
            .with_context(|| format!("parsing replay fixture {}", path))?;
        info!("Replaying market data from {}", path);
        return Ok(Arc::new(provider));
    }

    let client = http_client(config)?;
    info!("Using live market data from {}", config.base_url);
    Ok(Arc::new(HuobiClient::new(client, config)))
}
