//! Huobi spot REST market data
//!
//! Endpoints used:
//! - `GET /v1/common/symbols` for the pair listing
//! - `GET /market/depth?symbol=<s>&type=step0` for order book snapshots
//!
//! Both wrap their payload in an envelope whose `status` is `"ok"` or
//! `"error"`; errors carry `err-code` / `err-msg`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use triarb_core::{
    MarketDataError, MarketDataResult, OrderBookSnapshot, Pair, PriceLevel, ProviderConfig,
};

use crate::provider::MarketDataProvider;
use crate::retry::RetryPolicy;

const SYMBOLS_PATH: &str = "/v1/common/symbols";
const DEPTH_PATH: &str = "/market/depth";

/// Depth sizes the endpoint accepts; anything larger gets the full 150 levels
const DEPTH_SIZES: [usize; 3] = [5, 10, 20];

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(rename = "err-code")]
    err_code: Option<String>,
    #[serde(rename = "err-msg")]
    err_msg: Option<String>,
    #[serde(alias = "tick")]
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> MarketDataResult<T> {
        if self.status != "ok" {
            return Err(MarketDataError::Provider {
                status: self.err_code.unwrap_or(self.status),
                message: self.err_msg.unwrap_or_else(|| "exchange server error".to_string()),
            });
        }
        self.data
            .ok_or_else(|| MarketDataError::Decode("envelope has no payload".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct DepthTick {
    #[serde(default)]
    bids: Vec<PriceLevel>,
    #[serde(default)]
    asks: Vec<PriceLevel>,
    #[serde(default)]
    version: u64,
    #[serde(default)]
    ts: u64,
}

fn decode<T: DeserializeOwned>(body: &str) -> MarketDataResult<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| MarketDataError::Decode(e.to_string()))?;
    envelope.into_result()
}

/// Parse a `/v1/common/symbols` response body, keeping online markets only
pub fn decode_symbols(body: &str) -> MarketDataResult<Vec<Pair>> {
    let listed: Vec<Pair> = decode(body)?;
    let total = listed.len();
    let online: Vec<Pair> = listed.into_iter().filter(Pair::is_online).collect();
    if online.len() < total {
        debug!("Skipped {} symbols that are not online", total - online.len());
    }
    Ok(online)
}

/// Parse a `/market/depth` response body for `symbol`
pub fn decode_depth(body: &str, symbol: &str) -> MarketDataResult<OrderBookSnapshot> {
    let tick: DepthTick = decode(body)?;
    Ok(OrderBookSnapshot {
        symbol: symbol.to_string(),
        bids: tick.bids,
        asks: tick.asks,
        version: tick.version,
        timestamp_ms: tick.ts,
    })
}

/// Smallest accepted depth size covering `hint`, or `None` for the default
fn depth_param(hint: usize) -> Option<usize> {
    if hint == 0 {
        return None;
    }
    DEPTH_SIZES.iter().copied().find(|&size| size >= hint)
}

/// Build the shared HTTP client used for every request
pub fn http_client(config: &ProviderConfig) -> MarketDataResult<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| MarketDataError::Fetch(e.to_string()))
}

/// Huobi REST client
#[derive(Debug, Clone)]
pub struct HuobiClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    min_depth: usize,
    retry: RetryPolicy,
}

impl HuobiClient {
    /// `client` is long-lived and shared; build it once with [`http_client`].
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
            min_depth: config.depth_levels,
            retry: RetryPolicy::from_config(config),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn get_once(&self, path: &str, query: &[(&str, String)]) -> MarketDataResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let timeout_ms = self.request_timeout.as_millis() as u64;

        let request = self.client.get(&url).query(query).send();
        let response = match timeout(self.request_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(MarketDataError::Timeout(timeout_ms)),
            Ok(Err(e)) => return Err(MarketDataError::Fetch(e.to_string())),
            Err(_) => return Err(MarketDataError::Timeout(timeout_ms)),
        };

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                warn!("Huobi rate limit hit on {}", path);
            }
            return Err(MarketDataError::Provider {
                status: status.as_u16().to_string(),
                message: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::Fetch(e.to_string()))
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> MarketDataResult<String> {
        self.retry.run(path, || self.get_once(path, query)).await
    }
}

#[async_trait]
impl MarketDataProvider for HuobiClient {
    fn name(&self) -> &'static str {
        "huobi"
    }

    async fn fetch_pairs(&self) -> MarketDataResult<Vec<Pair>> {
        let body = self.get(SYMBOLS_PATH, &[]).await?;
        decode_symbols(&body)
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth_hint: usize,
    ) -> MarketDataResult<OrderBookSnapshot> {
        let mut query = vec![("symbol", symbol.to_string()), ("type", "step0".to_string())];
        if let Some(depth) = depth_param(depth_hint.max(self.min_depth)) {
            query.push(("depth", depth.to_string()));
        }

        let body = self.get(DEPTH_PATH, &query).await?;
        let book = decode_depth(&body, symbol)?;
        debug!(
            "Depth {} v{}: {} bids (best {:?}), {} asks (best {:?})",
            symbol,
            book.version,
            book.bids.len(),
            book.best_bid().map(|l| l.price),
            book.asks.len(),
            book.best_ask().map(|l| l.price)
        );
        Ok(book)
    }
}
