//! Market data access for the scanner
//!
//! Features:
//! - Provider trait shared by live and offline sources
//! - Huobi REST client with per-request timeouts
//! - Bounded retry with exponential backoff for transient failures
//! - In-memory provider for replays and tests

pub mod huobi;
pub mod memory;
pub mod provider;
pub mod retry;

pub use huobi::{http_client, HuobiClient};
pub use memory::{InMemoryMarketData, ReplayFixture};
pub use provider::{load_catalog, MarketDataProvider};
pub use retry::RetryPolicy;
