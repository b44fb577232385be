//! In-memory market data for offline replays and tests
//!
//! Uses DashMap so books can be swapped while scans are reading them.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use triarb_core::{MarketDataError, MarketDataResult, OrderBookSnapshot, Pair};

use crate::provider::MarketDataProvider;

/// Recorded market state: a pair listing plus one snapshot per symbol
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayFixture {
    pub pairs: Vec<Pair>,
    #[serde(default)]
    pub books: Vec<OrderBookSnapshot>,
}

/// Provider serving a fixed pair listing and mutable per-symbol books
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    pairs: RwLock<Vec<Pair>>,
    books: DashMap<String, OrderBookSnapshot>,
    failing: DashMap<String, String>,
    catalog_down: AtomicBool,
    book_fetches: AtomicU64,
}

impl InMemoryMarketData {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self {
            pairs: RwLock::new(pairs),
            ..Self::default()
        }
    }

    pub fn from_fixture(fixture: ReplayFixture) -> Self {
        let provider = Self::new(fixture.pairs);
        for book in fixture.books {
            provider.insert_book(book);
        }
        provider
    }

    /// Parse a JSON [`ReplayFixture`]
    pub fn from_json(raw: &str) -> MarketDataResult<Self> {
        let fixture: ReplayFixture =
            serde_json::from_str(raw).map_err(|e| MarketDataError::Decode(e.to_string()))?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn set_pairs(&self, pairs: Vec<Pair>) {
        *self.pairs.write() = pairs;
    }

    /// Insert or replace the book for `book.symbol`
    pub fn insert_book(&self, book: OrderBookSnapshot) {
        self.books.insert(book.symbol.clone(), book);
    }

    /// Make every fetch of `symbol` fail with a transport error
    pub fn fail_symbol(&self, symbol: &str, reason: &str) {
        self.failing.insert(symbol.to_string(), reason.to_string());
    }

    pub fn restore_symbol(&self, symbol: &str) {
        self.failing.remove(symbol);
    }

    pub fn fail_catalog(&self, down: bool) {
        self.catalog_down.store(down, Ordering::Relaxed);
    }

    /// Number of order book requests served or refused so far
    pub fn book_fetches(&self) -> u64 {
        self.book_fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketData {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_pairs(&self) -> MarketDataResult<Vec<Pair>> {
        if self.catalog_down.load(Ordering::Relaxed) {
            return Err(MarketDataError::Fetch("pair listing unavailable".to_string()));
        }
        Ok(self.pairs.read().clone())
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        _depth_hint: usize,
    ) -> MarketDataResult<OrderBookSnapshot> {
        self.book_fetches.fetch_add(1, Ordering::Relaxed);

        if let Some(reason) = self.failing.get(symbol) {
            return Err(MarketDataError::Fetch(reason.value().clone()));
        }

        self.books
            .get(symbol)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| MarketDataError::Provider {
                status: "invalid-parameter".to_string(),
                message: format!("no book for {}", symbol),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triarb_core::PriceLevel;

    #[tokio::test]
    async fn test_serves_and_replaces_books() {
        let provider = InMemoryMarketData::new(vec![Pair::new("btc", "usdt")]);
        provider.insert_book(OrderBookSnapshot::new(
            "btcusdt",
            vec![PriceLevel::new(100.0, 1.0)],
            vec![],
        ));

        let book = provider.fetch_order_book("btcusdt", 1).await.unwrap();
        assert_eq!(book.bids[0].price, 100.0);

        provider.insert_book(OrderBookSnapshot::new(
            "btcusdt",
            vec![PriceLevel::new(101.0, 1.0)],
            vec![],
        ));
        let book = provider.fetch_order_book("btcusdt", 1).await.unwrap();
        assert_eq!(book.bids[0].price, 101.0);
        assert_eq!(provider.book_fetches(), 2);
    }

    #[tokio::test]
    async fn test_missing_and_failing_symbols() {
        let provider = InMemoryMarketData::new(vec![]);
        provider.insert_book(OrderBookSnapshot::new("ethusdt", vec![], vec![]));
        provider.fail_symbol("ethusdt", "connection reset");

        assert!(matches!(
            provider.fetch_order_book("ethusdt", 1).await,
            Err(MarketDataError::Fetch(_))
        ));
        assert!(matches!(
            provider.fetch_order_book("xrpusdt", 1).await,
            Err(MarketDataError::Provider { .. })
        ));

        provider.restore_symbol("ethusdt");
        assert!(provider.fetch_order_book("ethusdt", 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_fixture_from_json() {
        let raw = r#"{
            "pairs": [{"base-currency": "btc", "quote-currency": "usdt"}],
            "books": [{"symbol": "btcusdt", "bids": [[50000, 2]], "asks": [[50010, 1]],
                       "version": 7, "timestamp_ms": 0}]
        }"#;
        let provider = InMemoryMarketData::from_json(raw).unwrap();

        assert_eq!(provider.fetch_pairs().await.unwrap().len(), 1);
        let book = provider.fetch_order_book("btcusdt", 1).await.unwrap();
        assert_eq!(book.version, 7);
        assert_eq!(book.asks[0].price, 50010.0);
    }
}
