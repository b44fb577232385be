//! Order book snapshot types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of an order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Resting buy orders, best (highest) price first
    Bid,
    /// Resting sell orders, best (lowest) price first
    Ask,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => f.write_str("bid"),
            BookSide::Ask => f.write_str("ask"),
        }
    }
}

/// One `[price, amount]` level as sent by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PriceLevel {
    pub price: f64,
    pub amount: f64,
}

impl PriceLevel {
    pub fn new(price: f64, amount: f64) -> Self {
        Self { price, amount }
    }

    /// Quote-currency value of the level
    pub fn notional(&self) -> f64 {
        self.price * self.amount
    }
}

impl From<[f64; 2]> for PriceLevel {
    fn from([price, amount]: [f64; 2]) -> Self {
        Self { price, amount }
    }
}

impl From<PriceLevel> for [f64; 2] {
    fn from(level: PriceLevel) -> Self {
        [level.price, level.amount]
    }
}

/// Immutable depth snapshot for one trading symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub symbol: String,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl OrderBookSnapshot {
    pub fn new(symbol: impl Into<String>, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self {
            symbol: symbol.into(),
            bids,
            asks,
            version: 0,
            timestamp_ms: 0,
        }
    }

    pub fn side(&self, side: BookSide) -> &[PriceLevel] {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }
}
