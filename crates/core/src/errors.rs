//! Error types

use thiserror::Error;

use crate::{BookSide, Currency};

/// Core error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("No tradable pair between {0} and {1}")]
    PairNotFound(Currency, Currency),

    #[error("Cannot convert {from} -> {to} on {symbol}")]
    DirectionMismatch {
        from: Currency,
        to: Currency,
        symbol: String,
    },

    #[error("No usable {side} liquidity on {symbol}")]
    EmptyBookSide { symbol: String, side: BookSide },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Market data provider errors
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request failed: {0}")]
    Fetch(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Provider reported error (status {status}): {message}")]
    Provider { status: String, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<MarketDataError>,
    },
}

impl MarketDataError {
    /// Transport failures and throttling are worth another attempt; logical
    /// errors and malformed bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MarketDataError::Fetch(_) | MarketDataError::Timeout(_) => true,
            MarketDataError::Provider { status, .. } => {
                status == "429" || status.starts_with('5') && status.len() == 3
            }
            MarketDataError::Decode(_) | MarketDataError::RetriesExhausted { .. } => false,
        }
    }
}

/// Failure while evaluating a single cycle
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Leg {symbol} unavailable: {source}")]
    LegFetch {
        symbol: String,
        #[source]
        source: MarketDataError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias
pub type CoreResult<T> = Result<T, CoreError>;
pub type MarketDataResult<T> = Result<T, MarketDataError>;
pub type EvaluationResult<T> = Result<T, EvaluationError>;
