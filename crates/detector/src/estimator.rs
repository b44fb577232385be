//! Directional rate estimation from order book depth

use triarb_core::{
    BookSide, CoreError, CoreResult, Currency, DirectionalRate, OrderBookSnapshot, Pair,
};

/// Prices a single conversion against the best levels of one book side.
///
/// Only the first `levels` entries are sampled (one by default), so `max`
/// reflects immediately available liquidity and understates what deeper
/// levels could absorb.
#[derive(Debug, Clone, Copy)]
pub struct RateEstimator {
    levels: usize,
}

impl RateEstimator {
    pub fn new(levels: usize) -> Self {
        Self {
            levels: levels.max(1),
        }
    }

    pub fn top_of_book() -> Self {
        Self::new(1)
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Rate for converting `from` into `to` on `pair`, using `book`.
    ///
    /// Selling the base (`from == base`) consumes bids: rate = amount / sum,
    /// max = amount. Buying the base consumes asks: rate = sum / amount,
    /// max = sum. `sum` is the quote value of the sampled levels.
    pub fn estimate(
        &self,
        pair: &Pair,
        from: &Currency,
        to: &Currency,
        book: &OrderBookSnapshot,
    ) -> CoreResult<DirectionalRate> {
        let symbol = pair.symbol();
        if book.symbol != symbol {
            return Err(CoreError::DirectionMismatch {
                from: from.clone(),
                to: to.clone(),
                symbol: book.symbol.clone(),
            });
        }

        let side = pair.side_for(from, to)?;

        let (sum, amount) = book
            .side(side)
            .iter()
            .take(self.levels)
            .fold((0.0_f64, 0.0_f64), |(sum, amount), level| {
                (sum + level.notional(), amount + level.amount)
            });

        if !(sum > 0.0 && amount > 0.0 && sum.is_finite() && amount.is_finite()) {
            return Err(CoreError::EmptyBookSide { symbol, side });
        }

        let (rate, max) = match side {
            BookSide::Bid => (amount / sum, amount),
            BookSide::Ask => (sum / amount, sum),
        };

        Ok(DirectionalRate {
            from: from.clone(),
            to: to.clone(),
            side,
            rate,
            max,
        })
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::top_of_book()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triarb_core::PriceLevel;

    fn btcusdt() -> (Pair, OrderBookSnapshot) {
        let book = OrderBookSnapshot::new(
            "btcusdt",
            vec![PriceLevel::new(50_000.0, 2.0), PriceLevel::new(49_000.0, 10.0)],
            vec![PriceLevel::new(50_100.0, 1.5), PriceLevel::new(51_000.0, 10.0)],
        );
        (Pair::new("btc", "usdt"), book)
    }

    #[test]
    fn test_selling_base_uses_best_bid() {
        let (pair, book) = btcusdt();
        let quote = RateEstimator::top_of_book()
            .estimate(&pair, &"btc".into(), &"usdt".into(), &book)
            .unwrap();

        assert_eq!(quote.side, BookSide::Bid);
        assert!((quote.rate - 2.0 / 100_000.0).abs() < 1e-15);
        assert_eq!(quote.max, 2.0);
    }

    #[test]
    fn test_buying_base_uses_best_ask() {
        let (pair, book) = btcusdt();
        let quote = RateEstimator::top_of_book()
            .estimate(&pair, &"usdt".into(), &"btc".into(), &book)
            .unwrap();

        assert_eq!(quote.side, BookSide::Ask);
        assert!((quote.rate - 50_100.0).abs() < 1e-9);
        assert!((quote.max - 75_150.0).abs() < 1e-9);
    }

    #[test]
    fn test_deeper_levels_are_ignored_by_default() {
        let (pair, mut book) = btcusdt();
        book.bids[1] = PriceLevel::new(1.0, 1_000_000.0);

        let quote = RateEstimator::default()
            .estimate(&pair, &"btc".into(), &"usdt".into(), &book)
            .unwrap();
        assert_eq!(quote.max, 2.0);
    }

    #[test]
    fn test_multiple_levels_accumulate() {
        let (pair, book) = btcusdt();
        let quote = RateEstimator::new(2)
            .estimate(&pair, &"btc".into(), &"usdt".into(), &book)
            .unwrap();

        let sum = 50_000.0 * 2.0 + 49_000.0 * 10.0;
        assert_eq!(quote.max, 12.0);
        assert!((quote.rate - 12.0 / sum).abs() < 1e-15);
    }

    #[test]
    fn test_foreign_currency_is_mismatch() {
        let (pair, book) = btcusdt();
        let err = RateEstimator::default()
            .estimate(&pair, &"eth".into(), &"usdt".into(), &book)
            .unwrap_err();

        assert!(matches!(err, CoreError::DirectionMismatch { .. }));
    }

    #[test]
    fn test_book_for_other_symbol_is_mismatch() {
        let (pair, mut book) = btcusdt();
        book.symbol = "ethusdt".to_string();

        let err = RateEstimator::default()
            .estimate(&pair, &"btc".into(), &"usdt".into(), &book)
            .unwrap_err();
        assert!(matches!(err, CoreError::DirectionMismatch { .. }));
    }

    #[test]
    fn test_empty_side() {
        let pair = Pair::new("btc", "usdt");
        let book = OrderBookSnapshot::new("btcusdt", vec![PriceLevel::new(50_000.0, 1.0)], vec![]);

        let err = RateEstimator::default()
            .estimate(&pair, &"usdt".into(), &"btc".into(), &book)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::EmptyBookSide {
                symbol: "btcusdt".to_string(),
                side: BookSide::Ask
            }
        );
    }

    #[test]
    fn test_zero_priced_level_is_rejected() {
        let pair = Pair::new("btc", "usdt");
        let book = OrderBookSnapshot::new("btcusdt", vec![PriceLevel::new(0.0, 3.0)], vec![]);

        assert!(RateEstimator::default()
            .estimate(&pair, &"btc".into(), &"usdt".into(), &book)
            .is_err());
    }

    #[test]
    fn test_zero_levels_clamped_to_one() {
        assert_eq!(RateEstimator::new(0).levels(), 1);
    }
}
