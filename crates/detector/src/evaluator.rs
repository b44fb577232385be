//! Cycle evaluation: per-leg rates combined into a round-trip return

use futures::try_join;

use triarb_core::{
    Cycle, CycleEvaluation, DetectionConfig, DirectionalRate, EvaluationError, EvaluationResult,
    OrderBookSnapshot, Pair, PairCatalog,
};
use triarb_market_data::MarketDataProvider;

use crate::estimator::RateEstimator;

/// Round-trip taker fee charged against every cycle (0.2%)
pub const DEFAULT_FEE: f64 = 0.002;

/// Combine three leg rates into a cycle evaluation.
///
/// Net rate is `1 / (r1 * r2 * r3) - fee`. The bottleneck volume expresses
/// every leg's capacity in start-currency units by chaining through the
/// rates of the legs before it: `min(max1, max2 * r1, max3 * r2 * r1)`.
pub fn combine(cycle: Cycle, legs: [DirectionalRate; 3], fee: f64) -> CycleEvaluation {
    let [r1, r2, r3] = [legs[0].rate, legs[1].rate, legs[2].rate];

    let gross_rate = 1.0 / (r1 * r2 * r3);
    let bottleneck_volume = legs[0]
        .max
        .min(legs[1].max * r1)
        .min(legs[2].max * r2 * r1);

    CycleEvaluation {
        cycle,
        legs,
        gross_rate,
        net_rate: gross_rate - fee,
        bottleneck_volume,
    }
}

/// Prices cycles against fresh order books
#[derive(Debug, Clone)]
pub struct CycleEvaluator {
    estimator: RateEstimator,
    fee: f64,
}

impl CycleEvaluator {
    pub fn new(estimator: RateEstimator, fee: f64) -> Self {
        Self { estimator, fee }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(RateEstimator::new(config.book_levels), config.fee)
    }

    /// Resolve the three legs, fetch their books concurrently and price the cycle.
    ///
    /// Any failure is scoped to this cycle; nothing is cached between calls.
    pub async fn evaluate<P>(
        &self,
        cycle: &Cycle,
        catalog: &PairCatalog,
        provider: &P,
    ) -> EvaluationResult<CycleEvaluation>
    where
        P: MarketDataProvider + ?Sized,
    {
        let legs = cycle.legs();
        let pairs = [
            catalog.lookup(&legs[0].from, &legs[0].to)?,
            catalog.lookup(&legs[1].from, &legs[1].to)?,
            catalog.lookup(&legs[2].from, &legs[2].to)?,
        ];

        let depth = self.estimator.levels();
        let books = try_join!(
            fetch_leg(provider, pairs[0], depth),
            fetch_leg(provider, pairs[1], depth),
            fetch_leg(provider, pairs[2], depth),
        )?;
        let books = [books.0, books.1, books.2];

        let rates = [
            self.estimator.estimate(pairs[0], &legs[0].from, &legs[0].to, &books[0])?,
            self.estimator.estimate(pairs[1], &legs[1].from, &legs[1].to, &books[1])?,
            self.estimator.estimate(pairs[2], &legs[2].from, &legs[2].to, &books[2])?,
        ];

        Ok(combine(cycle.clone(), rates, self.fee))
    }
}

impl Default for CycleEvaluator {
    fn default() -> Self {
        Self::new(RateEstimator::top_of_book(), DEFAULT_FEE)
    }
}

async fn fetch_leg<P>(provider: &P, pair: &Pair, depth: usize) -> EvaluationResult<OrderBookSnapshot>
where
    P: MarketDataProvider + ?Sized,
{
    let symbol = pair.symbol();
    provider
        .fetch_order_book(&symbol, depth)
        .await
        .map_err(|source| EvaluationError::LegFetch { symbol, source })
}
