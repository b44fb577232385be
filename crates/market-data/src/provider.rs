//! Market data provider seam

use async_trait::async_trait;
use tracing::{debug, info};

use triarb_core::{MarketDataResult, OrderBookSnapshot, Pair, PairCatalog};

/// Source of tradable pairs and order book snapshots
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every pair the exchange currently lists
    async fn fetch_pairs(&self) -> MarketDataResult<Vec<Pair>>;

    /// Current depth for `symbol`. `depth_hint` is the number of levels the
    /// caller needs; providers may return more.
    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth_hint: usize,
    ) -> MarketDataResult<OrderBookSnapshot>;
}

/// Fetch the pair listing and build a catalog from it
pub async fn load_catalog<P>(provider: &P) -> MarketDataResult<PairCatalog>
where
    P: MarketDataProvider + ?Sized,
{
    let pairs = provider.fetch_pairs().await?;
    let listed = pairs.len();
    let catalog = PairCatalog::new(pairs);

    if catalog.len() < listed {
        debug!(
            "Dropped {} degenerate pairs from {} listing",
            listed - catalog.len(),
            provider.name()
        );
    }
    info!(
        "Loaded {} pairs over {} currencies from {}",
        catalog.len(),
        catalog.currencies().len(),
        provider.name()
    );

    Ok(catalog)
}
