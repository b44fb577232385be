//! Tradable pair definitions and the pair catalog

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{BookSide, CoreError, CoreResult, Currency};

/// A directly tradable market as listed by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    #[serde(rename = "base-currency")]
    pub base: Currency,
    #[serde(rename = "quote-currency")]
    pub quote: Currency,
    #[serde(rename = "price-precision", default)]
    pub price_precision: u32,
    #[serde(rename = "amount-precision", default)]
    pub amount_precision: u32,
    #[serde(rename = "symbol-partition", default)]
    pub partition: String,
    /// Listing state; only `online` markets accept orders
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_state() -> String {
    ONLINE.to_string()
}

const ONLINE: &str = "online";

impl Pair {
    pub fn new(base: impl Into<Currency>, quote: impl Into<Currency>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
            price_precision: 0,
            amount_precision: 0,
            partition: String::new(),
            state: default_state(),
        }
    }

    pub fn with_precision(mut self, price: u32, amount: u32) -> Self {
        self.price_precision = price;
        self.amount_precision = amount;
        self
    }

    pub fn with_partition(mut self, partition: &str) -> Self {
        self.partition = partition.to_string();
        self
    }

    pub fn is_online(&self) -> bool {
        self.state == ONLINE
    }

    pub fn members(&self) -> [&Currency; 2] {
        [&self.base, &self.quote]
    }

    pub fn has(&self, currency: &Currency) -> bool {
        self.base == *currency || self.quote == *currency
    }

    /// Trading symbol, base first: `btc` + `usdt` = `btcusdt`
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// The member that is not `currency`
    pub fn other(&self, currency: &Currency) -> Option<&Currency> {
        if self.base == *currency {
            Some(&self.quote)
        } else if self.quote == *currency {
            Some(&self.base)
        } else {
            None
        }
    }

    /// Book side consumed when converting `from` into `to` on this market.
    ///
    /// Selling the base hits the bids, buying it lifts the asks.
    pub fn side_for(&self, from: &Currency, to: &Currency) -> CoreResult<BookSide> {
        if self.base == *from && self.quote == *to {
            Ok(BookSide::Bid)
        } else if self.quote == *from && self.base == *to {
            Ok(BookSide::Ask)
        } else {
            Err(CoreError::DirectionMismatch {
                from: from.clone(),
                to: to.clone(),
                symbol: self.symbol(),
            })
        }
    }

    fn is_degenerate(&self) -> bool {
        self.base == self.quote || self.base.is_empty() || self.quote.is_empty()
    }
}

/// Order-insensitive key for a currency pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey(Currency, Currency);

impl PairKey {
    fn new(a: &Currency, b: &Currency) -> Self {
        // Normalize order so (A,B) and (B,A) map to same key
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

/// Read-only set of tradable pairs for one scan session
#[derive(Debug, Clone, Default)]
pub struct PairCatalog {
    pairs: Vec<Pair>,
    index: HashMap<PairKey, usize>,
}

impl PairCatalog {
    /// Builds the catalog, dropping pairs whose two members are not distinct.
    /// When the exchange lists the same currency set twice the first listing wins.
    pub fn new(pairs: impl IntoIterator<Item = Pair>) -> Self {
        let pairs: Vec<Pair> = pairs.into_iter().filter(|p| !p.is_degenerate()).collect();

        let mut index = HashMap::with_capacity(pairs.len());
        for (i, pair) in pairs.iter().enumerate() {
            index.entry(PairKey::new(&pair.base, &pair.quote)).or_insert(i);
        }

        Self { pairs, index }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pair whose members are exactly `{a, b}`, in either order
    pub fn lookup(&self, a: &Currency, b: &Currency) -> CoreResult<&Pair> {
        self.index
            .get(&PairKey::new(a, b))
            .map(|&i| &self.pairs[i])
            .ok_or_else(|| CoreError::PairNotFound(a.clone(), b.clone()))
    }

    pub fn contains(&self, a: &Currency, b: &Currency) -> bool {
        self.index.contains_key(&PairKey::new(a, b))
    }

    /// All pairs that list `currency`, in catalog order
    pub fn containing<'a>(&'a self, currency: &'a Currency) -> impl Iterator<Item = &'a Pair> {
        self.pairs.iter().filter(move |p| p.has(currency))
    }

    /// Distinct currencies across the catalog, sorted
    pub fn currencies(&self) -> Vec<&Currency> {
        let mut out: Vec<&Currency> = self.pairs.iter().flat_map(|p| p.members()).collect();
        out.sort();
        out.dedup();
        out
    }
}

impl FromIterator<Pair> for PairCatalog {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        Self::new(iter)
    }
}
