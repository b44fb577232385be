//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange currency token, always lower-case (`usdt`, `btc`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Currency {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for Currency {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One directed conversion inside a cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    pub from: Currency,
    pub to: Currency,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Triangular trading cycle: start -> mid1 -> mid2 -> start
///
/// Direction matters: `(usdt, btc, eth)` and `(usdt, eth, btc)` trade the
/// same triangle against opposite sides of the books and are distinct cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cycle([Currency; 3]);

impl Cycle {
    /// Returns `None` unless all three currencies are distinct.
    pub fn new(start: Currency, mid1: Currency, mid2: Currency) -> Option<Self> {
        if start == mid1 || mid1 == mid2 || mid2 == start {
            return None;
        }
        Some(Self([start, mid1, mid2]))
    }

    pub fn start(&self) -> &Currency {
        &self.0[0]
    }

    pub fn currencies(&self) -> &[Currency; 3] {
        &self.0
    }

    pub fn legs(&self) -> [Leg; 3] {
        let [a, b, c] = &self.0;
        [
            Leg { from: a.clone(), to: b.clone() },
            Leg { from: b.clone(), to: c.clone() },
            Leg { from: c.clone(), to: a.clone() },
        ]
    }

    /// The same triangle traversed the other way round.
    pub fn reversed(&self) -> Self {
        let [a, b, c] = &self.0;
        Self([a.clone(), c.clone(), b.clone()])
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.0;
        write!(f, "{} -> {} -> {} -> {}", a, b, c, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(a: &str, b: &str, c: &str) -> Cycle {
        Cycle::new(a.into(), b.into(), c.into()).unwrap()
    }

    #[test]
    fn test_currency_normalization() {
        assert_eq!(Currency::new(" USDT "), Currency::new("usdt"));
        assert_eq!(Currency::new("Btc").as_str(), "btc");

        let parsed: Currency = serde_json::from_str("\"ETH\"").unwrap();
        assert_eq!(parsed, Currency::new("eth"));
    }

    #[test]
    fn test_cycle_requires_distinct_members() {
        assert!(Cycle::new("usdt".into(), "btc".into(), "usdt".into()).is_none());
        assert!(Cycle::new("usdt".into(), "usdt".into(), "btc".into()).is_none());
        assert!(Cycle::new("usdt".into(), "btc".into(), "btc".into()).is_none());
    }

    #[test]
    fn test_cycle_legs_close_the_loop() {
        let c = cycle("usdt", "btc", "eth");
        let legs = c.legs();

        assert_eq!(legs[0].to_string(), "usdt->btc");
        assert_eq!(legs[1].to_string(), "btc->eth");
        assert_eq!(legs[2].to_string(), "eth->usdt");
        assert_eq!(c.to_string(), "usdt -> btc -> eth -> usdt");
    }

    #[test]
    fn test_reversed_cycle() {
        let c = cycle("usdt", "btc", "eth");
        assert_eq!(c.reversed(), cycle("usdt", "eth", "btc"));
        assert_eq!(c.reversed().reversed(), c);
        assert_ne!(c, c.reversed());
    }
}
