//! Directional conversion quotes

use serde::{Deserialize, Serialize};

use crate::{BookSide, Currency};

/// Price of converting `from` into `to` at the sampled book depth.
///
/// `rate` is the cost of one unit of `to` expressed in `from`, so a round trip
/// returns `1 / (r1 * r2 * r3)` units per unit invested. `max` is the volume,
/// in `from` units, the sampled levels can absorb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalRate {
    pub from: Currency,
    pub to: Currency,
    pub side: BookSide,
    pub rate: f64,
    pub max: f64,
}
