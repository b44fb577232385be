//! Cycle evaluation results and reporting filters

use serde::{Deserialize, Serialize};

use crate::{Cycle, DirectionalRate};

/// Outcome of pricing one cycle against fresh books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleEvaluation {
    pub cycle: Cycle,
    pub legs: [DirectionalRate; 3],
    /// Round-trip return before fees
    pub gross_rate: f64,
    /// Round-trip return after the fee deduction; above 1.0 is profitable
    pub net_rate: f64,
    /// Executable size in units of the cycle's start currency
    pub bottleneck_volume: f64,
}

impl CycleEvaluation {
    pub fn is_profitable(&self) -> bool {
        self.net_rate > 1.0
    }

    /// Net return in basis points (negative when losing)
    pub fn profit_bps(&self) -> f64 {
        (self.net_rate - 1.0) * 10_000.0
    }

    /// Expected gain in start-currency units when trading the bottleneck size
    pub fn expected_profit(&self) -> f64 {
        (self.net_rate - 1.0) * self.bottleneck_volume
    }
}

/// Opportunity filter criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityFilter {
    pub min_net_rate: f64,
    pub min_volume: f64,
}

impl Default for OpportunityFilter {
    fn default() -> Self {
        Self {
            min_net_rate: 1.0,
            min_volume: 0.0,
        }
    }
}

impl OpportunityFilter {
    pub fn matches(&self, eval: &CycleEvaluation) -> bool {
        eval.net_rate > self.min_net_rate && eval.bottleneck_volume >= self.min_volume
    }
}
