//! Triangular arbitrage detection engine
//!
//! Features:
//! - Cycle enumeration over the tradable-pair graph
//! - Directional rate and volume estimation from book depth
//! - Cycle evaluation with fee deduction and bottleneck sizing
//! - Paced, cancellable scanning with bounded concurrency

pub mod enumerator;
pub mod estimator;
pub mod evaluator;
pub mod scanner;

pub use enumerator::enumerate_cycles;
pub use estimator::RateEstimator;
pub use evaluator::{combine, CycleEvaluator, DEFAULT_FEE};
pub use scanner::{ArbitrageScanner, CycleFailure, ScanReport, ScanUniverse};
