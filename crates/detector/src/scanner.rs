//! Main arbitrage scanner

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use triarb_core::{
    Cycle, CycleEvaluation, DetectionConfig, EvaluationError, MarketDataResult, OpportunityFilter,
    PairCatalog,
};
use triarb_market_data::{load_catalog, MarketDataProvider};

use crate::enumerator::enumerate_cycles;
use crate::evaluator::CycleEvaluator;

/// A cycle that could not be priced this iteration
#[derive(Debug)]
pub struct CycleFailure {
    pub cycle: Cycle,
    pub error: EvaluationError,
}

/// Result of one pass over every known cycle
#[derive(Debug)]
pub struct ScanReport {
    pub scanned_at: DateTime<Utc>,
    pub duration: Duration,
    /// Sorted by net rate, best first
    pub evaluations: Vec<CycleEvaluation>,
    pub failures: Vec<CycleFailure>,
}

impl ScanReport {
    pub fn cycle_count(&self) -> usize {
        self.evaluations.len() + self.failures.len()
    }

    pub fn best(&self) -> Option<&CycleEvaluation> {
        self.evaluations.first()
    }

    pub fn opportunities<'a>(
        &'a self,
        filter: &'a OpportunityFilter,
    ) -> impl Iterator<Item = &'a CycleEvaluation> {
        self.evaluations.iter().filter(move |e| filter.matches(e))
    }
}

/// Pair catalog and the cycles derived from it
#[derive(Debug, Clone)]
pub struct ScanUniverse {
    pub catalog: PairCatalog,
    pub cycles: Vec<Cycle>,
}

/// Main arbitrage scanner
pub struct ArbitrageScanner {
    config: DetectionConfig,
    provider: Arc<dyn MarketDataProvider>,
    evaluator: CycleEvaluator,
    filter: OpportunityFilter,
    report_tx: Option<mpsc::Sender<ScanReport>>,
}

impl ArbitrageScanner {
    pub fn new(config: DetectionConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        let evaluator = CycleEvaluator::from_config(&config);

        Self {
            config,
            provider,
            evaluator,
            filter: OpportunityFilter::default(),
            report_tx: None,
        }
    }

    pub fn with_filter(mut self, filter: OpportunityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Forward every completed scan report to `tx`
    pub fn with_reporter(mut self, tx: mpsc::Sender<ScanReport>) -> Self {
        self.report_tx = Some(tx);
        self
    }

    /// Load the pair catalog and derive the cycle set for the reference currency
    pub async fn load_universe(&self) -> MarketDataResult<ScanUniverse> {
        let catalog = load_catalog(self.provider.as_ref()).await?;
        let reference = &self.config.reference_currency;
        let cycles = enumerate_cycles(&catalog, reference);

        if cycles.is_empty() {
            warn!("No triangular cycles through {} in {} pairs", reference, catalog.len());
        } else {
            info!("Derived {} cycles through {}", cycles.len(), reference);
        }

        Ok(ScanUniverse { catalog, cycles })
    }

    /// Evaluate every cycle once, at most `max_concurrent_cycles` at a time
    pub async fn scan_once(&self, universe: &ScanUniverse) -> ScanReport {
        let scanned_at = Utc::now();
        let start = Instant::now();
        let catalog = &universe.catalog;
        let provider = self.provider.as_ref();

        // owned cycles keep the resulting future Send
        let results: Vec<(Cycle, Result<CycleEvaluation, EvaluationError>)> =
            stream::iter(universe.cycles.iter().cloned())
                .map(|cycle| async move {
                    let result = self.evaluator.evaluate(&cycle, catalog, provider).await;
                    (cycle, result)
                })
                .buffer_unordered(self.config.max_concurrent_cycles.max(1))
                .collect()
                .await;

        let mut evaluations = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (cycle, result) in results {
            match result {
                Ok(eval) => evaluations.push(eval),
                Err(error) => failures.push(CycleFailure { cycle, error }),
            }
        }
        evaluations.sort_by(|a, b| b.net_rate.total_cmp(&a.net_rate));

        ScanReport {
            scanned_at,
            duration: start.elapsed(),
            evaluations,
            failures,
        }
    }

    fn report(&self, report: &ScanReport) {
        for failure in &report.failures {
            warn!("Skipped {}: {}", failure.cycle, failure.error);
        }

        let mut found = 0;
        for eval in &report.evaluations {
            if self.filter.matches(eval) {
                found += 1;
                info!(
                    "Opportunity: {} net_rate={:.6} ({:+.1} bps) volume={:.6} {} profit={:.6}",
                    eval.cycle,
                    eval.net_rate,
                    eval.profit_bps(),
                    eval.bottleneck_volume,
                    eval.cycle.start(),
                    eval.expected_profit()
                );
            } else {
                info!(
                    "{} net_rate={:.6} ({:+.1} bps) volume={:.6}",
                    eval.cycle,
                    eval.net_rate,
                    eval.profit_bps(),
                    eval.bottleneck_volume
                );
            }
        }

        if found > 0 {
            info!(
                "Found {} opportunities across {} cycles in {:?}",
                found,
                report.cycle_count(),
                report.duration
            );
        } else {
            debug!(
                "Scan of {} cycles completed in {:?}, no opportunities ({} failed)",
                report.cycle_count(),
                report.duration,
                report.failures.len()
            );
        }
    }

    /// Run continuous scanning until `shutdown` fires (or its sender is dropped).
    ///
    /// Fails only if the initial catalog cannot be loaded. An in-flight scan
    /// is abandoned on shutdown.
    pub async fn run(&self, mut shutdown: oneshot::Receiver<()>) -> MarketDataResult<()> {
        info!("Starting arbitrage scanner");

        let mut universe = tokio::select! {
            loaded = self.load_universe() => loaded?,
            _ = &mut shutdown => {
                info!("Scanner shutdown requested before start");
                return Ok(());
            }
        };
        let mut loaded_at = Instant::now();

        let mut interval = tokio::time::interval(self.config.scan_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    info!("Scanner shutdown requested");
                    break;
                }
            }

            // a failed refresh is retried on the next tick
            if let Some(every) = self.config.catalog_refresh() {
                if loaded_at.elapsed() >= every {
                    tokio::select! {
                        refreshed = self.load_universe() => match refreshed {
                            Ok(fresh) => {
                                universe = fresh;
                                loaded_at = Instant::now();
                            }
                            Err(e) => warn!("Catalog refresh failed, keeping previous: {}", e),
                        },
                        _ = &mut shutdown => {
                            info!("Scanner shutdown requested during catalog refresh");
                            break;
                        }
                    }
                }
            }

            let report = tokio::select! {
                report = self.scan_once(&universe) => report,
                _ = &mut shutdown => {
                    info!("Scanner shutdown requested, abandoning in-flight scan");
                    break;
                }
            };

            self.report(&report);

            if let Some(tx) = &self.report_tx {
                tokio::select! {
                    sent = tx.send(report) => {
                        if sent.is_err() {
                            debug!("Report channel closed");
                        }
                    }
                    _ = &mut shutdown => {
                        info!("Scanner shutdown requested");
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
