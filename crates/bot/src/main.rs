//! Triarb - triangular arbitrage scanner
//!
//! Main entry point

use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info};

use triarb_bot::{build_provider, init_logging, load_settings};
use triarb_detector::ArbitrageScanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = load_settings()?;
    init_logging(&config.logging);

    info!("Starting triarb v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Reference {} | fee {} | {} book level(s) | scan every {}ms",
        config.detection.reference_currency,
        config.detection.fee,
        config.detection.book_levels,
        config.detection.scan_interval_ms
    );

    let provider = build_provider(&config.provider)?;
    let scanner =
        ArbitrageScanner::new(config.detection.clone(), provider).with_filter(config.report.clone());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    error!("Failed to install signal handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C");
            }
            _ = terminate => {
                info!("Received termination signal");
            }
        }

        let _ = shutdown_tx.send(());
    });

    info!("Press Ctrl+C to shutdown");

    if let Err(e) = scanner.run(shutdown_rx).await {
        error!("Scanner error: {}", e);
        return Err(e.into());
    }

    info!("Scanner shutdown complete");
    Ok(())
}
