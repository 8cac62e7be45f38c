mod metrics;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comicshelf_core::{
    load_config, load_corrections, validate_config, Orchestrator, RunReport, SqliteCatalogStore,
    ZipArchiveStore,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("comicshelf {}", VERSION);

    // Determine config path
    let config_path = std::env::var("COMICSHELF_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("comicshelf.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        input = ?config.paths.input_dir,
        output = ?config.paths.output_dir,
        migration = ?config.run.migration,
        resort = ?config.run.resort,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );

    let corrections = load_corrections(config.paths.corrections.as_deref())
        .context("Failed to load correction tables")?;

    // Open catalog
    let catalog = SqliteCatalogStore::open(&config.paths.catalog_db)
        .with_context(|| format!("Failed to open catalog {:?}", config.paths.catalog_db))?;
    info!("Catalog opened: {:?}", config.paths.catalog_db);

    let orchestrator = Orchestrator::from_config(
        &config,
        corrections,
        Arc::new(ZipArchiveStore::new()),
    );

    // Stop between files on Ctrl+C / SIGTERM
    let stop = orchestrator.stop_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Shutdown signal received, finishing the current file");
        stop.store(true, Ordering::SeqCst);
    });

    let report = orchestrator
        .run_with_store(&catalog, &config.paths.input_dir)
        .await
        .context("Run aborted")?;

    report
        .write_to(&config.paths.error_log)
        .with_context(|| format!("Failed to write error log {:?}", config.paths.error_log))?;
    log_summary(&report, &config.paths.error_log);

    if let Some(path) = &config.paths.metrics_file {
        metrics::LAST_RUN_ERRORS.set(report.error_count() as i64);
        if let Some(finished) = report.finished_at {
            metrics::LAST_RUN_TIMESTAMP.set(finished.timestamp());
        }
        let text = metrics::encode_metrics()?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write metrics to {:?}", path))?;
    }

    Ok(())
}

fn log_summary(report: &RunReport, error_log: &std::path::Path) {
    let counts = &report.counts;
    info!(
        scanned = counts.scanned,
        resolved = counts.resolved,
        skipped = counts.skipped,
        attached = counts.attached,
        relocated = counts.relocated,
        series = counts.series_documents,
        removed_dirs = counts.directories_removed,
        "All done"
    );
    if report.has_errors() {
        warn!(
            resolution = report.resolution_errors.len(),
            attach = report.attach_errors.len(),
            relocate = report.relocate_errors.len(),
            cleanup = report.cleanup_errors.len(),
            "Error logs are saved into {:?}",
            error_log
        );
    }
    if report.stopped {
        warn!("Run was interrupted; remaining files were left untouched");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
