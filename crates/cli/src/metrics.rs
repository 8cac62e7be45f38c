//! Prometheus metrics export.
//!
//! A run is a one-shot process, so metrics are dumped once in the text
//! exposition format when it ends (for a node exporter textfile collector).

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntGauge, Registry, TextEncoder};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Unix time the last run finished.
pub static LAST_RUN_TIMESTAMP: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "comicshelf_last_run_timestamp_seconds",
        "Unix time the last run finished",
    )
    .unwrap()
});

/// Errors reported by the last run, all lists combined.
pub static LAST_RUN_ERRORS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "comicshelf_last_run_errors",
        "Errors reported by the last run",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LAST_RUN_TIMESTAMP.clone()),
        Box::new(LAST_RUN_ERRORS.clone()),
    ];

    // Core metrics (scan, resolution, relocation)
    for metric in collectors
        .into_iter()
        .chain(comicshelf_core::metrics::all_metrics())
    {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
}

pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        LAST_RUN_ERRORS.set(3);
        comicshelf_core::metrics::RELOCATIONS
            .with_label_values(&["placed"])
            .inc();

        let output = encode_metrics().unwrap();
        assert!(output.contains("comicshelf_last_run_errors 3"));
        assert!(output.contains("comicshelf_relocations_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }
}
