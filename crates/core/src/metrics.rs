//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Scanning (archives found, sidecar reads)
//! - Resolution (matches per tier, failures)
//! - Attach and relocation outcomes
//! - Run duration

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Scanning
// =============================================================================

/// Archives discovered by the scanner.
pub static FILES_SCANNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("comicshelf_files_scanned_total", "Total archives scanned").unwrap()
});

/// Sidecar reads by result.
pub static SIDECAR_READS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("comicshelf_sidecar_reads_total", "Total sidecar reads"),
        &["result"], // "found", "missing", "failed"
    )
    .unwrap()
});

// =============================================================================
// Resolution
// =============================================================================

/// Successful resolutions by tier.
pub static RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("comicshelf_resolutions_total", "Files resolved, by tier"),
        &["tier"],
    )
    .unwrap()
});

/// Files no tier could resolve.
pub static RESOLUTION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "comicshelf_resolution_failures_total",
            "Files that could not be resolved",
        ),
        &["path"], // "loose", "magazine"
    )
    .unwrap()
});

// =============================================================================
// Attach and relocation
// =============================================================================

/// Metadata attach attempts by result.
pub static ATTACHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("comicshelf_attaches_total", "Metadata attach attempts"),
        &["result"], // "written", "failed"
    )
    .unwrap()
});

/// Relocation attempts by result.
pub static RELOCATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("comicshelf_relocations_total", "File relocation attempts"),
        &["result"], // "placed", "unchanged", "duplicate", "failed"
    )
    .unwrap()
});

/// Empty directories removed during cleanup.
pub static DIRECTORIES_REMOVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "comicshelf_directories_removed_total",
        "Empty directories removed after relocation",
    )
    .unwrap()
});

// =============================================================================
// Runs
// =============================================================================

/// Run duration in seconds.
pub static RUN_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("comicshelf_run_duration_seconds", "Duration of a full run")
            .buckets(vec![1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0]),
        &["result"], // "completed", "stopped", "fatal"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Scanning
        Box::new(FILES_SCANNED.clone()),
        Box::new(SIDECAR_READS.clone()),
        // Resolution
        Box::new(RESOLUTIONS.clone()),
        Box::new(RESOLUTION_FAILURES.clone()),
        // Attach and relocation
        Box::new(ATTACHES.clone()),
        Box::new(RELOCATIONS.clone()),
        Box::new(DIRECTORIES_REMOVED.clone()),
        // Runs
        Box::new(RUN_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register_without_conflicts() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        RESOLUTIONS.with_label_values(&["url"]).inc();
        assert!(registry
            .gather()
            .iter()
            .any(|f| f.get_name() == "comicshelf_resolutions_total"));
    }
}
