//! Run orchestrator for the resolve, tag and reorganize pipeline.
//!
//! A run goes through its phases in order:
//! - **Index**: built once from the catalog, read-only afterwards
//! - **Scan**: concurrent, read-only sidecar reads
//! - **Files**: sequential, so no two files race for one destination
//! - **Cleanup**: empty directories removed after all moves
//!
//! Per-file failures are collected in four lists of the [`RunReport`].

mod config;
mod runner;
mod types;

pub use config::RunConfig;
pub use runner::{Orchestrator, DEFAULT_SERIES_INFO_FILE};
pub use types::{OrchestratorError, RunCounts, RunReport};
