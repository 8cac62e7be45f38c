//! Run orchestrator implementation.
//!
//! One run over an input directory:
//! - Index: build the catalog index (fatal on failure)
//! - Scan: read sidecars concurrently, read-only
//! - Files: resolve, synthesize, attach and place, one file at a time
//! - Series: write the aggregate document of every magazine issue folder
//! - Cleanup: remove directories the moves left empty, and only those

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::archive::{ArchiveMetadataWriter, ArchiveStore};
use crate::catalog::{load_all, CatalogIndex, CatalogRecord, CatalogStore, IndexOptions};
use crate::config::Config;
use crate::metadata::{merge, synthesize, HashConfig, OutputMetadata};
use crate::metrics;
use crate::normalize::{normalize_magazine_key, CorrectionTables, MagazineKey, PublisherDetector};
use crate::reorganizer::{
    FsMover, Layout, MigrationMode, PlacementInput, RelocatedFile, Reorganizer,
};
use crate::resolver::{MatchTier, ResolveError, Resolver};
use crate::scanner::{ArchiveScanner, FileRecord};

use super::config::RunConfig;
use super::types::{error_line, OrchestratorError, RunReport};

/// Default name of the per-issue series document.
pub const DEFAULT_SERIES_INFO_FILE: &str = "serie_info.json";

/// Records matched into one magazine issue folder.
#[derive(Debug)]
struct IssueGroup {
    title: String,
    records: Vec<CatalogRecord>,
}

/// Bookkeeping carried from file to file within one run.
#[derive(Debug, Default)]
struct RunState {
    issues: BTreeMap<PathBuf, IssueGroup>,
    /// Directories a move took a file out of.
    vacated: BTreeSet<PathBuf>,
}

/// Drives one input directory through resolution, tagging and placement.
///
/// Per-file failures end up in the [`RunReport`]; only failing to read the
/// catalog, build the index or scan the input aborts a run.
pub struct Orchestrator {
    config: RunConfig,
    index_options: IndexOptions,
    resolver: Resolver,
    publishers: PublisherDetector,
    hashes: HashConfig,
    scanner: ArchiveScanner,
    writer: ArchiveMetadataWriter,
    reorganizer: Reorganizer,
    series_info_file: String,

    // Runtime state
    stop_requested: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: RunConfig,
        resolver: Resolver,
        reorganizer: Reorganizer,
        writer: ArchiveMetadataWriter,
        hashes: HashConfig,
        index_options: IndexOptions,
    ) -> Self {
        let scanner = ArchiveScanner::new(writer.clone(), config.scan_parallelism);
        Self {
            publishers: PublisherDetector::new(&index_options.corrections),
            config,
            index_options,
            resolver,
            hashes,
            scanner,
            writer,
            reorganizer,
            series_info_file: DEFAULT_SERIES_INFO_FILE.to_string(),
            stop_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wires every component from the loaded configuration.
    pub fn from_config(
        config: &Config,
        corrections: CorrectionTables,
        archives: Arc<dyn ArchiveStore>,
    ) -> Self {
        let matching = &config.matching;
        let layout = Layout::new(
            &config.placement,
            &matching.self_published_alias,
            &matching.original_work_parody,
        );
        let reorganizer = Reorganizer::new(
            layout,
            Arc::new(FsMover::new(config.placement.clone())),
            &config.paths.output_dir,
            config.run.migration,
        );
        let resolver = Resolver::new(matching.resolver_config(), corrections.clone());
        let index_options = IndexOptions {
            self_published_alias: matching.self_published_alias.clone(),
            corrections,
        };

        Self::new(
            config.run.clone(),
            resolver,
            reorganizer,
            ArchiveMetadataWriter::new(archives, &config.metadata.book_info_entry),
            config.metadata.hashes.clone(),
            index_options,
        )
        .with_series_info_file(&config.metadata.series_info_file)
    }

    pub fn with_series_info_file(mut self, name: impl Into<String>) -> Self {
        self.series_info_file = name.into();
        self
    }

    /// Asks a running run to stop before its next file.
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Shared flag behind [`Self::stop`], for signal handlers.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_requested)
    }

    /// Loads the catalog from `store` and runs over `input_root`.
    pub async fn run_with_store(
        &self,
        store: &dyn CatalogStore,
        input_root: &Path,
    ) -> Result<RunReport, OrchestratorError> {
        let records = load_all(store)?;
        info!(records = records.len(), "Catalog loaded");
        self.run(&records, input_root).await
    }

    /// Runs the whole pipeline over `input_root`.
    pub async fn run(
        &self,
        records: &[CatalogRecord],
        input_root: &Path,
    ) -> Result<RunReport, OrchestratorError> {
        let started = Instant::now();
        let result = self.run_phases(records, input_root).await;

        let outcome = match &result {
            Ok(report) if report.stopped => "stopped",
            Ok(_) => "completed",
            Err(_) => "fatal",
        };
        metrics::RUN_DURATION
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());
        self.stop_requested.store(false, Ordering::SeqCst);
        result
    }

    async fn run_phases(
        &self,
        records: &[CatalogRecord],
        input_root: &Path,
    ) -> Result<RunReport, OrchestratorError> {
        let mut report = RunReport::new();

        let index = CatalogIndex::build_with(records, &self.index_options)?;
        let stats = index.stats();
        info!(
            records = stats.records,
            skipped = stats.skipped,
            magazines = stats.magazines,
            "Catalog index built"
        );

        let files = self.scanner.scan_directory(input_root).await?;
        report.counts.scanned = files.len();

        let mut state = RunState::default();
        for file in &files {
            if self.stop_requested.load(Ordering::SeqCst) {
                warn!("Stop requested, leaving remaining files untouched");
                report.stopped = true;
                break;
            }
            self.process_file(file, &index, &mut report, &mut state)
                .await;
        }

        for (dir, group) in &state.issues {
            self.write_series_info(dir, group, &mut report).await;
        }

        self.cleanup(input_root, &state.vacated, &mut report).await;
        self.cleanup(self.reorganizer.output_root(), &state.vacated, &mut report)
            .await;

        report.finish();
        info!(
            scanned = report.counts.scanned,
            resolved = report.counts.resolved,
            skipped = report.counts.skipped,
            relocated = report.counts.relocated,
            errors = report.error_count(),
            stopped = report.stopped,
            "Run finished"
        );
        Ok(report)
    }

    async fn process_file(
        &self,
        file: &FileRecord,
        index: &CatalogIndex,
        report: &mut RunReport,
        state: &mut RunState,
    ) {
        let rewrite = self.config.rewrite_metadata;
        let skip = file.has_prior_metadata() && !rewrite;
        let file_key = self.file_magazine_key(file);

        let resolved = match self.magazine_name(file_key.as_ref(), file, index) {
            Some(name) if !skip => self
                .resolver
                .resolve_issue(index, &name, file)
                .map(|record| (Some(record), MatchTier::MagazineIssue)),
            _ => self
                .resolver
                .resolve(file, index, file.has_prior_metadata(), rewrite)
                .map(|found| (found.record, found.tier)),
        };
        let (record, tier) = match resolved {
            Ok(found) => found,
            Err(e) => return self.record_unresolved(&e, report),
        };
        metrics::RESOLUTIONS.with_label_values(&[tier.label()]).inc();

        let Some(record) = record else {
            report.counts.skipped += 1;
            if let Some(prior) = &file.prior {
                let publisher = file.publisher(&self.publishers);
                self.relocate(file, prior, file_key.as_ref(), publisher.as_deref(), report, state)
                    .await;
            }
            return;
        };
        report.counts.resolved += 1;

        let is_issue = tier == MatchTier::MagazineIssue;
        let key = if is_issue {
            normalize_magazine_key(&record.magazine).or(file_key)
        } else {
            file_key
        };
        let series_name = match (&key, is_issue) {
            (Some(key), true) => key.issue_key(),
            _ => file.file_name().to_string(),
        };

        let metadata = synthesize(
            record,
            &self.hashes.content_hash(file.file_name()),
            &self.hashes.series_hash(&series_name),
            false,
            !is_issue && record.is_doujinshi_class(),
        );
        let publisher = Some(record.publisher.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| file.publisher(&self.publishers));

        // Metadata is written into the placed file only. A file that cannot be
        // placed, and the source of a copy, are never modified.
        let placed = self
            .relocate(file, &metadata, key.as_ref(), publisher.as_deref(), report, state)
            .await;
        if let Some(placed) = &placed {
            self.attach(&placed.destination, &metadata, report).await;
        }

        if let (true, Some(placed)) = (is_issue, placed) {
            if let Some(dir) = placed.destination.parent() {
                state
                    .issues
                    .entry(dir.to_path_buf())
                    .or_insert_with(|| IssueGroup {
                        title: series_name.clone(),
                        records: Vec::new(),
                    })
                    .records
                    .push(record.clone());
            }
        }
    }

    /// Magazine and issue the file itself claims to belong to.
    fn file_magazine_key(&self, file: &FileRecord) -> Option<MagazineKey> {
        file.magazine(&self.index_options.corrections)
            .and_then(|m| normalize_magazine_key(&m))
    }

    /// Name of a catalog magazine this file is an issue of, if any.
    ///
    /// The file's own magazine wins; otherwise the containing folder is
    /// taken as the magazine name.
    fn magazine_name(
        &self,
        key: Option<&MagazineKey>,
        file: &FileRecord,
        index: &CatalogIndex,
    ) -> Option<String> {
        if let Some(key) = key.filter(|k| index.has_magazine(&k.name)) {
            return Some(key.name.clone());
        }
        let folder = file.parent_name();
        (!folder.is_empty() && index.has_magazine(folder)).then(|| folder.to_string())
    }

    fn record_unresolved(&self, error: &ResolveError, report: &mut RunReport) {
        let path = match error {
            ResolveError::NotFound { .. } => "loose",
            _ => "magazine",
        };
        metrics::RESOLUTION_FAILURES
            .with_label_values(&[path])
            .inc();
        warn!(error = %error, "Unresolved file left in place");
        report.resolution_errors.push(error.to_string());
    }

    async fn attach(&self, path: &Path, metadata: &OutputMetadata, report: &mut RunReport) {
        let writer = self.writer.clone();
        let target = path.to_path_buf();
        let document = metadata.clone();
        let result = tokio::task::spawn_blocking(move || writer.attach(&target, &document)).await;

        let failure = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(error_line(&e)),
            Err(e) => Some(format!(
                "Unable to write metadata into {}: {}",
                path.display(),
                e
            )),
        };
        match failure {
            None => {
                metrics::ATTACHES.with_label_values(&["written"]).inc();
                report.counts.attached += 1;
            }
            Some(line) => {
                metrics::ATTACHES.with_label_values(&["failed"]).inc();
                warn!(file = %path.display(), error = %line, "Metadata attach failed");
                report.attach_errors.push(line);
            }
        }
    }

    async fn relocate(
        &self,
        file: &FileRecord,
        metadata: &OutputMetadata,
        magazine: Option<&MagazineKey>,
        publisher: Option<&str>,
        report: &mut RunReport,
        state: &mut RunState,
    ) -> Option<RelocatedFile> {
        let input = PlacementInput {
            file,
            metadata,
            magazine,
            publisher,
        };
        match self.reorganizer.place(&input, self.config.resort).await {
            Ok(relocated) => {
                let result = if relocated.unchanged { "unchanged" } else { "placed" };
                metrics::RELOCATIONS.with_label_values(&[result]).inc();
                report.counts.relocated += 1;
                if self.config.migration == MigrationMode::Move && !relocated.unchanged {
                    if let Some(dir) = relocated.source.parent() {
                        state.vacated.insert(dir.to_path_buf());
                    }
                }
                Some(relocated)
            }
            Err(e) => {
                let result = if e.is_duplicate() { "duplicate" } else { "failed" };
                metrics::RELOCATIONS.with_label_values(&[result]).inc();
                warn!(file = %file.path.display(), error = %e, "Relocation failed");
                report.relocate_errors.push(error_line(&e));
                None
            }
        }
    }

    /// Writes the merged series document of one issue folder.
    async fn write_series_info(&self, dir: &Path, group: &IssueGroup, report: &mut RunReport) {
        let path = dir.join(&self.series_info_file);
        if !self.config.rewrite_metadata && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "Series document exists, keeping it");
            return;
        }

        let merged = merge(&group.title, &group.records);
        let document = synthesize(
            &merged,
            "",
            &self.hashes.series_hash(&group.title),
            true,
            false,
        );
        let written = match document.to_json_bytes() {
            Ok(bytes) => tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match written {
            Ok(()) => {
                debug!(path = %path.display(), issues = group.records.len(), "Wrote series document");
                report.counts.series_documents += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to write series document");
                report
                    .attach_errors
                    .push(format!("Unable to write {}: {}", path.display(), e));
            }
        }
    }

    /// Removes vacated directories below `root` that are now empty.
    async fn cleanup(&self, root: &Path, vacated: &BTreeSet<PathBuf>, report: &mut RunReport) {
        let dirs: Vec<PathBuf> = vacated
            .iter()
            .filter(|dir| dir.starts_with(root))
            .cloned()
            .collect();
        if dirs.is_empty() {
            return;
        }
        let result = self.reorganizer.cleanup(&dirs, root).await;
        metrics::DIRECTORIES_REMOVED.inc_by(result.removed as u64);
        report.counts.directories_removed += result.removed;
        report
            .cleanup_errors
            .extend(result.failures.iter().map(|e| error_line(e)));
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .field("reorganizer", &self.reorganizer)
            .field("series_info_file", &self.series_info_file)
            .finish()
    }
}
