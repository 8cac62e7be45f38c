pub mod archive;
pub mod catalog;
pub mod config;
pub mod metadata;
pub mod metrics;
pub mod normalize;
pub mod orchestrator;
pub mod reorganizer;
pub mod resolver;
pub mod scanner;
pub mod testing;

pub use archive::{ArchiveError, ArchiveMetadataWriter, ArchiveStore, ZipArchiveStore};
pub use catalog::{
    load_all, CatalogCategory, CatalogError, CatalogIndex, CatalogRecord, CatalogStore,
    IndexError, IndexOptions, SqliteCatalogStore,
};
pub use config::{
    load_config, load_config_from_str, load_corrections, validate_config, Config, ConfigError,
    MatchingConfig, MetadataConfig, PathsConfig,
};
pub use metadata::{merge, synthesize, HashConfig, OutputMetadata, Sidecar};
pub use normalize::{
    normalize_magazine_key, normalize_title_key, sanitize_for_filesystem, CorrectionTables,
    MagazineKey,
};
pub use orchestrator::{Orchestrator, OrchestratorError, RunConfig, RunReport};
pub use reorganizer::{
    FileMover, FsMover, Layout, MigrationMode, RelocateError, Reorganizer, ReorganizerConfig,
    ResortMode,
};
pub use resolver::{MatchTier, ResolveError, ResolvedMatch, Resolver, ResolverConfig};
pub use scanner::{ArchiveScanner, FileRecord, ScanError};
