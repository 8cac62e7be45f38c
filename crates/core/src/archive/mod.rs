//! Archive access and metadata attachment.
//!
//! Archives are opaque containers reached through the [`ArchiveStore`]
//! capability. [`ArchiveMetadataWriter`] is the only code path that
//! mutates archive contents.

mod error;
mod traits;
mod writer;
mod zip_store;

pub use error::ArchiveError;
pub use traits::ArchiveStore;
pub use writer::{ArchiveMetadataWriter, DEFAULT_METADATA_ENTRY};
pub use zip_store::ZipArchiveStore;
