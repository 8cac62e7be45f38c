//! Metadata documents: the raw sidecar read from archives and the
//! normalized output written back into them.

mod de;
mod hash;
mod merge;
mod output;
mod sidecar;

pub use hash::HashConfig;
pub use merge::merge;
pub use output::{
    synthesize, ContentType, IdentityHashes, OutputMetadata, PublicationStatus, SourceLink,
    TranslationStatus,
};
pub use sidecar::{is_sidecar_entry, Sidecar, SidecarError};
