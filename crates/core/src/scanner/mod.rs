//! Input discovery: finds archives and reads what they already carry.

mod scan;
mod types;

pub use scan::{list_archives, ArchiveScanner, ScanError};
pub use types::FileRecord;
