//! Reorganizer module for moving files into the library layout.
//!
//! [`Layout`] decides where a file goes and what it is called;
//! [`FileMover`] performs the move. Moves never overwrite: an occupied
//! destination is reported as [`RelocateError::DuplicateDestination`] and
//! both files stay as they were.
//!
//! Layout below the output root:
//!
//! - `Magazines/<name>/<name issue>/` for magazine issues
//! - `Books/<publisher or author>/` for original works
//! - `Doujins/<publisher or author>/` for everything else, `Unknown` when
//!   neither is known
//!
//! # Example
//!
//! ```ignore
//! use comicshelf_core::reorganizer::{FsMover, Layout, MigrationMode, Reorganizer, ResortMode};
//!
//! let reorganizer = Reorganizer::new(
//!     Layout::with_defaults(),
//!     Arc::new(FsMover::with_defaults()),
//!     "/library",
//!     MigrationMode::Move,
//! );
//! let new_path = reorganizer.place(&input, ResortMode::ByPublisher).await?;
//! ```

mod config;
mod error;
mod fs_mover;
mod layout;
#[allow(clippy::module_inception)]
mod reorganizer;
mod traits;
mod types;

pub use config::ReorganizerConfig;
pub use error::RelocateError;
pub use fs_mover::FsMover;
pub use layout::Layout;
pub use reorganizer::Reorganizer;
pub use traits::FileMover;
pub use types::{
    Classification, CleanupReport, MigrationMode, PlacementInput, RelocatedFile, ResortMode,
};
