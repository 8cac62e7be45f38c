//! Resolver module: maps arbitrarily named files to catalog records.
//!
//! Loose files go through [`Resolver::resolve`], which tries an ordered
//! list of tiers and stops at the first hit. Files inside a magazine issue
//! folder go through [`Resolver::resolve_issue`], an exact title match
//! restricted to that magazine's records.
//!
//! # Example
//!
//! ```ignore
//! use comicshelf_core::resolver::{Resolver, MatchTier};
//!
//! let resolver = Resolver::with_defaults();
//! let found = resolver.resolve(&file, &index, file.has_prior_metadata(), false)?;
//! if found.tier == MatchTier::Url {
//!     println!("matched by source url");
//! }
//! ```

mod config;
mod error;
mod scorer;
mod tiered;
mod types;

pub use config::{ResolverConfig, ScorerKind};
pub use error::ResolveError;
pub use scorer::{create_scorer, IndelRatio, NormalizedLevenshtein, SimilarityScorer};
pub use tiered::Resolver;
pub use types::{MatchTier, ResolvedMatch};
