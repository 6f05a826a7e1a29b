//! Waypoint catalog: entry types, document parsing, and the shared snapshot
//! store.
//!
//! The catalog is loaded in bulk from a YAML document and held as an
//! immutable snapshot that reloads replace atomically. Parsing is tolerant:
//! malformed elements are skipped and counted, never fatal to the batch.

pub mod entry;
pub mod loader;
pub mod parser;
pub mod patterns;
pub mod store;

pub use entry::{BannerLayer, BannerPattern, DyeColor, ItemKind, Waypoint};
pub use loader::{CatalogError, CatalogLoader, LoadSummary};
pub use parser::{ParseOutcome, parse_document};
pub use patterns::{BuiltinPatternRegistry, LegacyPatternTable, PatternRegistry};
pub use store::CatalogStore;
