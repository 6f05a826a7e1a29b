//! Loading and reloading the waypoint document from disk.
//!
//! Reading and parsing happen before the store lock is touched; only the
//! final snapshot swap synchronizes with readers. A failed load or reload
//! leaves the previous snapshot in place.

use crate::catalog::parser::parse_document;
use crate::catalog::patterns::{BuiltinPatternRegistry, LegacyPatternTable, PatternRegistry};
use crate::catalog::store::CatalogStore;
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Whole-catalog failures. Per-entry problems are absorbed by the parser and
/// only show up in [`LoadSummary::skipped`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document file does not exist. The previous snapshot is kept.
    #[error("waypoint document not found: {0}")]
    MissingSource(PathBuf),

    /// The document file could not be read.
    #[error("failed to read waypoint document: {0}")]
    Io(#[from] io::Error),

    /// The document is not parseable YAML at all.
    #[error("waypoint document is not valid YAML: {0}")]
    InvalidDocument(#[from] serde_yaml::Error),

    /// The document parsed but produced zero entries; the catalog is
    /// unusable and the previous snapshot is kept.
    #[error("waypoint document produced no entries")]
    EmptyCatalog,
}

/// Counts reported by a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Loads the waypoint document and publishes snapshots to a [`CatalogStore`].
pub struct CatalogLoader {
    path: PathBuf,
    legacy: LegacyPatternTable,
    registry: Box<dyn PatternRegistry + Send + Sync>,
    store: Arc<CatalogStore>,
}

impl CatalogLoader {
    pub fn new(path: impl Into<PathBuf>, store: Arc<CatalogStore>) -> Self {
        Self::with_registry(path, store, Box::new(BuiltinPatternRegistry))
    }

    /// Use a caller-supplied pattern registry instead of the builtin one.
    pub fn with_registry(
        path: impl Into<PathBuf>,
        store: Arc<CatalogStore>,
        registry: Box<dyn PatternRegistry + Send + Sync>,
    ) -> Self {
        Self {
            path: path.into(),
            legacy: LegacyPatternTable::new(),
            registry,
            store,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse, and swap in a new snapshot.
    pub fn load(&self) -> Result<LoadSummary, CatalogError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::MissingSource(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let doc: Value = serde_yaml::from_str(&text)?;
        let outcome = parse_document(&doc, &self.legacy, self.registry.as_ref());

        if outcome.waypoints.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let summary = LoadSummary {
            loaded: outcome.waypoints.len(),
            skipped: outcome.skipped,
        };
        self.store.replace(outcome.waypoints);

        if summary.skipped > 0 {
            log::info!(
                "loaded {} waypoints from {} ({} invalid entries skipped)",
                summary.loaded,
                self.path.display(),
                summary.skipped
            );
        } else {
            log::info!("loaded {} waypoints from {}", summary.loaded, self.path.display());
        }

        Ok(summary)
    }

    /// Reload from disk. Identical to [`load`](Self::load); on failure the
    /// store keeps serving the previous snapshot.
    pub fn reload(&self) -> Result<LoadSummary, CatalogError> {
        self.load()
    }
}
