//! Per-user browsing sessions: result set, pagination, and sort mode.
//!
//! A session is a snapshot of one user's view: the filtered and sorted
//! result list, the current page, and (in distance mode) a cache of
//! computed distances. Sessions are never mutated in place; navigation,
//! sort toggling, and new searches each build a replacement session, so a
//! session handed to a rendering step stays stable underneath it.

pub mod capture;

pub use capture::CaptureTable;

use crate::catalog::{CatalogStore, Waypoint};
use crate::distance::{Position, PositionResolver, rank_by_distance};
use crate::search::search;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Waypoints shown per page.
pub const PAGE_SIZE: usize = 45;

/// Orderings a session can present its results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    Alphabetical,
    Distance,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            SortMode::Alphabetical => SortMode::Distance,
            SortMode::Distance => SortMode::Alphabetical,
        }
    }
}

/// One user's current view of the catalog.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    results: Vec<Waypoint>,
    page: usize,
    sort: SortMode,
    origin: Option<Position>,
    distances: AHashMap<String, f64>,
}

impl BrowseSession {
    /// The full filtered, sorted result set.
    pub fn results(&self) -> &[Waypoint] {
        &self.results
    }

    /// Current 0-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Position captured when the session was created. Not refreshed on
    /// page turns.
    pub fn origin(&self) -> Option<Position> {
        self.origin
    }

    /// Cached distance for a destination, present only in distance mode.
    pub fn distance_of(&self, destination_id: &str) -> Option<f64> {
        self.distances.get(destination_id).copied()
    }

    /// The slice of results visible on the current page.
    pub fn page_slice(&self) -> &[Waypoint] {
        let start = self.page * PAGE_SIZE;
        if start >= self.results.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.results.len());
        &self.results[start..end]
    }

    /// Waypoint behind a 0-based slot on the current page, if any.
    pub fn waypoint_at(&self, slot: usize) -> Option<&Waypoint> {
        if slot >= PAGE_SIZE {
            return None;
        }
        self.results.get(self.page * PAGE_SIZE + slot)
    }

    pub fn total_pages(&self) -> usize {
        self.results.len().div_ceil(PAGE_SIZE)
    }

    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 0
    }
}

/// Builds and replaces browsing sessions against the shared catalog.
///
/// Also owns the pending-query [`CaptureTable`], so the whole browse /
/// search / capture surface hangs off one orchestrator.
pub struct SessionManager {
    store: Arc<CatalogStore>,
    resolver: Option<Arc<dyn PositionResolver + Send + Sync>>,
    captures: CaptureTable,
}

impl SessionManager {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self {
            store,
            resolver: None,
            captures: CaptureTable::new(),
        }
    }

    pub fn with_resolver(
        store: Arc<CatalogStore>,
        resolver: Arc<dyn PositionResolver + Send + Sync>,
    ) -> Self {
        Self {
            store,
            resolver: Some(resolver),
            captures: CaptureTable::new(),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Open a fresh session over the whole catalog, sorted alphabetically.
    pub fn open_browser(&self, origin: Option<Position>) -> BrowseSession {
        let snapshot = self.store.all();
        let mut results = snapshot.to_vec();
        sort_alphabetical(&mut results);

        BrowseSession {
            results,
            page: 0,
            sort: SortMode::Alphabetical,
            origin,
            distances: AHashMap::new(),
        }
    }

    /// Open a fresh session over the search results for `query`.
    pub fn open_search(&self, query: &str, origin: Option<Position>) -> BrowseSession {
        let snapshot = self.store.all();
        let mut results = search(&snapshot, query);
        sort_alphabetical(&mut results);

        log::info!("search \"{query}\" matched {} waypoints", results.len());

        BrowseSession {
            results,
            page: 0,
            sort: SortMode::Alphabetical,
            origin,
            distances: AHashMap::new(),
        }
    }

    /// Rebuild the view at another page. No re-filtering or re-sorting;
    /// the caller clamps the index to the session's valid page range.
    pub fn turn_page(&self, session: &BrowseSession, page: usize) -> BrowseSession {
        BrowseSession {
            page,
            ..session.clone()
        }
    }

    /// Flip the sort mode, rebuilding the session at page 0.
    ///
    /// Switching to distance mode ranks the current result set and fills
    /// the distance cache; switching back re-sorts by name and drops it.
    pub fn toggle_sort(&self, session: &BrowseSession) -> BrowseSession {
        let mode = session.sort.toggled();
        log::info!("sort mode changed to {mode:?}");

        match mode {
            SortMode::Alphabetical => {
                let mut results = session.results.clone();
                sort_alphabetical(&mut results);
                BrowseSession {
                    results,
                    page: 0,
                    sort: mode,
                    origin: session.origin,
                    distances: AHashMap::new(),
                }
            }
            SortMode::Distance => {
                let resolver = self.resolver.as_deref().map(|r| r as &dyn PositionResolver);
                let ranked = rank_by_distance(&session.results, session.origin, resolver);

                let mut results = Vec::with_capacity(ranked.len());
                let mut distances = AHashMap::with_capacity(ranked.len());
                for (waypoint, distance) in ranked {
                    distances.insert(waypoint.destination_id.clone(), distance);
                    results.push(waypoint);
                }

                BrowseSession {
                    results,
                    page: 0,
                    sort: mode,
                    origin: session.origin,
                    distances,
                }
            }
        }
    }

    // Capture workflow; see `capture` for the lifecycle rules.

    pub fn begin_capture(&self, user: Uuid) {
        self.captures.begin(user);
    }

    pub fn commit_capture(&self, user: Uuid, text: impl Into<String>) {
        self.captures.commit(user, text);
    }

    pub fn consume_capture(&self, user: Uuid) -> Option<String> {
        self.captures.consume(user)
    }

    pub fn abandon_capture(&self, user: Uuid) {
        self.captures.abandon(user);
    }

    /// Disconnect hook: drop everything held for this user.
    pub fn user_departed(&self, user: Uuid) {
        self.captures.abandon(user);
    }

    /// Number of users with an uncommitted pending query.
    pub fn pending_captures(&self) -> usize {
        self.captures.len()
    }
}

fn sort_alphabetical(waypoints: &mut [Waypoint]) {
    waypoints.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}
