//! # Waymark - Waypoint Catalog Search
//!
//! Waymark catalogs named waypoints loaded from an external YAML document,
//! offers free-text search over them, ranks them by distance from a caller's
//! position, and manages per-user paginated browsing sessions.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`catalog`] - Entry types, tolerant document parsing, snapshot store
//! - [`search`] - Markup stripping and multi-term AND substring matching
//! - [`distance`] - Distance ranking, fallback ordering, human formatting
//! - [`session`] - Per-user browsing sessions and pending-query capture
//! - [`server`] - Persistent daemon serving sessions over a Unix socket
//! - [`output`] - Terminal rendering of pages and search results
//!
//! ## Quick Start
//!
//! ```ignore
//! use waymark::catalog::{CatalogLoader, CatalogStore};
//! use waymark::session::SessionManager;
//! use std::sync::Arc;
//!
//! // Load the waypoint document
//! let store = Arc::new(CatalogStore::new());
//! let loader = CatalogLoader::new("waypoints.yml", Arc::clone(&store));
//! loader.load().unwrap();
//!
//! // Search and browse
//! let manager = SessionManager::new(store);
//! let session = manager.open_search("mine entrance", None);
//!
//! for waypoint in session.page_slice() {
//!     println!("{} -> {}", waypoint.name, waypoint.destination_id);
//! }
//! ```
//!
//! ## Concurrency
//!
//! The catalog is an immutable snapshot behind an atomic swap: reloads parse
//! off-lock and replace the whole list, so concurrent readers never observe
//! a half-updated catalog (at worst a just-superseded one). Sessions belong
//! to a single user and are replaced, never mutated, on every transition.

pub mod catalog;
pub mod distance;
pub mod output;
pub mod search;
pub mod server;
pub mod session;
