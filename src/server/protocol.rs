//! Protocol messages for client-daemon communication
//!
//! Uses a simple length-prefixed JSON protocol:
//! - 4 bytes (little-endian u32): message length
//! - N bytes: JSON-encoded message
//!
//! Each connection is one user context: the daemon assigns it an identity
//! and keeps its browsing session server-side, so requests navigate "the
//! current view" rather than re-sending state.

use crate::distance::Position;
use crate::session::SortMode;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Request from client to daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Open the browser over the full catalog
    Open { origin: Option<Position> },

    /// Open a session over search results
    Search {
        query: String,
        origin: Option<Position>,
    },

    /// Turn to another page of the current session
    Page { page: usize },

    /// Flip the current session between alphabetical and distance order
    ToggleSort,

    /// Resolve a page slot to the destination behind it
    Activate { slot: usize },

    /// Store pending query text for this user
    CommitCapture { text: String },

    /// Read-and-remove the pending query text
    ConsumeCapture,

    /// Drop the pending query text without reading it
    AbandonCapture,

    /// Number of waypoints in the current catalog snapshot
    Count,

    /// Reload the catalog document from disk
    Reload,

    /// Check daemon health and get stats
    Status,

    /// Graceful shutdown request
    Shutdown,

    /// Ping for connection testing
    Ping,
}

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Current page of the user's session
    View(ViewResponse),

    /// Destination to activate, from an `Activate` request
    Destination { id: String },

    /// Result of a capture consume: the pending text, if any was committed
    Captured { text: Option<String> },

    /// Capture commit/abandon acknowledged
    CaptureAck,

    /// Catalog entry count
    Count { waypoints: usize },

    /// Reload completed
    Reloaded { success: bool, message: String },

    /// Daemon status
    Status(StatusResponse),

    /// Shutdown acknowledged
    ShuttingDown,

    /// Pong response
    Pong,

    /// Error response
    Error { message: String },
}

/// One page of a browsing session, ready to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub sort: SortMode,
    pub entries: Vec<EntryView>,
}

impl ViewResponse {
    /// Render the current page of a session into a wire view.
    pub fn of_page(session: &crate::session::BrowseSession) -> Self {
        use crate::distance::format_distance;

        let entries = session
            .page_slice()
            .iter()
            .map(|w| EntryView {
                name: w.name.clone(),
                display_name: w.display_name.clone(),
                lore: w.lore.clone(),
                destination_id: w.destination_id.clone(),
                distance: match session.sort() {
                    SortMode::Distance => {
                        session.distance_of(&w.destination_id).map(format_distance)
                    }
                    SortMode::Alphabetical => None,
                },
            })
            .collect();

        ViewResponse {
            page: session.page(),
            total_pages: session.total_pages(),
            total_results: session.results().len(),
            sort: session.sort(),
            entries,
        }
    }
}

/// A waypoint as shown on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub name: String,
    pub display_name: String,
    pub lore: Vec<String>,
    pub destination_id: String,
    /// Formatted distance, present only in distance sort mode
    pub distance: Option<String>,
}

/// Daemon status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Daemon uptime in seconds
    pub uptime_secs: u64,
    /// Waypoints in the current snapshot
    pub waypoints: usize,
    /// Users currently connected
    pub connected_users: usize,
    /// Pending capture values held
    pub pending_captures: usize,
    /// Searches served since startup
    pub searches_served: u64,
}

/// Write a message to a stream with length prefix
pub fn write_message<W: Write>(writer: &mut W, msg: &impl Serialize) -> std::io::Result<()> {
    let json = serde_json::to_vec(msg)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let len = json.len() as u32;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()?;

    Ok(())
}

/// Read a message from a stream with length prefix
pub fn read_message<R: Read, T: for<'de> Deserialize<'de>>(reader: &mut R) -> std::io::Result<T> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    // Sanity check: don't allocate more than 16MB
    if len > 16 * 1024 * 1024 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Message too large",
        ));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;

    serde_json::from_slice(&buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
