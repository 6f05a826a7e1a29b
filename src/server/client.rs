//! Client for connecting to the waypoint daemon

use crate::distance::Position;
use crate::server::get_socket_path;
use crate::server::protocol::{
    Request, Response, StatusResponse, ViewResponse, read_message, write_message,
};
use std::io::{BufReader, BufWriter};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

/// Read/write timeout
const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in client operations
#[derive(Debug)]
pub enum ClientError {
    /// Daemon is not running
    NotRunning,
    /// Communication error
    IoError(std::io::Error),
    /// Daemon returned an error
    DaemonError(String),
    /// Response variant did not match the request
    InvalidResponse,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::NotRunning => write!(f, "Waypoint daemon is not running"),
            ClientError::IoError(e) => write!(f, "I/O error: {}", e),
            ClientError::DaemonError(msg) => write!(f, "Daemon error: {}", msg),
            ClientError::InvalidResponse => write!(f, "Invalid response from daemon"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::IoError(e)
    }
}

/// Client for the waypoint daemon.
///
/// One client connection is one user context on the daemon side: it owns a
/// server-held browsing session and a pending-capture slot, both dropped
/// when the connection closes.
pub struct WaymarkClient {
    reader: BufReader<UnixStream>,
    writer: BufWriter<UnixStream>,
}

impl WaymarkClient {
    /// Try to connect to the running daemon on the default socket
    /// Returns None if the daemon is not running
    pub fn connect() -> Option<Self> {
        let socket_path = get_socket_path();

        // Quick check if socket exists
        if !socket_path.exists() {
            return None;
        }

        Self::connect_to(&socket_path).ok()
    }

    /// Connect to a daemon on a specific socket path
    pub fn connect_to(socket_path: &Path) -> ClientResult<Self> {
        let stream = UnixStream::connect(socket_path).map_err(|_| ClientError::NotRunning)?;

        // Set timeouts
        let _ = stream.set_read_timeout(Some(IO_TIMEOUT));
        let _ = stream.set_write_timeout(Some(IO_TIMEOUT));

        let reader = BufReader::new(stream.try_clone()?);
        let writer = BufWriter::new(stream);

        Ok(Self { reader, writer })
    }

    fn roundtrip(&mut self, request: &Request) -> ClientResult<Response> {
        write_message(&mut self.writer, request)?;
        let response: Response = read_message(&mut self.reader)?;
        match response {
            Response::Error { message } => Err(ClientError::DaemonError(message)),
            other => Ok(other),
        }
    }

    fn expect_view(&mut self, request: Request) -> ClientResult<ViewResponse> {
        match self.roundtrip(&request)? {
            Response::View(view) => Ok(view),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Open a browsing session over the full catalog
    pub fn open(&mut self, origin: Option<Position>) -> ClientResult<ViewResponse> {
        self.expect_view(Request::Open { origin })
    }

    /// Open a browsing session over search results
    pub fn search(&mut self, query: &str, origin: Option<Position>) -> ClientResult<ViewResponse> {
        self.expect_view(Request::Search {
            query: query.to_string(),
            origin,
        })
    }

    /// Turn to another page of the current session
    pub fn page(&mut self, page: usize) -> ClientResult<ViewResponse> {
        self.expect_view(Request::Page { page })
    }

    /// Flip the current session's sort mode
    pub fn toggle_sort(&mut self) -> ClientResult<ViewResponse> {
        self.expect_view(Request::ToggleSort)
    }

    /// Resolve a slot on the current page to its destination id
    pub fn activate(&mut self, slot: usize) -> ClientResult<String> {
        match self.roundtrip(&Request::Activate { slot })? {
            Response::Destination { id } => Ok(id),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Store pending query text for this user
    pub fn commit_capture(&mut self, text: &str) -> ClientResult<()> {
        match self.roundtrip(&Request::CommitCapture {
            text: text.to_string(),
        })? {
            Response::CaptureAck => Ok(()),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Read-and-remove the pending query text
    pub fn consume_capture(&mut self) -> ClientResult<Option<String>> {
        match self.roundtrip(&Request::ConsumeCapture)? {
            Response::Captured { text } => Ok(text),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Drop the pending query text without reading it
    pub fn abandon_capture(&mut self) -> ClientResult<()> {
        match self.roundtrip(&Request::AbandonCapture)? {
            Response::CaptureAck => Ok(()),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Number of waypoints in the daemon's current snapshot
    pub fn count(&mut self) -> ClientResult<usize> {
        match self.roundtrip(&Request::Count)? {
            Response::Count { waypoints } => Ok(waypoints),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Ask the daemon to reload the catalog document
    pub fn reload(&mut self) -> ClientResult<(bool, String)> {
        match self.roundtrip(&Request::Reload)? {
            Response::Reloaded { success, message } => Ok((success, message)),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Get daemon status
    pub fn status(&mut self) -> ClientResult<StatusResponse> {
        match self.roundtrip(&Request::Status)? {
            Response::Status(status) => Ok(status),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Request graceful shutdown
    pub fn shutdown(&mut self) -> ClientResult<()> {
        match self.roundtrip(&Request::Shutdown)? {
            Response::ShuttingDown => Ok(()),
            _ => Err(ClientError::InvalidResponse),
        }
    }

    /// Ping for connection testing
    pub fn ping(&mut self) -> ClientResult<()> {
        match self.roundtrip(&Request::Ping)? {
            Response::Pong => Ok(()),
            _ => Err(ClientError::InvalidResponse),
        }
    }
}
