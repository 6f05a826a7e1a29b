//! Unix waypoint daemon
//!
//! Keeps the parsed catalog in memory and serves browse/search/capture
//! requests over a Unix socket. One thread per connection; a connection is
//! one user, identified for the lifetime of the connection and cleaned up
//! (session dropped, pending capture cleared) when it closes.

use crate::catalog::{CatalogLoader, CatalogStore};
use crate::distance::PositionResolver;
use crate::server::protocol::{
    Request, Response, StatusResponse, ViewResponse, read_message, write_message,
};
use crate::server::{get_pid_path, get_socket_path};
use crate::session::{BrowseSession, SessionManager};
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Connection timeout
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Daemon counters
struct DaemonStats {
    start_time: Instant,
    searches_served: AtomicU64,
    connected_users: AtomicUsize,
}

impl DaemonStats {
    fn new() -> Self {
        Self {
            start_time: Instant::now(),
            searches_served: AtomicU64::new(0),
            connected_users: AtomicUsize::new(0),
        }
    }
}

/// The waypoint daemon
pub struct WaymarkDaemon {
    store: Arc<CatalogStore>,
    loader: CatalogLoader,
    manager: SessionManager,
    stats: DaemonStats,
    shutdown: AtomicBool,
}

impl WaymarkDaemon {
    /// Create a daemon serving the given waypoint document, wrapped in Arc
    pub fn new(
        document: PathBuf,
        resolver: Option<Arc<dyn PositionResolver + Send + Sync>>,
    ) -> Arc<Self> {
        let store = Arc::new(CatalogStore::new());
        let loader = CatalogLoader::new(document, Arc::clone(&store));
        let manager = match resolver {
            Some(resolver) => SessionManager::with_resolver(Arc::clone(&store), resolver),
            None => SessionManager::new(Arc::clone(&store)),
        };

        Arc::new(Self {
            store,
            loader,
            manager,
            stats: DaemonStats::new(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Start the daemon on the default socket (blocking)
    pub fn run(self: &Arc<Self>) -> Result<()> {
        let socket_path = get_socket_path();
        let pid_path = get_pid_path();

        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Remove stale socket file
        if socket_path.exists() {
            fs::remove_file(&socket_path)?;
        }

        // Write PID file
        fs::write(&pid_path, format!("{}", std::process::id()))?;

        // Bind to socket
        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Failed to bind to {}", socket_path.display()))?;

        // Set socket permissions (user only)
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&socket_path, fs::Permissions::from_mode(0o600))?;
        }

        log::info!("waymarkd: listening on {}", socket_path.display());

        let result = self.serve(listener);

        // Cleanup
        let _ = fs::remove_file(&socket_path);
        let _ = fs::remove_file(&pid_path);

        result
    }

    /// Serve connections on an already-bound listener (blocking).
    ///
    /// Loads the catalog first; a load failure is logged and the daemon
    /// still starts, rejecting browse/search until a reload succeeds.
    pub fn serve(self: &Arc<Self>, listener: UnixListener) -> Result<()> {
        if let Err(e) = self.loader.load() {
            log::error!("waymarkd: initial catalog load failed: {e}");
        }

        for stream in listener.incoming() {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            match stream {
                Ok(stream) => {
                    // Set timeout
                    let _ = stream.set_read_timeout(Some(CONNECTION_TIMEOUT));
                    let _ = stream.set_write_timeout(Some(CONNECTION_TIMEOUT));

                    // Handle in new thread
                    let daemon = Arc::clone(self);
                    thread::spawn(move || {
                        if let Err(e) = daemon.handle_connection(stream) {
                            log::warn!("waymarkd: connection error: {e}");
                        }
                    });
                }
                Err(e) => {
                    log::warn!("waymarkd: accept error: {e}");
                }
            }
        }

        Ok(())
    }

    /// Handle a single user connection
    fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        let user = uuid::Uuid::new_v4();
        let mut session: Option<BrowseSession> = None;

        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = BufWriter::new(stream);

        self.stats.connected_users.fetch_add(1, Ordering::Relaxed);

        let result = loop {
            // Read request
            let request: Request = match read_message(&mut reader) {
                Ok(req) => req,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    // Client disconnected
                    break Ok(());
                }
                Err(e) => {
                    let resp = Response::Error {
                        message: format!("Invalid request: {e}"),
                    };
                    if let Err(e) = write_message(&mut writer, &resp) {
                        break Err(e.into());
                    }
                    continue;
                }
            };

            // Handle request
            let response = self.handle_request(user, &mut session, request);

            // Send response
            if let Err(e) = write_message(&mut writer, &response) {
                break Err(e.into());
            }

            // Check for shutdown
            if matches!(response, Response::ShuttingDown) {
                break Ok(());
            }
        };

        // Departure: drop the session and any pending capture for this user
        self.manager.user_departed(user);
        self.stats.connected_users.fetch_sub(1, Ordering::Relaxed);

        result
    }

    /// Handle a single request against this user's session slot
    fn handle_request(
        &self,
        user: uuid::Uuid,
        session: &mut Option<BrowseSession>,
        request: Request,
    ) -> Response {
        match request {
            Request::Open { origin } => {
                if self.store.count() == 0 {
                    return Response::Error {
                        message: "Waypoint catalog is empty".to_string(),
                    };
                }
                let opened = self.manager.open_browser(origin);
                let view = ViewResponse::of_page(&opened);
                *session = Some(opened);
                Response::View(view)
            }

            Request::Search { query, origin } => {
                if self.store.count() == 0 {
                    return Response::Error {
                        message: "Waypoint catalog is empty".to_string(),
                    };
                }
                self.stats.searches_served.fetch_add(1, Ordering::Relaxed);
                let opened = self.manager.open_search(&query, origin);
                let view = ViewResponse::of_page(&opened);
                *session = Some(opened);
                Response::View(view)
            }

            Request::Page { page } => match session {
                Some(current) => {
                    let pages = current.total_pages().max(1);
                    if page >= pages {
                        return Response::Error {
                            message: format!("Page {page} out of range (0..{pages})"),
                        };
                    }
                    let turned = self.manager.turn_page(current, page);
                    let view = ViewResponse::of_page(&turned);
                    *session = Some(turned);
                    Response::View(view)
                }
                None => no_session(),
            },

            Request::ToggleSort => match session {
                Some(current) => {
                    let toggled = self.manager.toggle_sort(current);
                    let view = ViewResponse::of_page(&toggled);
                    *session = Some(toggled);
                    Response::View(view)
                }
                None => no_session(),
            },

            Request::Activate { slot } => match session {
                Some(current) => match current.waypoint_at(slot) {
                    Some(waypoint) => {
                        log::info!(
                            "user {user} activating waypoint '{}' (destination: {})",
                            waypoint.name,
                            waypoint.destination_id
                        );
                        Response::Destination {
                            id: waypoint.destination_id.clone(),
                        }
                    }
                    None => Response::Error {
                        message: format!("No waypoint at slot {slot}"),
                    },
                },
                None => no_session(),
            },

            Request::CommitCapture { text } => {
                self.manager.commit_capture(user, text);
                Response::CaptureAck
            }

            Request::ConsumeCapture => Response::Captured {
                text: self.manager.consume_capture(user),
            },

            Request::AbandonCapture => {
                self.manager.abandon_capture(user);
                Response::CaptureAck
            }

            Request::Count => Response::Count {
                waypoints: self.store.count(),
            },

            Request::Reload => match self.loader.reload() {
                Ok(summary) => Response::Reloaded {
                    success: true,
                    message: format!(
                        "Reloaded {} waypoints ({} skipped)",
                        summary.loaded, summary.skipped
                    ),
                },
                Err(e) => Response::Reloaded {
                    success: false,
                    message: format!("Failed to reload: {e}"),
                },
            },

            Request::Status => Response::Status(StatusResponse {
                uptime_secs: self.stats.start_time.elapsed().as_secs(),
                waypoints: self.store.count(),
                connected_users: self.stats.connected_users.load(Ordering::Relaxed),
                pending_captures: self.manager.pending_captures(),
                searches_served: self.stats.searches_served.load(Ordering::Relaxed),
            }),

            Request::Shutdown => {
                self.shutdown.store(true, Ordering::Relaxed);
                Response::ShuttingDown
            }

            Request::Ping => Response::Pong,
        }
    }
}

fn no_session() -> Response {
    Response::Error {
        message: "No open session; send Open or Search first".to_string(),
    }
}

/// Daemonize the current process
pub fn daemonize(
    document: PathBuf,
    resolver: Option<Arc<dyn PositionResolver + Send + Sync>>,
) -> Result<()> {
    // Fork using double-fork technique for proper daemonization
    match unsafe { libc::fork() } {
        -1 => anyhow::bail!("First fork failed"),
        0 => {
            // Child process
            // Create new session
            if unsafe { libc::setsid() } == -1 {
                anyhow::bail!("setsid failed");
            }

            // Second fork to prevent acquiring a controlling terminal
            match unsafe { libc::fork() } {
                -1 => anyhow::bail!("Second fork failed"),
                0 => {
                    // Grandchild - this becomes the daemon
                    // Close standard file descriptors
                    unsafe {
                        libc::close(0);
                        libc::close(1);
                        libc::close(2);

                        // Redirect to /dev/null
                        let null = libc::open(c"/dev/null".as_ptr(), libc::O_RDWR);
                        if null != -1 {
                            libc::dup2(null, 0);
                            libc::dup2(null, 1);
                            libc::dup2(null, 2);
                            if null > 2 {
                                libc::close(null);
                            }
                        }
                    }

                    // Now run the daemon
                    let daemon = WaymarkDaemon::new(document, resolver);
                    if let Err(e) = daemon.run() {
                        // Can't really report this since stdout is closed
                        let _ = fs::write("/tmp/waymarkd-error.log", format!("{e}"));
                    }
                    std::process::exit(0);
                }
                _ => {
                    // First child exits immediately
                    std::process::exit(0);
                }
            }
        }
        _ => {
            // Parent process - wait for first child then exit
            unsafe {
                let mut status: libc::c_int = 0;
                libc::wait(&mut status);
            }
            Ok(())
        }
    }
}

/// Stop the running daemon
pub fn stop_daemon() -> Result<bool> {
    let pid_path = get_pid_path();

    if !pid_path.exists() {
        return Ok(false);
    }

    let pid_str = fs::read_to_string(&pid_path)?;
    let pid: i32 = pid_str.trim().parse()?;

    // Send SIGTERM
    unsafe {
        if libc::kill(pid, libc::SIGTERM) == 0 {
            // Wait a bit for graceful shutdown
            thread::sleep(Duration::from_millis(500));

            // Check if still running, send SIGKILL if needed
            if libc::kill(pid, 0) == 0 {
                thread::sleep(Duration::from_secs(1));
                if libc::kill(pid, 0) == 0 {
                    libc::kill(pid, libc::SIGKILL);
                }
            }
        }
    }

    // Clean up socket and pid files
    let socket_path = get_socket_path();
    let _ = fs::remove_file(&socket_path);
    let _ = fs::remove_file(&pid_path);

    Ok(true)
}
