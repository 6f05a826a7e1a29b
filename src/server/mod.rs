//! Persistent waypoint daemon
//!
//! Keeps the parsed catalog loaded in memory and serves browse, search, and
//! capture requests over a Unix socket. Each connection is one user context
//! with its own server-held browsing session.
//!
//! Architecture:
//! - Daemon: loads the catalog, listens on a Unix socket, one thread per user
//! - Client: connects to the socket, drives a session, renders pages
//! - Disconnect: drops the user's session and clears any pending capture

pub mod client;
pub mod daemon;
pub mod protocol;

pub use client::WaymarkClient;

use std::path::PathBuf;

/// Get the socket path for the waypoint daemon
/// Uses a per-user runtime directory for security
pub fn get_socket_path() -> PathBuf {
    // Try XDG_RUNTIME_DIR first (most secure, tmpfs-backed)
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join("waymark.sock");
    }

    // Fall back to user's home directory
    if let Some(home) = dirs::home_dir() {
        return home.join(".local").join("run").join("waymark.sock");
    }

    // Last resort: /tmp with user ID
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/waymark-{}.sock", uid))
}

/// Get the PID file path for the daemon
pub fn get_pid_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join("waymark.pid");
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".local").join("run").join("waymark.pid");
    }

    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/waymark-{}.pid", uid))
}

/// Check if the daemon is running
pub fn is_daemon_running() -> bool {
    let pid_path = get_pid_path();
    if !pid_path.exists() {
        return false;
    }

    // Read PID and check if process exists
    if let Ok(pid_str) = std::fs::read_to_string(&pid_path)
        && let Ok(pid) = pid_str.trim().parse::<i32>()
    {
        // Check if process exists using kill(pid, 0)
        unsafe {
            return libc::kill(pid, 0) == 0;
        }
    }

    false
}
