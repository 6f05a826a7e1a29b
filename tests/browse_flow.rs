//! End-to-end tests over the fixture document: load, search, browse, rank,
//! and drive the daemon over a Unix socket.

use std::path::PathBuf;
use std::sync::Arc;
use waymark::catalog::{CatalogError, CatalogLoader, CatalogStore};
use waymark::distance::{Position, StaticResolver};
use waymark::session::{SessionManager, SortMode};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("waypoints.yml")
}

fn loaded_store() -> Arc<CatalogStore> {
    let store = Arc::new(CatalogStore::new());
    let loader = CatalogLoader::new(fixture_path(), Arc::clone(&store));
    let summary = loader.load().expect("fixture loads");
    // 5 valid entries; "Broken" (no destination) and the bare string are skipped
    assert_eq!(summary.loaded, 5);
    assert_eq!(summary.skipped, 2);
    store
}

#[test]
fn load_then_search_then_browse() {
    let manager = SessionManager::new(loaded_store());

    // Alphabetical browse over everything
    let session = manager.open_browser(None);
    let names: Vec<&str> = session.results().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Arena", "Market", "Mine Entrance", "Outpost", "Spawn"]);
    assert_eq!(session.total_pages(), 1);

    // Search through stripped lore
    let session = manager.open_search("main area", None);
    let names: Vec<&str> = session.results().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Spawn"]);

    // Multi-term AND across fields
    let session = manager.open_search("mine pickaxe", None);
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.results()[0].destination_id, "mine1");

    // Nothing matches
    let session = manager.open_search("nonexistent", None);
    assert!(session.results().is_empty());
    assert_eq!(session.total_pages(), 0);
}

#[test]
fn distance_mode_ranks_and_formats() {
    let mut resolver = StaticResolver::new();
    resolver.insert("spawn", Position::new(0.0, 64.0, 3.0));
    resolver.insert("market", Position::new(400.0, 70.0, 0.0));
    resolver.insert("mine1", Position::new(4000.0, 12.0, 0.0));
    // arena and outpost stay unresolved

    let manager = SessionManager::with_resolver(loaded_store(), Arc::new(resolver));
    let session = manager.open_browser(Some(Position::new(0.0, 0.0, 0.0)));
    let ranked = manager.toggle_sort(&session);

    assert_eq!(ranked.sort(), SortMode::Distance);
    let names: Vec<&str> = ranked.results().iter().map(|w| w.name.as_str()).collect();
    // Resolved ascending, then unresolved alphabetically
    assert_eq!(names, vec!["Spawn", "Market", "Mine Entrance", "Arena", "Outpost"]);

    assert_eq!(ranked.distance_of("spawn"), Some(3.0));
    assert_eq!(
        waymark::distance::format_distance(ranked.distance_of("mine1").unwrap()),
        "4K blocks"
    );
    assert_eq!(
        waymark::distance::format_distance(ranked.distance_of("arena").unwrap()),
        "Unknown"
    );
}

#[test]
fn reload_failure_keeps_serving_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waypoints.yml");
    std::fs::copy(fixture_path(), &path).unwrap();

    let store = Arc::new(CatalogStore::new());
    let loader = CatalogLoader::new(&path, Arc::clone(&store));
    loader.load().unwrap();
    assert_eq!(store.count(), 5);

    // Sever the document, then reload: the old snapshot must survive
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(loader.reload(), Err(CatalogError::MissingSource(_))));
    assert_eq!(store.count(), 5);

    let manager = SessionManager::new(store);
    let session = manager.open_search("spawn", None);
    assert_eq!(session.results().len(), 1);
}

mod daemon {
    use super::*;
    use std::os::unix::net::UnixListener;
    use std::thread;
    use std::time::Duration;
    use waymark::server::WaymarkClient;
    use waymark::server::daemon::WaymarkDaemon;

    /// Bind a daemon to a socket in a fresh temp dir and return a connected
    /// client plus the guard keeping the dir alive.
    fn start_daemon() -> (WaymarkClient, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("waymark.sock");

        let listener = UnixListener::bind(&socket).unwrap();
        let daemon = WaymarkDaemon::new(fixture_path(), None);
        thread::spawn(move || {
            let _ = daemon.serve(listener);
        });

        // The daemon loads the catalog before accepting; retry briefly
        for _ in 0..50 {
            if let Ok(mut client) = WaymarkClient::connect_to(&socket) {
                if client.ping().is_ok() {
                    return (client, dir);
                }
            }
            thread::sleep(Duration::from_millis(20));
        }
        panic!("daemon did not come up");
    }

    #[test]
    fn session_flow_over_the_socket() {
        let (mut client, _dir) = start_daemon();

        assert_eq!(client.count().unwrap(), 5);

        let view = client.open(None).unwrap();
        assert_eq!(view.total_results, 5);
        assert_eq!(view.page, 0);
        assert_eq!(view.entries[0].name, "Arena");
        assert!(view.entries[0].distance.is_none());

        let view = client.search("trade", None).unwrap();
        let names: Vec<&str> = view.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Market"]);

        // Activate a slot on the current page
        assert_eq!(client.activate(0).unwrap(), "market");

        // Toggle sort without a resolver: alphabetical fallback, Unknown distances
        let view = client.toggle_sort().unwrap();
        assert_eq!(view.entries[0].distance.as_deref(), Some("Unknown"));
    }

    #[test]
    fn capture_is_delivered_at_most_once() {
        let (mut client, _dir) = start_daemon();

        client.commit_capture("castle").unwrap();
        assert_eq!(client.consume_capture().unwrap().as_deref(), Some("castle"));
        assert_eq!(client.consume_capture().unwrap(), None);

        // Overwrite then abandon: nothing is delivered
        client.commit_capture("first").unwrap();
        client.commit_capture("second").unwrap();
        client.abandon_capture().unwrap();
        assert_eq!(client.consume_capture().unwrap(), None);
    }

    #[test]
    fn page_turns_are_validated_server_side() {
        let (mut client, _dir) = start_daemon();

        let view = client.open(None).unwrap();
        assert_eq!(view.total_pages, 1);
        assert!(client.page(3).is_err());

        // Page 0 always works
        let view = client.page(0).unwrap();
        assert_eq!(view.page, 0);
    }

    #[test]
    fn requests_without_a_session_are_rejected() {
        let (mut client, _dir) = start_daemon();
        assert!(client.page(0).is_err());
        assert!(client.toggle_sort().is_err());
        assert!(client.activate(0).is_err());
    }

    #[test]
    fn disconnect_clears_pending_capture() {
        let (mut client, dir) = start_daemon();
        let socket = dir.path().join("waymark.sock");

        client.commit_capture("orphaned").unwrap();
        drop(client);

        // A second user connecting afterwards has its own identity and sees
        // no pending value; the daemon's table drains back to empty.
        let mut second = WaymarkClient::connect_to(&socket).unwrap();
        assert_eq!(second.consume_capture().unwrap(), None);

        for _ in 0..50 {
            if second.status().unwrap().pending_captures == 0 {
                return;
            }
            thread::sleep(Duration::from_millis(20));
        }
        panic!("pending capture leaked after disconnect");
    }
}
