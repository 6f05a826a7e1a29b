use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use waymark::catalog::{CatalogLoader, CatalogStore};
use waymark::distance::{Position, PositionResolver, StaticResolver};
use waymark::output::{print_results, print_view};
use waymark::server::protocol::ViewResponse;
use waymark::server::{WaymarkClient, daemon, get_socket_path, is_daemon_running};
use waymark::session::SessionManager;

#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Waypoint catalog search and browsing")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Path to the waypoint document
    #[arg(short, long, global = true, default_value = "waypoints.yml")]
    file: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and print matching waypoints
    Search {
        /// Search terms (all must match)
        query: Vec<String>,
    },
    /// Browse a page of the catalog
    Browse {
        /// Page to show (0-based, clamped to the last page)
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rank by distance instead of name
        #[arg(long)]
        by_distance: bool,

        /// Reference position as "x,y,z" for distance ranking
        #[arg(long)]
        origin: Option<String>,

        /// YAML file mapping destination ids to positions
        #[arg(long)]
        positions: Option<PathBuf>,
    },
    /// Load the catalog and show entry counts
    Stats,
    /// Ask a running daemon to reload the catalog
    Reload,
    /// Manage the waypoint daemon (keeps the catalog warm for clients)
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

#[derive(Subcommand)]
enum DaemonAction {
    /// Start the daemon in background
    Start {
        /// YAML file mapping destination ids to positions
        #[arg(long)]
        positions: Option<PathBuf>,
    },
    /// Stop the running daemon
    Stop,
    /// Check daemon status
    Status,
    /// Run the daemon in foreground (for debugging)
    Foreground {
        /// YAML file mapping destination ids to positions
        #[arg(long)]
        positions: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let color = !cli.no_color;

    match cli.command {
        Some(Commands::Search { query }) => {
            run_search(&cli.file, &query.join(" "), color)?;
        }
        Some(Commands::Browse {
            page,
            by_distance,
            origin,
            positions,
        }) => {
            run_browse(&cli.file, page, by_distance, origin, positions, color)?;
        }
        Some(Commands::Stats) => {
            run_stats(&cli.file)?;
        }
        Some(Commands::Reload) => {
            run_reload()?;
        }
        Some(Commands::Daemon { action }) => {
            handle_daemon_command(action, cli.file)?;
        }
        None => {
            if cli.query.is_empty() {
                run_browse(&cli.file, 0, false, None, None, color)?;
            } else {
                run_search(&cli.file, &cli.query.join(" "), color)?;
            }
        }
    }

    Ok(())
}

/// Load the document and build a session manager, with an optional
/// file-backed position resolver
fn load_manager(file: &PathBuf, positions: Option<PathBuf>) -> Result<SessionManager> {
    let store = Arc::new(CatalogStore::new());
    let loader = CatalogLoader::new(file, Arc::clone(&store));
    loader
        .load()
        .with_context(|| format!("loading {}", file.display()))?;

    match positions {
        Some(path) => {
            let resolver = load_resolver(&path)?;
            Ok(SessionManager::with_resolver(store, Arc::new(resolver)))
        }
        None => Ok(SessionManager::new(store)),
    }
}

fn load_resolver(path: &PathBuf) -> Result<StaticResolver> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading positions file {}", path.display()))?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing positions file {}", path.display()))?;
    Ok(StaticResolver::from_document(&doc))
}

/// Parse an "x,y,z" triple into a position
fn parse_origin(raw: &str) -> Result<Position> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("origin must be \"x,y,z\", got {raw:?}");
    }
    let x: f64 = parts[0].parse().context("origin x is not a number")?;
    let y: f64 = parts[1].parse().context("origin y is not a number")?;
    let z: f64 = parts[2].parse().context("origin z is not a number")?;
    Ok(Position::new(x, y, z))
}

fn run_search(file: &PathBuf, query: &str, color: bool) -> Result<()> {
    let manager = load_manager(file, None)?;
    let session = manager.open_search(query, None);
    print_results(session.results(), query, color)?;
    Ok(())
}

fn run_browse(
    file: &PathBuf,
    page: usize,
    by_distance: bool,
    origin: Option<String>,
    positions: Option<PathBuf>,
    color: bool,
) -> Result<()> {
    let origin = origin.as_deref().map(parse_origin).transpose()?;
    let manager = load_manager(file, positions)?;

    let mut session = manager.open_browser(origin);
    if by_distance {
        session = manager.toggle_sort(&session);
    }

    // Presentation-side clamp to the valid page range
    let page = page.min(session.total_pages().saturating_sub(1));
    session = manager.turn_page(&session, page);

    print_view(&ViewResponse::of_page(&session), color)?;
    Ok(())
}

fn run_stats(file: &PathBuf) -> Result<()> {
    let store = Arc::new(CatalogStore::new());
    let loader = CatalogLoader::new(file, Arc::clone(&store));
    let summary = loader
        .load()
        .with_context(|| format!("loading {}", file.display()))?;

    println!("Waypoint document: {}", file.display());
    println!("  Waypoints: {}", summary.loaded);
    println!("  Skipped entries: {}", summary.skipped);
    Ok(())
}

fn run_reload() -> Result<()> {
    if !is_daemon_running() {
        println!("Daemon is not running. Start it with 'waymark daemon start'");
        return Ok(());
    }

    match WaymarkClient::connect() {
        Some(mut client) => match client.reload() {
            Ok((true, message)) => println!("{message}"),
            Ok((false, message)) => println!("Reload failed: {message}"),
            Err(e) => println!("Failed to reload: {e}"),
        },
        None => println!("Failed to connect to daemon"),
    }
    Ok(())
}

fn handle_daemon_command(action: DaemonAction, file: PathBuf) -> Result<()> {
    match action {
        DaemonAction::Start { positions } => {
            if is_daemon_running() {
                println!("Daemon is already running");
                return Ok(());
            }

            let resolver = build_resolver(positions)?;
            println!("Starting waymark daemon...");
            daemon::daemonize(file, resolver)?;

            // Wait a moment for daemon to start
            std::thread::sleep(std::time::Duration::from_millis(500));

            if is_daemon_running() {
                println!("Daemon started (socket: {})", get_socket_path().display());
            } else {
                println!("Daemon may have failed to start. Check /tmp/waymarkd-error.log");
            }
        }

        DaemonAction::Stop => {
            if !is_daemon_running() {
                println!("Daemon is not running");
                return Ok(());
            }

            println!("Stopping daemon...");

            // Try graceful shutdown via client first
            if let Some(mut client) = WaymarkClient::connect() {
                let _ = client.shutdown();
                std::thread::sleep(std::time::Duration::from_millis(500));
            }

            // Force stop if still running
            if is_daemon_running() {
                daemon::stop_daemon()?;
            }

            println!("Daemon stopped");
        }

        DaemonAction::Status => {
            if !is_daemon_running() {
                println!("Daemon is not running");
                return Ok(());
            }

            match WaymarkClient::connect() {
                Some(mut client) => match client.status() {
                    Ok(status) => {
                        println!("waymark daemon status:");
                        println!("  Uptime: {}s", status.uptime_secs);
                        println!("  Waypoints: {}", status.waypoints);
                        println!("  Connected users: {}", status.connected_users);
                        println!("  Pending captures: {}", status.pending_captures);
                        println!("  Searches served: {}", status.searches_served);
                    }
                    Err(e) => {
                        println!("Failed to get status: {e}");
                    }
                },
                None => {
                    println!("Daemon is running but not responding");
                }
            }
        }

        DaemonAction::Foreground { positions } => {
            if is_daemon_running() {
                println!(
                    "Daemon is already running in background. Stop it first with 'waymark daemon stop'"
                );
                return Ok(());
            }

            let resolver = build_resolver(positions)?;
            println!("Running daemon in foreground (Ctrl+C to stop)...");
            daemon::WaymarkDaemon::new(file, resolver).run()?;
        }
    }

    Ok(())
}

fn build_resolver(
    positions: Option<PathBuf>,
) -> Result<Option<Arc<dyn PositionResolver + Send + Sync>>> {
    match positions {
        Some(path) => {
            let resolver = load_resolver(&path)?;
            Ok(Some(Arc::new(resolver)))
        }
        None => Ok(None),
    }
}
