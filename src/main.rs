/// Main entry point for the Mood Journal MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use mood_journal_mcp::{AnalyticsConfig, CorrelationMethod, MoodJournalServer, UserId};
use mood_journal_mcp::config::DEFAULT_WINDOW_DAYS;

/// Find a writable directory for the database, falling back to the temp dir
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".mood_journal")),
        dirs::data_dir().map(|p| p.join("mood_journal")),
        dirs::config_dir().map(|p| p.join("mood_journal")),
        std::env::current_dir().ok().map(|p| p.join(".mood_journal")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("journal.db"));
            }
        }
    }

    let temp_path = std::env::temp_dir().join("mood_journal");
    std::fs::create_dir_all(&temp_path)?;
    let db_path = temp_path.join("journal.db");

    tracing::warn!("Using temporary directory for database: {}", db_path.display());
    Ok(db_path)
}

/// Command line arguments for the Mood Journal MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Journal owner the entries are recorded for
    #[arg(long, default_value = "local")]
    user: String,

    /// Trailing days of history used for insights
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    window_days: u32,

    /// Use Pearson correlation instead of the weighted heuristic
    #[arg(long)]
    pearson: bool,

    /// JSON file with a custom achievement catalog
    #[arg(long)]
    achievements: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("mood_journal_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting Mood Journal MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let method = if args.pearson {
        CorrelationMethod::Pearson
    } else {
        CorrelationMethod::Heuristic
    };
    let config = AnalyticsConfig::new(args.window_days, method, args.achievements.as_deref())?;

    let server = MoodJournalServer::new(db_path, config, UserId::new(args.user)).await?;

    server.run().await?;

    info!("Mood Journal MCP server shutdown complete");
    Ok(())
}
