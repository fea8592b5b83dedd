/// Public library interface for the Mood Journal MCP server
///
/// This module exports the server, the analytics engine and the public
/// types that can be used by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{
    AchievementProgress, AnalyticsEngine, CorrelationMethod, CorrelationResult, InsightsReport,
    MoodPrediction, MoodTrend, ProgressUpdate,
};
pub use config::{AnalyticsConfig, ConfigError};
pub use domain::*;
pub use storage::{JournalStorage, RecordSource, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main mood journal server that implements the MCP protocol
///
/// Entries live in a SQLite database; streaks, achievements and insights
/// are derived from them by the analytics engine for a single user.
pub struct MoodJournalServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
    user: UserId,
}

impl MoodJournalServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(
        db_path: PathBuf,
        config: AnalyticsConfig,
        user: UserId,
    ) -> Result<Self, ServerError> {
        tracing::info!("Initializing Mood Journal server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        let analytics = AnalyticsEngine::new(config, std::sync::Arc::new(SystemClock));

        Ok(Self::from_parts(storage, analytics, user))
    }

    /// Assemble a server from already-built parts
    pub fn from_parts(storage: SqliteStorage, analytics: AnalyticsEngine, user: UserId) -> Self {
        Self {
            storage,
            analytics,
            user,
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let streak = self.storage.get_streak(&self.user)?;
        tracing::info!(
            "Server started for user '{}', current streak {} days",
            self.user,
            streak.current_streak
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }
}
