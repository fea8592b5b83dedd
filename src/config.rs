/// Analytics configuration
///
/// Everything the engine needs that is not record data: the achievement
/// catalog, the trailing analysis window and the correlation method. Built
/// once from command line flags and injected into `AnalyticsEngine`.

use std::path::Path;

use thiserror::Error;
use crate::analytics::CorrelationMethod;
use crate::domain::{AchievementCatalog, DomainError};

/// Default trailing window for correlations and predictions
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// Longest allowed analysis window
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Errors raised while assembling configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Analysis window must be between 1 and {max} days, got {got}")]
    InvalidWindow { got: u32, max: u32 },

    #[error("Achievement catalog error: {0}")]
    Catalog(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Days of history used by correlations, predictions and trends
    pub window_days: u32,
    pub correlation_method: CorrelationMethod,
    pub catalog: AchievementCatalog,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            correlation_method: CorrelationMethod::Heuristic,
            catalog: AchievementCatalog::standard(),
        }
    }
}

impl AnalyticsConfig {
    /// Build a validated configuration
    ///
    /// With no catalog path the standard catalog is used.
    pub fn new(
        window_days: u32,
        correlation_method: CorrelationMethod,
        catalog_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if window_days == 0 || window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidWindow {
                got: window_days,
                max: MAX_WINDOW_DAYS,
            });
        }

        let catalog = match catalog_path {
            Some(path) => {
                tracing::info!("Loading achievement catalog from {}", path.display());
                AchievementCatalog::from_json_file(path)?
            }
            None => AchievementCatalog::standard(),
        };

        Ok(Self {
            window_days,
            correlation_method,
            catalog,
        })
    }
}
