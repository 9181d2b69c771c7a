/// Error types for simulation, analysis and configuration

use thiserror::Error;

/// Failures surfaced by the simulators and the analyzer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("no simulation data to analyze")]
    NoData,

    #[error("simulation cancelled")]
    Cancelled,
}

impl ForecastError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ForecastError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type ForecastResult<T> = std::result::Result<T, ForecastError>;

/// Failures loading a run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}
