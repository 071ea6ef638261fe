//! Error types for the weather dashboard.

use thiserror::Error;

/// Result type alias using DashboardError.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Primary error type for dashboard data operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    // === Geometry Errors ===
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid polygon ring: {0}")]
    InvalidRing(String),

    // === Value Errors ===
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    // === Lookup Errors ===
    #[error("Polygon not found: {0}")]
    PolygonNotFound(String),

    #[error("Data source not found: {0}")]
    DataSourceNotFound(String),

    // === Infrastructure Errors ===
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DashboardError {
    /// Whether the error was caused by bad input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DashboardError::InvalidGeometry(_)
                | DashboardError::InvalidRing(_)
                | DashboardError::InvalidColor(_)
                | DashboardError::InvalidTime(_)
                | DashboardError::PolygonNotFound(_)
                | DashboardError::DataSourceNotFound(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(format!("JSON error: {}", err))
    }
}
