//! Store and persistence errors.

use dashboard_common::DashboardError;
use thiserror::Error;

use crate::layers::LayerId;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("State file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layer {0} is not bound to a polygon")]
    UnknownLayer(LayerId),

    #[error("Layer {0} is already bound to a polygon")]
    LayerAlreadyBound(LayerId),
}

impl StateError {
    /// Whether the error was caused by bad input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        match self {
            StateError::Dashboard(e) => e.is_user_error(),
            StateError::UnknownLayer(_) | StateError::LayerAlreadyBound(_) => true,
            StateError::Io(_) | StateError::Json(_) => false,
        }
    }
}
