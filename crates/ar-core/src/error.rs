use thiserror::Error;

/// Tracking failures reported by the frame source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// World tracking was lost; a restart can recover it.
    #[error("world tracking failed: {0}")]
    WorldTrackingFailed(String),
    /// Camera access, sensor or configuration failure that a restart cannot fix.
    #[error("session failed: {0}")]
    Unrecoverable(String),
}

impl SessionError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::WorldTrackingFailed(_))
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object category: {0:?}")]
pub struct UnknownCategory(pub String);
