use thiserror::Error;

/// Result for location provider operations.
pub type LocationResult<T> = std::result::Result<T, LocationError>;

/// Failures the host location provider can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    /// The user (or the platform) refused foreground location access.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider could not produce a fix (no hardware lock, airplane
    /// mode, internal provider error).
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    /// The provider gave up waiting for a fix.
    #[error("position request timed out")]
    Timeout,

    /// This build target has no location backend.
    #[error("no location provider on this platform")]
    Unsupported,
}

impl LocationError {
    pub fn unavailable<S: Into<String>>(s: S) -> Self {
        Self::PositionUnavailable(s.into())
    }
}
