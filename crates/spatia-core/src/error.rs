//! Error kinds shared by every spatia crate.

use alloc::string::String;

/// Errors surfaced by spatial processing and backend management.
///
/// Validation errors ([`UnknownProfile`](Self::UnknownProfile),
/// [`InvalidPose`](Self::InvalidPose)) are raised before any backend is touched.
/// Backend errors never leave the manager without an active backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpatialError {
    /// The profile identifier is not known to the profile store.
    #[error("unknown audio profile: {0}")]
    UnknownProfile(String),

    /// A position, orientation, occlusion factor, or time step is malformed.
    #[error("invalid pose: {0}")]
    InvalidPose(String),

    /// The requested backend identifier is not registered.
    #[error("backend not registered: {0}")]
    BackendUnavailable(String),

    /// A backend could not acquire its native resources.
    #[error("backend '{backend}' failed to initialize: {reason}")]
    BackendInitFailed {
        /// Identifier of the backend that failed.
        backend: String,
        /// Underlying reason reported by the backend.
        reason: String,
    },

    /// The operation is not supported by the backend that would serve it.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A backend with the same identifier is already registered.
    #[error("backend already registered: {0}")]
    DuplicateBackend(String),
}

impl SpatialError {
    /// Create an invalid pose error.
    pub fn invalid_pose(reason: impl Into<String>) -> Self {
        SpatialError::InvalidPose(reason.into())
    }

    /// Create a backend initialization error.
    pub fn init_failed(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        SpatialError::BackendInitFailed {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported operation error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        SpatialError::UnsupportedOperation(reason.into())
    }

    /// Stable snake-case name of the error kind, for structured responses.
    pub const fn kind(&self) -> &'static str {
        match self {
            SpatialError::UnknownProfile(_) => "unknown_profile",
            SpatialError::InvalidPose(_) => "invalid_pose",
            SpatialError::BackendUnavailable(_) => "backend_unavailable",
            SpatialError::BackendInitFailed { .. } => "backend_init_failed",
            SpatialError::UnsupportedOperation(_) => "unsupported_operation",
            SpatialError::DuplicateBackend(_) => "duplicate_backend",
        }
    }

    /// Returns true for errors raised by request validation rather than a backend.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            SpatialError::UnknownProfile(_) | SpatialError::InvalidPose(_)
        )
    }
}

/// Convenience result type for spatial operations.
pub type Result<T> = core::result::Result<T, SpatialError>;
