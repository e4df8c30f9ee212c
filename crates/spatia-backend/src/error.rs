//! Errors raised by native driver seams.

use spatia_core::SpatialError;

/// Failure reported by a native driver or endpoint.
///
/// Adapters translate these into [`SpatialError`]: failures while acquiring
/// resources become `BackendInitFailed`, failures while processing become
/// `UnsupportedOperation`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// The native runtime library is not installed.
    #[error("native runtime not found: {0}")]
    RuntimeMissing(String),

    /// No usable output device.
    #[error("device error: {0}")]
    Device(String),

    /// The rendering context could not be created or used.
    #[error("context error: {0}")]
    Context(String),

    /// A voice/object could not be allocated or updated.
    #[error("source error: {0}")]
    Source(String),

    /// A handle did not refer to a live native object.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
}

impl DriverError {
    /// Convert an acquisition failure for `backend` into an init error.
    pub fn into_init_failure(self, backend: &str) -> SpatialError {
        SpatialError::init_failed(backend, self.to_string())
    }

    /// Convert a per-call failure for `backend` into a processing error.
    pub fn into_process_failure(self, backend: &str) -> SpatialError {
        SpatialError::unsupported(format!("{backend}: {self}"))
    }
}
