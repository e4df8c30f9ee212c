//! Null backend: generic math only.
//!
//! The null backend renders nothing natively. It is always available, so the
//! manager initializes it first and falls back to it whenever a native backend
//! is missing.

use parking_lot::Mutex;
use spatia_core::{ProcessOptions, ProcessedAudioResult, Result, SpatialProcessor, SpatialRequest};

use crate::backend::{
    BackendCapabilities, BackendConfig, BackendDescriptor, BackendKind, SpatialBackend,
    not_initialized,
};

/// Identifier of the null backend.
pub const NULL_BACKEND_ID: &str = "none";

/// Backend that returns the processor's generic parameters unchanged.
#[derive(Debug, Default)]
pub struct NullBackend {
    processor: Mutex<Option<SpatialProcessor>>,
}

impl NullBackend {
    /// Create an uninitialized null backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialBackend for NullBackend {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor {
            id: NULL_BACKEND_ID.to_owned(),
            name: "No Backend".to_owned(),
            kind: BackendKind::None,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            description: "Spatial parameters only, no native rendering".to_owned(),
            capabilities: BackendCapabilities::none(),
        }
    }

    fn id(&self) -> &str {
        NULL_BACKEND_ID
    }

    fn initialize(&self, config: &BackendConfig) -> Result<()> {
        let mut processor = self.processor.lock();
        if processor.is_none() {
            *processor = Some(SpatialProcessor::new(config.processor));
            tracing::debug!(backend = NULL_BACKEND_ID, "backend initialized");
        }
        Ok(())
    }

    fn shutdown(&self) {
        if self.processor.lock().take().is_some() {
            tracing::debug!(backend = NULL_BACKEND_ID, "backend shut down");
        }
    }

    fn is_initialized(&self) -> bool {
        self.processor.lock().is_some()
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::none()
    }

    fn process(&self, request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult> {
        let processor = (*self.processor.lock()).ok_or_else(|| not_initialized(NULL_BACKEND_ID))?;

        let mut result = processor.process(request, ProcessOptions::default())?;
        result.backend = NULL_BACKEND_ID.to_owned();
        result.set_param("note", "No native spatial processing available");
        result.set_param("processing_applied", false);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatia_core::{AudioProfile, ListenerPose, SpatialError, Vec3};

    #[test]
    fn process_requires_initialize() {
        let backend = NullBackend::new();
        let profile = AudioProfile::new("p");
        let request = SpatialRequest::new(&profile, Vec3::Z, ListenerPose::default());

        let err = backend.process(&request).unwrap_err();
        assert!(matches!(err, SpatialError::UnsupportedOperation(_)));

        backend.initialize(&BackendConfig::default()).unwrap();
        let result = backend.process(&request).unwrap();
        assert_eq!(result.backend, "none");
        assert_eq!(
            result.param("processing_applied").and_then(|v| v.as_bool()),
            Some(false)
        );
        assert!(result.param("note").is_some());
        assert!(result.doppler_shift.is_none());
    }

    #[test]
    fn shutdown_is_always_safe() {
        let backend = NullBackend::new();
        backend.shutdown();
        backend.initialize(&BackendConfig::default()).unwrap();
        backend.initialize(&BackendConfig::default()).unwrap();
        assert!(backend.is_initialized());
        backend.shutdown();
        backend.shutdown();
        assert!(!backend.is_initialized());
    }

    #[test]
    fn declares_no_capabilities() {
        let backend = NullBackend::new();
        let caps = backend.capabilities();
        assert_eq!(caps, BackendCapabilities::none());
        assert_eq!(backend.descriptor().capabilities, caps);
        assert_eq!(backend.descriptor().kind, BackendKind::None);
    }
}
