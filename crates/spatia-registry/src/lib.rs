//! Backend registry and runtime switching for spatia.
//!
//! [`BackendManager`] owns every registered [`SpatialBackend`], tracks which one
//! is active, and dispatches requests to it. The null backend is registered and
//! initialized at construction, so there is always an active backend to fall
//! back to.
//!
//! # Switching
//!
//! ```text
//!   new() ──► Active(none)
//!                │ select(target)
//!                ▼
//!        initialize(target) ──── Err ──► target.shutdown(), stay on previous
//!                │ Ok
//!                ▼
//!        swap active handle ──► previous.shutdown() (unless null)
//! ```
//!
//! Switches are serialized. Requests never block on a switch: each one takes a
//! snapshot of the active handle and completes on that backend, and the
//! previous backend is only shut down after those requests drain.
//!
//! # Example
//!
//! ```rust
//! use spatia_core::{AudioProfile, ListenerPose, SpatialRequest, Vec3};
//! use spatia_registry::BackendManager;
//!
//! let manager = BackendManager::new();
//! assert_eq!(manager.active_id(), "none");
//!
//! // Unknown backends leave the active one in place.
//! assert!(manager.select("quantum").is_err());
//! assert_eq!(manager.active_id(), "none");
//!
//! let profile = AudioProfile::new("Ash");
//! let request = SpatialRequest::new(&profile, Vec3::new(0.0, 0.0, 10.0), ListenerPose::default());
//! let result = manager.process(&request).unwrap();
//! assert_eq!(result.backend, "none");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use spatia_backend::{
    BackendCapabilities, BackendConfig, BackendDescriptor, NULL_BACKEND_ID, NullBackend,
    SpatialBackend,
};
use spatia_core::{ProcessedAudioResult, Result, SpatialError, SpatialRequest};

/// Registration state of one backend, as reported by [`BackendManager::list`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendStatus {
    /// Backend metadata and capabilities.
    pub descriptor: BackendDescriptor,
    /// Whether the backend currently holds native resources.
    pub initialized: bool,
    /// Whether the backend is the active one.
    pub active: bool,
}

/// Result of [`BackendManager::select_first_available`].
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// Backend active after the attempt.
    pub active: String,
    /// Errors from candidates that were skipped, in attempt order.
    pub failures: Vec<SpatialError>,
}

impl FallbackOutcome {
    /// True when the active backend is the null backend.
    pub fn fell_back_to_null(&self) -> bool {
        self.active == NULL_BACKEND_ID
    }
}

struct RegistryEntry {
    backend: Arc<dyn SpatialBackend>,
    config: BackendConfig,
}

struct ActiveBackend {
    id: String,
    backend: Arc<dyn SpatialBackend>,
}

/// Registry of spatial backends with one active backend.
///
/// All methods take `&self`; share the manager across threads with an `Arc`.
pub struct BackendManager {
    entries: RwLock<Vec<RegistryEntry>>,
    active: ArcSwap<ActiveBackend>,
    /// Serializes `select`.
    switch: Mutex<()>,
    /// Held shared by requests, exclusively by a switch draining the old backend.
    in_flight: RwLock<()>,
}

impl Default for BackendManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendManager {
    /// Create a manager with only the null backend, active and initialized.
    pub fn new() -> Self {
        Self::with_null_config(BackendConfig::default())
    }

    /// Create a manager whose null backend uses `config`.
    pub fn with_null_config(config: BackendConfig) -> Self {
        let null: Arc<dyn SpatialBackend> = Arc::new(NullBackend::new());
        if let Err(e) = null.initialize(&config) {
            tracing::error!(error = %e, "null backend failed to initialize");
        }
        let active = ActiveBackend {
            id: NULL_BACKEND_ID.to_owned(),
            backend: Arc::clone(&null),
        };
        Self {
            entries: RwLock::new(vec![RegistryEntry {
                backend: null,
                config,
            }]),
            active: ArcSwap::from_pointee(active),
            switch: Mutex::new(()),
            in_flight: RwLock::new(()),
        }
    }

    /// Register a backend with default settings. It is not initialized.
    pub fn register(&self, backend: Arc<dyn SpatialBackend>) -> Result<()> {
        self.register_with_config(backend, BackendConfig::default())
    }

    /// Register a backend with the settings used when it is selected.
    pub fn register_with_config(
        &self,
        backend: Arc<dyn SpatialBackend>,
        config: BackendConfig,
    ) -> Result<()> {
        let mut entries = self.entries.write();
        let id = backend.id().to_owned();
        if entries.iter().any(|e| e.backend.id() == id) {
            return Err(SpatialError::DuplicateBackend(id));
        }
        tracing::debug!(backend = %id, "backend registered");
        entries.push(RegistryEntry { backend, config });
        Ok(())
    }

    /// Registered backend ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|e| e.backend.id().to_owned())
            .collect()
    }

    /// Every registered backend with its state, in registration order.
    pub fn list(&self) -> Vec<BackendStatus> {
        let active = self.active.load();
        self.entries
            .read()
            .iter()
            .map(|e| BackendStatus {
                descriptor: e.backend.descriptor(),
                initialized: e.backend.is_initialized(),
                active: e.backend.id() == active.id,
            })
            .collect()
    }

    fn find(&self, id: &str) -> Result<(Arc<dyn SpatialBackend>, BackendConfig)> {
        self.entries
            .read()
            .iter()
            .find(|e| e.backend.id() == id)
            .map(|e| (Arc::clone(&e.backend), e.config.clone()))
            .ok_or_else(|| SpatialError::BackendUnavailable(id.to_owned()))
    }

    /// Declared capabilities of a registered backend, without activating it.
    pub fn capabilities_of(&self, id: &str) -> Result<BackendCapabilities> {
        self.find(id).map(|(backend, _)| backend.capabilities())
    }

    /// Descriptor of a registered backend.
    pub fn descriptor_of(&self, id: &str) -> Result<BackendDescriptor> {
        self.find(id).map(|(backend, _)| backend.descriptor())
    }

    /// Runtime information of a registered backend (empty until initialized).
    pub fn runtime_info_of(&self, id: &str) -> Result<BTreeMap<String, String>> {
        self.find(id).map(|(backend, _)| backend.runtime_info())
    }

    /// The active backend.
    pub fn active(&self) -> Arc<dyn SpatialBackend> {
        Arc::clone(&self.active.load().backend)
    }

    /// Identifier of the active backend.
    pub fn active_id(&self) -> String {
        self.active.load().id.clone()
    }

    /// Make `id` the active backend.
    ///
    /// Selecting the active backend is a no-op. On failure the previously
    /// active backend stays active and the target is shut down.
    pub fn select(&self, id: &str) -> Result<()> {
        let _switch = self.switch.lock();
        let previous = self.active.load_full();
        if previous.id == id {
            return Ok(());
        }
        let (target, config) = self.find(id)?;

        if let Err(e) = target.initialize(&config) {
            target.shutdown();
            tracing::warn!(
                backend = id,
                active = %previous.id,
                error = %e,
                "backend initialization failed, keeping active backend"
            );
            return Err(match e {
                SpatialError::BackendInitFailed { .. } => e,
                other => SpatialError::init_failed(id, other.to_string()),
            });
        }

        self.active.store(Arc::new(ActiveBackend {
            id: id.to_owned(),
            backend: target,
        }));
        tracing::info!(from = %previous.id, to = id, "active backend switched");

        if previous.id != NULL_BACKEND_ID {
            // Wait for requests that may still hold the old snapshot.
            drop(self.in_flight.write());
            previous.backend.shutdown();
        }
        Ok(())
    }

    /// Try each candidate in order and keep the first that initializes.
    ///
    /// Unknown ids and failing backends are skipped; when nothing succeeds the
    /// current backend stays active.
    pub fn select_first_available<I, S>(&self, candidates: I) -> FallbackOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failures = Vec::new();
        for candidate in candidates {
            let id = candidate.as_ref();
            match self.select(id) {
                Ok(()) => {
                    return FallbackOutcome {
                        active: id.to_owned(),
                        failures,
                    };
                }
                Err(e) => {
                    tracing::debug!(backend = id, error = %e, "candidate skipped");
                    failures.push(e);
                }
            }
        }
        let active = self.active_id();
        tracing::warn!(
            active = %active,
            attempts = failures.len(),
            "no preferred backend available"
        );
        FallbackOutcome { active, failures }
    }

    /// Dispatch a request to the active backend.
    ///
    /// Requests carrying motion fail with `UnsupportedOperation` when the
    /// active backend does not declare Doppler support.
    pub fn process(&self, request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult> {
        let _in_flight = self.in_flight.read();
        let active = self.active.load_full();
        if request.wants_doppler() && !active.backend.capabilities().doppler {
            return Err(SpatialError::unsupported(format!(
                "backend '{}' does not support Doppler",
                active.id
            )));
        }
        let result = active.backend.process(request);
        tracing::debug!(
            backend = %active.id,
            profile = %request.profile.id,
            ok = result.is_ok(),
            "request dispatched"
        );
        result
    }
}

impl Drop for BackendManager {
    fn drop(&mut self) {
        for entry in self.entries.get_mut().iter() {
            entry.backend.shutdown();
        }
    }
}

impl std::fmt::Debug for BackendManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendManager")
            .field("backends", &self.ids())
            .field("active", &self.active_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatia_backend::{BackendKind, PlatformBackend, VirtualEndpoint};
    use spatia_core::{AudioProfile, ListenerPose, Motion, Vec3};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend whose initialize always fails and counts shutdown calls.
    #[derive(Default)]
    struct Broken {
        shutdowns: AtomicUsize,
    }

    impl SpatialBackend for Broken {
        fn descriptor(&self) -> BackendDescriptor {
            BackendDescriptor {
                id: "broken".into(),
                name: "Broken".into(),
                kind: BackendKind::Custom,
                version: "0".into(),
                description: "never initializes".into(),
                capabilities: BackendCapabilities::none(),
            }
        }
        fn id(&self) -> &str {
            "broken"
        }
        fn initialize(&self, _config: &BackendConfig) -> Result<()> {
            Err(SpatialError::unsupported("no device"))
        }
        fn shutdown(&self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
        fn is_initialized(&self) -> bool {
            false
        }
        fn process(&self, _request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult> {
            Err(SpatialError::unsupported("never"))
        }
    }

    fn platform() -> Arc<PlatformBackend> {
        Arc::new(PlatformBackend::with_endpoint(Arc::new(VirtualEndpoint::stereo())))
    }

    #[test]
    fn starts_on_null() {
        let manager = BackendManager::new();
        let list = manager.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].descriptor.id, "none");
        assert!(list[0].initialized);
        assert!(list[0].active);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let manager = BackendManager::new();
        manager.register(platform()).unwrap();
        let err = manager.register(platform()).unwrap_err();
        assert_eq!(err, SpatialError::DuplicateBackend("platform".into()));
        assert!(matches!(
            manager.register(Arc::new(NullBackend::new())),
            Err(SpatialError::DuplicateBackend(_))
        ));
    }

    #[test]
    fn failed_init_keeps_previous_and_cleans_up() {
        let manager = BackendManager::new();
        let broken = Arc::new(Broken::default());
        manager.register(broken.clone()).unwrap();

        let err = manager.select("broken").unwrap_err();
        assert!(matches!(err, SpatialError::BackendInitFailed { ref backend, .. } if backend == "broken"));
        assert_eq!(manager.active_id(), "none");
        assert_eq!(broken.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn switching_shuts_down_previous() {
        let manager = BackendManager::new();
        let platform = platform();
        manager.register(platform.clone()).unwrap();

        manager.select("platform").unwrap();
        assert!(platform.is_initialized());
        manager.select("platform").unwrap();
        assert_eq!(manager.active_id(), "platform");

        manager.select("none").unwrap();
        assert!(!platform.is_initialized());
        assert!(manager.active().is_initialized());
    }

    #[test]
    fn fallback_reports_failures() {
        let manager = BackendManager::new();
        manager.register(Arc::new(Broken::default())).unwrap();
        manager.register(platform()).unwrap();

        let outcome = manager.select_first_available(["missing", "broken", "platform"]);
        assert_eq!(outcome.active, "platform");
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].kind(), "backend_unavailable");
        assert_eq!(outcome.failures[1].kind(), "backend_init_failed");

        let manager = BackendManager::new();
        let outcome = manager.select_first_available(["openal"]);
        assert!(outcome.fell_back_to_null());
    }

    #[test]
    fn doppler_requires_capable_backend() {
        let manager = BackendManager::new();
        let profile = AudioProfile::new("p");
        let request = SpatialRequest::new(&profile, Vec3::Z, ListenerPose::default())
            .with_motion(Motion::new(Vec3::ZERO, Vec3::ZERO, 0.1));

        let err = manager.process(&request).unwrap_err();
        assert_eq!(err.kind(), "unsupported_operation");

        manager.register(platform()).unwrap();
        manager.select("platform").unwrap();
        let result = manager.process(&request).unwrap();
        assert!(result.doppler_shift.is_some());
    }

    #[test]
    fn drop_shuts_everything_down() {
        let platform = platform();
        {
            let manager = BackendManager::new();
            manager.register(platform.clone()).unwrap();
            manager.select("platform").unwrap();
        }
        assert!(!platform.is_initialized());
    }
}
