//! The engine facade.

use std::collections::BTreeMap;
use std::sync::Arc;

use spatia_backend::{NULL_BACKEND_ID, OpenAlBackend, PlatformBackend, SpatialBackend};
use spatia_config::{ConfigError, EngineConfig, ProfileStore};
use spatia_core::{
    AudioProfile, ListenerPose, ProcessedAudioResult, Result, SpatialError, SpatialRequest,
    validate_request,
};
use spatia_registry::{BackendManager, FallbackOutcome};

use crate::api::{
    BackendListing, CapabilitiesReport, ConfigureOutcome, ErrorReport, ProcessSpatialAudio,
};

/// Spatial audio engine: a backend manager plus a profile store.
///
/// The engine is explicitly owned by whatever composes it; there is no global
/// instance. Every method takes `&self` and the engine is `Send + Sync`, so a
/// protocol wrapper can share it behind an `Arc`.
pub struct SpatialEngine {
    manager: BackendManager,
    profiles: Arc<dyn ProfileStore>,
}

impl SpatialEngine {
    /// Engine with only the null backend.
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self::with_manager(BackendManager::new(), profiles)
    }

    /// Engine over an existing manager.
    pub fn with_manager(manager: BackendManager, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { manager, profiles }
    }

    /// Engine with the built-in backends configured by `config`.
    ///
    /// Registers the platform and OpenAL backends (unless disabled), then
    /// activates the first of `preferred_backends` that initializes. Backend
    /// failures are logged and fall back to the null backend; only an
    /// unreadable profile catalog is an error.
    pub fn from_config(config: &EngineConfig) -> std::result::Result<Self, ConfigError> {
        let profiles = Arc::new(config.profile_store()?);
        let backends: [Arc<dyn SpatialBackend>; 2] = [
            Arc::new(PlatformBackend::new()),
            Arc::new(OpenAlBackend::new()),
        ];
        Ok(Self::assemble(config, profiles, backends))
    }

    /// Engine over the given backends, configured and selected per `config`.
    pub fn assemble(
        config: &EngineConfig,
        profiles: Arc<dyn ProfileStore>,
        backends: impl IntoIterator<Item = Arc<dyn SpatialBackend>>,
    ) -> Self {
        let manager = BackendManager::with_null_config(config.backend_config(NULL_BACKEND_ID));
        for backend in backends {
            let id = backend.id().to_owned();
            if !config.is_enabled(&id) {
                tracing::debug!(backend = %id, "backend disabled by configuration");
                continue;
            }
            if let Err(e) = manager.register_with_config(backend, config.backend_config(&id)) {
                tracing::warn!(backend = %id, error = %e, "backend not registered");
            }
        }
        let engine = Self::with_manager(manager, profiles);
        let outcome = engine.select_preferred(config.preferred_backends.as_slice());
        tracing::info!(
            active = %outcome.active,
            fallback = outcome.fell_back_to_null(),
            "spatial engine ready"
        );
        engine
    }

    /// Activate the first backend of `candidates` that initializes.
    pub fn select_preferred<S: AsRef<str>>(&self, candidates: &[S]) -> FallbackOutcome {
        self.manager.select_first_available(candidates)
    }

    /// Backend manager.
    pub fn manager(&self) -> &BackendManager {
        &self.manager
    }

    /// Profile store.
    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    /// Identifier of the active backend.
    pub fn active_backend(&self) -> String {
        self.manager.active_id()
    }

    /// Every registered backend in registration order.
    pub fn list_backends(&self) -> Vec<BackendListing> {
        self.manager
            .list()
            .into_iter()
            .map(BackendListing::from)
            .collect()
    }

    /// Capabilities of `backend`, or of the active backend when `None`.
    pub fn get_capabilities(&self, backend: Option<&str>) -> Result<CapabilitiesReport> {
        let id = backend.map_or_else(|| self.manager.active_id(), str::to_owned);
        let capabilities = self.manager.capabilities_of(&id)?;
        Ok(CapabilitiesReport {
            backend: id,
            capabilities,
        })
    }

    /// Runtime details of `backend` (device, format), or of the active one.
    pub fn runtime_info(&self, backend: Option<&str>) -> Result<BTreeMap<String, String>> {
        let id = backend.map_or_else(|| self.manager.active_id(), str::to_owned);
        self.manager.runtime_info_of(&id)
    }

    /// Switch the active backend.
    ///
    /// Never fails outright: on error the previous backend stays active and
    /// the outcome carries the reason.
    pub fn configure_backend(&self, id: &str) -> ConfigureOutcome {
        match self.manager.select(id) {
            Ok(()) => ConfigureOutcome {
                success: true,
                active_backend: self.manager.active_id(),
                error: None,
            },
            Err(e) => ConfigureOutcome {
                success: false,
                active_backend: self.manager.active_id(),
                error: Some(ErrorReport::from(&e)),
            },
        }
    }

    /// Compute spatial parameters for one sound.
    ///
    /// The operator profile and optional map zone are resolved and the poses
    /// validated before any backend is involved. A map zone contributes its
    /// occlusion factor.
    pub fn process_spatial_audio(
        &self,
        input: &ProcessSpatialAudio,
    ) -> Result<ProcessedAudioResult> {
        let profile = self.operator_profile(&input.profile_id)?;
        let occlusion = input
            .map
            .as_ref()
            .map(|map| self.map_profile(&map.id, map.zone.as_deref()))
            .transpose()?
            .map(|zone| zone.occlusion_factor);

        let listener = ListenerPose::new(input.listener_position, input.listener_orientation);
        let mut request = SpatialRequest::new(&profile, input.source_position, listener);
        request.occlusion = occlusion;
        request.motion = input.motion;
        validate_request(&request)?;

        self.manager.process(&request)
    }

    /// Operator profile by id.
    pub fn operator_profile(&self, id: &str) -> Result<Arc<AudioProfile>> {
        self.profiles
            .lookup_operator_profile(id)
            .ok_or_else(|| SpatialError::UnknownProfile(id.to_owned()))
    }

    /// Map profile by id and optional zone.
    pub fn map_profile(&self, id: &str, zone: Option<&str>) -> Result<Arc<AudioProfile>> {
        self.profiles.lookup_map_profile(id, zone).ok_or_else(|| {
            SpatialError::UnknownProfile(match zone {
                Some(zone) => format!("{id}/{zone}"),
                None => id.to_owned(),
            })
        })
    }

    /// Known operator ids.
    pub fn operator_ids(&self) -> Vec<String> {
        self.profiles.operator_ids()
    }

    /// Known map ids.
    pub fn map_ids(&self) -> Vec<String> {
        self.profiles.map_ids()
    }
}

impl std::fmt::Debug for SpatialEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialEngine")
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatia_backend::VirtualEndpoint;
    use spatia_config::CatalogStore;
    use spatia_core::{Motion, Vec3};

    fn engine() -> SpatialEngine {
        let store = Arc::new(CatalogStore::factory().unwrap());
        let platform: Arc<dyn SpatialBackend> = Arc::new(PlatformBackend::with_endpoint(
            Arc::new(VirtualEndpoint::stereo()),
        ));
        SpatialEngine::assemble(&EngineConfig::default(), store, [platform])
    }

    #[test]
    fn assemble_selects_first_working_preference() {
        let engine = engine();
        assert_eq!(engine.active_backend(), "platform");
        let ids: Vec<_> = engine.list_backends().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, ["none", "platform"]);
    }

    #[test]
    fn disabled_backend_is_not_registered() {
        let config = EngineConfig::from_toml("[backends.platform]\nenabled = false\n").unwrap();
        let platform: Arc<dyn SpatialBackend> = Arc::new(PlatformBackend::with_endpoint(
            Arc::new(VirtualEndpoint::stereo()),
        ));
        let engine = SpatialEngine::assemble(
            &config,
            Arc::new(CatalogStore::factory().unwrap()),
            [platform],
        );
        assert_eq!(engine.active_backend(), "none");
        assert_eq!(engine.list_backends().len(), 1);
    }

    #[test]
    fn unknown_operator() {
        let request = ProcessSpatialAudio::new("Nobody", Vec3::Z, Vec3::ZERO);
        assert_eq!(
            engine().process_spatial_audio(&request),
            Err(SpatialError::UnknownProfile("Nobody".into()))
        );
    }

    #[test]
    fn unknown_zone_names_map_and_zone() {
        let request =
            ProcessSpatialAudio::new("Ash", Vec3::Z, Vec3::ZERO).on_map("Bank", Some("roof"));
        assert_eq!(
            engine().process_spatial_audio(&request),
            Err(SpatialError::UnknownProfile("Bank/roof".into()))
        );
    }

    #[test]
    fn invalid_pose_is_rejected_before_capability_check() {
        let engine = engine();
        engine.configure_backend("none");
        let request = ProcessSpatialAudio::new("Ash", Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO)
            .with_motion(Motion::new(Vec3::ZERO, Vec3::ZERO, 0.1));
        assert!(matches!(
            engine.process_spatial_audio(&request),
            Err(SpatialError::InvalidPose(_))
        ));
    }

    #[test]
    fn unusable_speed_of_sound_does_not_break_doppler() {
        assert!(matches!(
            EngineConfig::from_toml("[processor]\nspeed_of_sound = -343.0\n"),
            Err(ConfigError::InvalidSetting { field: "speed_of_sound", .. })
        ));

        // Settings built in code skip file validation.
        let mut config = EngineConfig::default();
        config.processor.speed_of_sound = -343.0;
        let platform: Arc<dyn SpatialBackend> = Arc::new(PlatformBackend::with_endpoint(
            Arc::new(VirtualEndpoint::stereo()),
        ));
        let engine = SpatialEngine::assemble(
            &config,
            Arc::new(CatalogStore::factory().unwrap()),
            [platform],
        );
        let request = ProcessSpatialAudio::new("Ash", Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
            .with_motion(Motion::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 0.5));
        let result = engine.process_spatial_audio(&request).unwrap();
        assert_eq!(result.doppler_shift, Some(1.0));
    }

    #[test]
    fn extreme_poses_are_invalid() {
        let engine = engine();
        let far = ProcessSpatialAudio::new("Ash", Vec3::new(3e19, 0.0, 0.0), Vec3::ZERO);
        assert!(matches!(
            engine.process_spatial_audio(&far),
            Err(SpatialError::InvalidPose(_))
        ));

        let source = Vec3::new(0.0, 0.0, 10.0);
        let instant = ProcessSpatialAudio::new("Ash", source, Vec3::ZERO)
            .with_motion(Motion::new(source, Vec3::ZERO, 1e-45));
        assert!(matches!(
            engine.process_spatial_audio(&instant),
            Err(SpatialError::InvalidPose(_))
        ));
    }

    #[test]
    fn zone_occlusion_lowers_volume() {
        let engine = engine();
        let open = ProcessSpatialAudio::new("Thermite", Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let behind_wall = open.clone().on_map("Bank", Some("vault"));

        let open = engine.process_spatial_audio(&open).unwrap();
        let walled = engine.process_spatial_audio(&behind_wall).unwrap();
        // Bank interior occlusion 0.6 with a 10 dB penalty
        assert!((open.attenuated_volume_db - walled.attenuated_volume_db - 6.0).abs() < 1e-4);
    }
}
