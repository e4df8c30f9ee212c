//! Platform-native object-based spatial backend.
//!
//! Each request becomes one dynamic object: listener-relative azimuth and
//! elevation on the unit sphere, a linear object volume, a directivity
//! pattern, and room effects (reverb, occlusion, frequency bands). The object
//! is rendered through the opened [`EndpointSession`] and the rendered channel
//! balance is compared against the generic pan.
//!
//! Room occlusion is re-applied with a steeper 12 dB penalty, matching how OS
//! spatial renderers muffle sounds behind walls.

#[cfg(feature = "cpal")]
mod cpal_endpoint;
mod endpoint;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use spatia_core::{
    ProcessOptions, ProcessedAudioResult, Result, SpatialProcessor, SpatialRequest, Vec3,
    azimuth_elevation, db_to_linear,
};

#[cfg(feature = "cpal")]
pub use cpal_endpoint::CpalEndpoint;
pub use endpoint::{
    ChannelGains, DEFAULT_MAX_OBJECTS, DEFAULT_SAMPLE_RATE, Directivity, EndpointFormat,
    EndpointSession, SpatialEndpoint, SpatialObject, UnavailableEndpoint, VIRTUAL_DEVICE_NAME,
    VirtualEndpoint, pan_object,
};

use crate::backend::{
    BackendCapabilities, BackendConfig, BackendDescriptor, BackendKind, SpatialBackend,
    not_initialized,
};

/// Identifier of the platform backend.
pub const PLATFORM_BACKEND_ID: &str = "platform";

/// Occlusion penalty applied by the platform renderer, in dB.
pub const PLATFORM_OCCLUSION_DB: f32 = 12.0;

/// Reverb amounts above this enable the room reverb.
const REVERB_THRESHOLD: f32 = 0.1;

/// Elevations beyond this many degrees leave the ear-level layer.
const ELEVATION_LAYER_DEG: f32 = 30.0;

const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    spatial_positioning: true,
    hrtf: true,
    reverb: true,
    occlusion: true,
    doppler: true,
    elevation: true,
    directional_sources: true,
    distance_attenuation: true,
    real_time_processing: true,
    max_sources: Some(DEFAULT_MAX_OBJECTS),
};

/// Endpoint used when none is supplied: cpal when the `cpal` feature is on.
pub fn default_endpoint() -> Arc<dyn SpatialEndpoint> {
    #[cfg(feature = "cpal")]
    {
        Arc::new(CpalEndpoint::new())
    }
    #[cfg(not(feature = "cpal"))]
    {
        Arc::new(UnavailableEndpoint)
    }
}

/// Layer an elevation angle is routed to.
pub fn elevation_channel(elevation_deg: f32) -> &'static str {
    if elevation_deg > ELEVATION_LAYER_DEG {
        "height"
    } else if elevation_deg < -ELEVATION_LAYER_DEG {
        "floor"
    } else {
        "ear_level"
    }
}

struct PlatformSession {
    endpoint: Box<dyn EndpointSession>,
    processor: SpatialProcessor,
    voice_limit: Option<u32>,
}

/// Operating-system spatial audio backend.
pub struct PlatformBackend {
    endpoint: Arc<dyn SpatialEndpoint>,
    session: Mutex<Option<PlatformSession>>,
}

impl PlatformBackend {
    /// Adapter over the default endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(default_endpoint())
    }

    /// Adapter over a specific endpoint.
    pub fn with_endpoint(endpoint: Arc<dyn SpatialEndpoint>) -> Self {
        Self {
            endpoint,
            session: Mutex::new(None),
        }
    }
}

impl Default for PlatformBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlatformBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformBackend")
            .field("endpoint", &self.endpoint.name())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl SpatialBackend for PlatformBackend {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor {
            id: PLATFORM_BACKEND_ID.to_owned(),
            name: "Platform Spatial Audio".to_owned(),
            kind: BackendKind::PlatformNative,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            description: "Object-based spatial audio through the OS spatial renderer".to_owned(),
            capabilities: CAPABILITIES,
        }
    }

    fn id(&self) -> &str {
        PLATFORM_BACKEND_ID
    }

    fn initialize(&self, config: &BackendConfig) -> Result<()> {
        let mut session = self.session.lock();
        if session.is_some() {
            return Ok(());
        }
        let endpoint = self
            .endpoint
            .open(config.device.as_deref())
            .map_err(|e| {
                tracing::warn!(
                    backend = PLATFORM_BACKEND_ID,
                    endpoint = self.endpoint.name(),
                    error = %e,
                    "initialization failed"
                );
                e.into_init_failure(PLATFORM_BACKEND_ID)
            })?;

        let format = endpoint.format();
        let voice_limit = config.voice_limit(Some(format.max_dynamic_objects));
        tracing::info!(
            backend = PLATFORM_BACKEND_ID,
            device = endpoint.device_name(),
            layout = %format.layout_label(),
            sample_rate = format.sample_rate,
            voice_limit,
            "backend initialized"
        );
        *session = Some(PlatformSession {
            endpoint,
            processor: SpatialProcessor::new(config.processor),
            voice_limit,
        });
        Ok(())
    }

    fn shutdown(&self) {
        if self.session.lock().take().is_some() {
            tracing::info!(backend = PLATFORM_BACKEND_ID, "backend shut down");
        }
    }

    fn is_initialized(&self) -> bool {
        self.session.lock().is_some()
    }

    fn capabilities(&self) -> BackendCapabilities {
        CAPABILITIES
    }

    fn process(&self, request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult> {
        let mut guard = self.session.lock();
        let session = guard
            .as_mut()
            .ok_or_else(|| not_initialized(PLATFORM_BACKEND_ID))?;

        let mut result = session
            .processor
            .process(request, ProcessOptions::with_doppler())?;
        result.backend = PLATFORM_BACKEND_ID.to_owned();

        let profile = request.profile;
        let settings = *session.processor.settings();
        let basis = request.listener.orientation.normalized().basis();
        let (azimuth, elevation) = azimuth_elevation(&basis, result.direction);
        let position = Vec3::new(
            result.direction.dot(basis.right),
            result.direction.dot(basis.up),
            result.direction.dot(basis.forward),
        );

        let occlusion = request.occlusion.unwrap_or(profile.occlusion_factor);
        let (generic_occlusion_db, platform_occlusion_db) = request
            .occlusion
            .map_or((0.0, 0.0), |o| {
                (o * settings.occlusion_penalty_db, o * PLATFORM_OCCLUSION_DB)
            });
        let object_db = (result.attenuated_volume_db + generic_occlusion_db - platform_occlusion_db)
            .max(settings.min_audible_db);
        let directivity = if profile.directional {
            Directivity::Cardioid
        } else {
            Directivity::Omnidirectional
        };
        let object = SpatialObject {
            position,
            volume: db_to_linear(object_db).clamp(0.0, 1.0),
            directivity,
        };

        let gains = session
            .endpoint
            .render_object(&object)
            .map_err(|e| e.into_process_failure(PLATFORM_BACKEND_ID))?;
        let native_pan = gains.pan();
        let format = session.endpoint.format();

        result.set_param("azimuth_deg", azimuth);
        result.set_param("elevation_deg", elevation);
        result.set_param("object_position", object.position);
        result.set_param("object_volume", object.volume);
        result.set_param("directivity", directivity.as_str());
        result.set_param("reverb_enabled", profile.reverb_amount > REVERB_THRESHOLD);
        result.set_param("reverb_level", profile.reverb_amount);
        result.set_param("occlusion_level", occlusion);
        result.set_param("platform_occlusion_db", platform_occlusion_db);
        result.set_param("low_pass_hz", profile.frequency_range.high_hz);
        result.set_param("high_pass_hz", profile.frequency_range.low_hz);
        result.set_param("elevation_channel", elevation_channel(elevation));
        result.set_param("left_gain", gains.left);
        result.set_param("right_gain", gains.right);
        result.set_param("height_gain", gains.height);
        result.set_param("native_pan", native_pan);
        result.set_param("pan_divergence", native_pan - result.pan);
        result.set_param("spatial_format", format.layout_label());
        result.set_param("processing_applied", true);

        tracing::debug!(
            backend = PLATFORM_BACKEND_ID,
            profile = %profile.id,
            azimuth,
            elevation,
            native_pan,
            "request processed"
        );
        Ok(result)
    }

    fn runtime_info(&self) -> BTreeMap<String, String> {
        let guard = self.session.lock();
        let Some(session) = guard.as_ref() else {
            return BTreeMap::new();
        };
        let format = session.endpoint.format();
        let mut info = BTreeMap::new();
        info.insert("endpoint".to_owned(), self.endpoint.name().to_owned());
        info.insert(
            "device".to_owned(),
            session.endpoint.device_name().to_owned(),
        );
        info.insert("spatial_format".to_owned(), format.layout_label());
        info.insert("sample_rate".to_owned(), format.sample_rate.to_string());
        info.insert("channels".to_owned(), format.channels.to_string());
        if let Some(limit) = session.voice_limit {
            info.insert("max_sources".to_owned(), limit.to_string());
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatia_core::{AudioProfile, ListenerPose, Orientation, SpatialError};

    fn backend(endpoint: VirtualEndpoint) -> PlatformBackend {
        let backend = PlatformBackend::with_endpoint(Arc::new(endpoint));
        backend.initialize(&BackendConfig::default()).unwrap();
        backend
    }

    #[test]
    fn unavailable_platform_fails_init() {
        let backend = PlatformBackend::with_endpoint(Arc::new(UnavailableEndpoint));
        let err = backend.initialize(&BackendConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "backend_init_failed");
        assert!(!backend.is_initialized());
        backend.shutdown();
    }

    #[test]
    fn source_to_the_right() {
        let backend = backend(VirtualEndpoint::stereo());
        let profile = AudioProfile::new("Ash");
        let request = SpatialRequest::new(&profile, Vec3::new(5.0, 0.0, 0.0), ListenerPose::default());
        let result = backend.process(&request).unwrap();

        assert_eq!(result.backend, "platform");
        assert!((result.number("azimuth_deg").unwrap() - 90.0).abs() < 1e-3);
        assert_eq!(
            result.param("elevation_channel").and_then(|v| v.as_text()),
            Some("ear_level")
        );
        assert!((result.number("native_pan").unwrap() - 1.0).abs() < 1e-4);
        assert!(result.number("pan_divergence").unwrap().abs() < 1e-4);
        assert_eq!(
            result.param("spatial_format").and_then(|v| v.as_text()),
            Some("Stereo")
        );
    }

    #[test]
    fn overhead_source_uses_height_layer() {
        let backend = backend(VirtualEndpoint::surround_7_1_4());
        let profile = AudioProfile::new("Buck");
        let listener = ListenerPose::new(Vec3::ZERO, Orientation::default());
        let request = SpatialRequest::new(&profile, Vec3::new(0.0, 10.0, 1.0), listener);
        let result = backend.process(&request).unwrap();

        assert!(result.number("elevation_deg").unwrap() > 80.0);
        assert_eq!(
            result.param("elevation_channel").and_then(|v| v.as_text()),
            Some("height")
        );
        assert!(result.number("height_gain").unwrap() > result.number("left_gain").unwrap());
    }

    #[test]
    fn occlusion_uses_platform_penalty() {
        let backend = backend(VirtualEndpoint::stereo());
        let profile = AudioProfile::new("p").with_volume_db(0.0);
        let request = SpatialRequest::new(&profile, Vec3::Z, ListenerPose::default())
            .with_occlusion(0.5);
        let result = backend.process(&request).unwrap();

        // generic: -5 dB; platform: -6 dB
        assert!((result.attenuated_volume_db + 5.0).abs() < 1e-4);
        assert_eq!(result.number("platform_occlusion_db"), Some(6.0));
        let volume = result.number("object_volume").unwrap();
        assert!((volume - db_to_linear(-6.0)).abs() < 1e-4);
        assert_eq!(result.number("occlusion_level"), Some(0.5));
    }

    #[test]
    fn room_effects_follow_profile() {
        let backend = backend(VirtualEndpoint::stereo());
        let dry = AudioProfile::new("dry").with_reverb(0.05);
        let wet = AudioProfile::new("wet")
            .with_reverb(0.7)
            .with_directional(false)
            .with_frequency_range(40.0, 900.0);

        let r = backend
            .process(&SpatialRequest::new(&dry, Vec3::Z, ListenerPose::default()))
            .unwrap();
        assert_eq!(r.param("reverb_enabled").and_then(|v| v.as_bool()), Some(false));
        assert_eq!(r.param("directivity").and_then(|v| v.as_text()), Some("Cardioid"));

        let r = backend
            .process(&SpatialRequest::new(&wet, Vec3::Z, ListenerPose::default()))
            .unwrap();
        assert_eq!(r.param("reverb_enabled").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(
            r.param("directivity").and_then(|v| v.as_text()),
            Some("Omnidirectional")
        );
        assert_eq!(r.number("low_pass_hz"), Some(900.0));
        assert_eq!(r.number("high_pass_hz"), Some(40.0));
    }

    #[test]
    fn shutdown_closes_session() {
        let endpoint = VirtualEndpoint::stereo();
        let backend = PlatformBackend::with_endpoint(Arc::new(endpoint.clone()));
        let config = BackendConfig {
            max_sources: Some(16),
            ..BackendConfig::default()
        };
        backend.initialize(&config).unwrap();
        assert_eq!(endpoint.open_sessions(), 1);
        assert_eq!(
            backend.runtime_info().get("max_sources").map(String::as_str),
            Some("16")
        );

        backend.shutdown();
        assert_eq!(endpoint.open_sessions(), 0);

        let profile = AudioProfile::new("p");
        let request = SpatialRequest::new(&profile, Vec3::Z, ListenerPose::default());
        assert!(matches!(
            backend.process(&request),
            Err(SpatialError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn elevation_layers() {
        assert_eq!(elevation_channel(45.0), "height");
        assert_eq!(elevation_channel(0.0), "ear_level");
        assert_eq!(elevation_channel(-60.0), "floor");
    }
}
