//! OpenAL positional audio backend.
//!
//! The adapter maps each request onto one OpenAL source: position, velocity,
//! pitch (Doppler), rolloff, and a sound cone for directional profiles. After
//! updating the source it reads back the gain the runtime will render and
//! reports how far that lands from the generic log-distance baseline.
//!
//! `SystemAlDriver` (feature `openal`) loads the host's OpenAL library at run
//! time. [`ReferenceAlDriver`] renders the same equations in memory for tests.
//!
//! Native resources are acquired in order (device, context, source) through
//! RAII guards, so a failure part-way releases whatever was already acquired.

mod driver;
mod model;
mod reference;
#[cfg(feature = "openal")]
mod system;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use spatia_core::{
    ProcessOptions, ProcessedAudioResult, Result, SpatialProcessor, SpatialRequest, Vec3,
    db_to_linear, linear_to_db,
};

pub use driver::{
    AlDriver, AlListener, AlSource, ContextId, DeviceId, DistanceModel, SourceId,
    UnavailableAlDriver,
};
pub use model::{cone_gain, distance_gain, rendered_gain};
pub use reference::{REFERENCE_DEVICE_NAME, ReferenceAlDriver};
#[cfg(feature = "openal")]
pub use system::{SystemAlDriver, library_candidates};

use crate::backend::{
    BackendCapabilities, BackendConfig, BackendDescriptor, BackendKind, SpatialBackend,
    not_initialized,
};
use crate::error::DriverError;

/// Identifier of the OpenAL backend.
pub const OPENAL_BACKEND_ID: &str = "openal";

/// Native voice limit.
pub const OPENAL_MAX_SOURCES: u32 = 256;

/// `AL_REFERENCE_DISTANCE` used for every source.
pub const REFERENCE_DISTANCE: f32 = 1.0;

/// `AL_MAX_DISTANCE` used for every source.
pub const MAX_DISTANCE: f32 = 100.0;

const DIRECTIONAL_CONE: (f32, f32, f32) = (60.0, 120.0, 0.5);
const OMNI_CONE: (f32, f32, f32) = (360.0, 360.0, 1.0);

const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    spatial_positioning: true,
    hrtf: true,
    reverb: true,
    occlusion: true,
    doppler: true,
    elevation: false,
    directional_sources: true,
    distance_attenuation: true,
    real_time_processing: true,
    max_sources: Some(OPENAL_MAX_SOURCES),
};

struct DeviceGuard {
    driver: Arc<dyn AlDriver>,
    id: DeviceId,
}

impl DeviceGuard {
    fn open(driver: &Arc<dyn AlDriver>, name: Option<&str>) -> std::result::Result<Self, DriverError> {
        let id = driver.open_device(name)?;
        Ok(Self {
            driver: Arc::clone(driver),
            id,
        })
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        self.driver.close_device(self.id);
    }
}

struct ContextGuard {
    driver: Arc<dyn AlDriver>,
    id: ContextId,
}

impl ContextGuard {
    fn create(driver: &Arc<dyn AlDriver>, device: &DeviceGuard) -> std::result::Result<Self, DriverError> {
        let id = driver.create_context(device.id)?;
        Ok(Self {
            driver: Arc::clone(driver),
            id,
        })
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.driver.destroy_context(self.id);
    }
}

struct SourceGuard {
    driver: Arc<dyn AlDriver>,
    context: ContextId,
    id: SourceId,
}

impl SourceGuard {
    fn generate(driver: &Arc<dyn AlDriver>, context: &ContextGuard) -> std::result::Result<Self, DriverError> {
        let id = driver.gen_source(context.id)?;
        Ok(Self {
            driver: Arc::clone(driver),
            context: context.id,
            id,
        })
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.driver.delete_source(self.context, self.id);
    }
}

/// Live native state. Fields drop in declaration order: source, context, device.
struct AlSession {
    source: SourceGuard,
    context: ContextGuard,
    _device: DeviceGuard,
    processor: SpatialProcessor,
    voice_limit: Option<u32>,
    info: BTreeMap<String, String>,
}

/// OpenAL-style spatial backend.
pub struct OpenAlBackend {
    driver: Arc<dyn AlDriver>,
    session: Mutex<Option<AlSession>>,
}

/// Driver for the host's OpenAL runtime.
///
/// With the `openal` feature this loads the system library on first use;
/// without it the runtime is reported missing.
pub fn default_driver() -> Arc<dyn AlDriver> {
    #[cfg(feature = "openal")]
    {
        Arc::new(SystemAlDriver::new())
    }
    #[cfg(not(feature = "openal"))]
    {
        Arc::new(UnavailableAlDriver::new(
            "built without the `openal` feature",
        ))
    }
}

impl OpenAlBackend {
    /// Adapter over the host's OpenAL runtime (see [`default_driver`]).
    pub fn new() -> Self {
        Self::with_driver(default_driver())
    }

    /// Adapter over a specific driver.
    pub fn with_driver(driver: Arc<dyn AlDriver>) -> Self {
        Self {
            driver,
            session: Mutex::new(None),
        }
    }

    fn acquire(&self, config: &BackendConfig) -> std::result::Result<AlSession, DriverError> {
        self.driver.probe()?;
        let device = DeviceGuard::open(&self.driver, config.device.as_deref())?;
        let context = ContextGuard::create(&self.driver, &device)?;
        self.driver
            .set_distance_model(context.id, DistanceModel::InverseDistanceClamped)?;
        let source = SourceGuard::generate(&self.driver, &context)?;
        let info = self.driver.info(context.id);
        Ok(AlSession {
            source,
            context,
            _device: device,
            processor: SpatialProcessor::new(config.processor),
            voice_limit: config.voice_limit(CAPABILITIES.max_sources),
            info,
        })
    }
}

impl Default for OpenAlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpenAlBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAlBackend")
            .field("driver", &self.driver.name())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Source velocity over the motion sample, or zero.
fn source_velocity(request: &SpatialRequest<'_>) -> Vec3 {
    request.motion.map_or(Vec3::ZERO, |m| {
        (request.source - m.previous_source) * (1.0 / m.dt_secs)
    })
}

/// Listener velocity over the motion sample, or zero.
fn listener_velocity(request: &SpatialRequest<'_>) -> Vec3 {
    request.motion.map_or(Vec3::ZERO, |m| {
        (request.listener.position - m.previous_listener) * (1.0 / m.dt_secs)
    })
}

impl SpatialBackend for OpenAlBackend {
    fn descriptor(&self) -> BackendDescriptor {
        BackendDescriptor {
            id: OPENAL_BACKEND_ID.to_owned(),
            name: "OpenAL Audio Backend".to_owned(),
            kind: BackendKind::OpenAl,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            description: "Cross-platform 3D positional audio using OpenAL".to_owned(),
            capabilities: CAPABILITIES,
        }
    }

    fn id(&self) -> &str {
        OPENAL_BACKEND_ID
    }

    fn initialize(&self, config: &BackendConfig) -> Result<()> {
        let mut session = self.session.lock();
        if session.is_some() {
            return Ok(());
        }
        match self.acquire(config) {
            Ok(acquired) => {
                tracing::info!(
                    backend = OPENAL_BACKEND_ID,
                    driver = self.driver.name(),
                    renderer = acquired.info.get("renderer").map(String::as_str),
                    voice_limit = acquired.voice_limit,
                    "backend initialized"
                );
                *session = Some(acquired);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(backend = OPENAL_BACKEND_ID, error = %e, "initialization failed");
                Err(e.into_init_failure(OPENAL_BACKEND_ID))
            }
        }
    }

    fn shutdown(&self) {
        if self.session.lock().take().is_some() {
            tracing::info!(backend = OPENAL_BACKEND_ID, "backend shut down");
        }
    }

    fn is_initialized(&self) -> bool {
        self.session.lock().is_some()
    }

    fn capabilities(&self) -> BackendCapabilities {
        CAPABILITIES
    }

    fn process(&self, request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult> {
        let guard = self.session.lock();
        let session = guard
            .as_ref()
            .ok_or_else(|| not_initialized(OPENAL_BACKEND_ID))?;

        let mut result = session
            .processor
            .process(request, ProcessOptions::with_doppler())?;
        result.backend = OPENAL_BACKEND_ID.to_owned();

        let profile = request.profile;
        let settings = *session.processor.settings();
        // Without a zone the profile's own occlusion still feeds the native gain.
        let occlusion_db = request.occlusion.unwrap_or(profile.occlusion_factor)
            * settings.occlusion_penalty_db;
        let (inner, outer, outer_gain) = if profile.directional {
            DIRECTIONAL_CONE
        } else {
            OMNI_CONE
        };

        let basis = request.listener.orientation.basis();
        let listener = AlListener {
            position: request.listener.position,
            velocity: listener_velocity(request),
            at: basis.forward,
            up: basis.up,
            gain: 1.0,
        };
        let source = AlSource {
            position: request.source,
            velocity: source_velocity(request),
            // Directional sources face the listener.
            direction: if profile.directional {
                -result.direction
            } else {
                Vec3::ZERO
            },
            gain: db_to_linear(profile.base_volume_db - occlusion_db).clamp(0.0, 1.0),
            pitch: result.doppler_shift.unwrap_or(1.0),
            rolloff_factor: profile.falloff_exponent,
            reference_distance: REFERENCE_DISTANCE,
            max_distance: MAX_DISTANCE,
            cone_inner_angle: inner,
            cone_outer_angle: outer,
            cone_outer_gain: outer_gain,
        };

        let context = session.context.id;
        let native_gain = self
            .driver
            .set_listener(context, &listener)
            .and_then(|()| self.driver.set_source(context, session.source.id, &source))
            .and_then(|()| self.driver.effective_gain(context, session.source.id))
            .map_err(|e| e.into_process_failure(OPENAL_BACKEND_ID))?;
        let native_gain_db = linear_to_db(native_gain).max(settings.min_audible_db);

        result.set_param("AL_POSITION", source.position);
        result.set_param("AL_VELOCITY", source.velocity);
        result.set_param("AL_DIRECTION", source.direction);
        result.set_param("AL_GAIN", source.gain);
        result.set_param("AL_PITCH", source.pitch);
        result.set_param("AL_ROLLOFF_FACTOR", source.rolloff_factor);
        result.set_param("AL_REFERENCE_DISTANCE", source.reference_distance);
        result.set_param("AL_MAX_DISTANCE", source.max_distance);
        result.set_param("AL_CONE_INNER_ANGLE", source.cone_inner_angle);
        result.set_param("AL_CONE_OUTER_ANGLE", source.cone_outer_angle);
        result.set_param("AL_CONE_OUTER_GAIN", source.cone_outer_gain);
        result.set_param("efx_reverb_send", profile.reverb_amount);
        result.set_param("efx_occlusion_gain", db_to_linear(-occlusion_db));
        result.set_param("native_gain", native_gain);
        result.set_param("native_gain_db", native_gain_db);
        result.set_param(
            "gain_divergence_db",
            native_gain_db - result.attenuated_volume_db,
        );
        result.set_param("processing_applied", true);

        tracing::debug!(
            backend = OPENAL_BACKEND_ID,
            profile = %profile.id,
            native_gain_db,
            generic_db = result.attenuated_volume_db,
            "request processed"
        );
        Ok(result)
    }

    fn runtime_info(&self) -> BTreeMap<String, String> {
        let guard = self.session.lock();
        let Some(session) = guard.as_ref() else {
            return BTreeMap::new();
        };
        let mut info = session.info.clone();
        info.insert("driver".to_owned(), self.driver.name().to_owned());
        if let Some(limit) = session.voice_limit {
            info.insert("max_sources".to_owned(), limit.to_string());
        }
        info
    }
}
