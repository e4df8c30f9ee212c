//! Driver seam for OpenAL-style runtimes.
//!
//! [`AlDriver`] mirrors the slice of the OpenAL 1.1 API the adapter needs:
//! device and context lifetime, the listener, one positional source, and a
//! query for the gain the runtime will actually render. Handles are plain
//! integers, like the `ALuint` names the real API hands out.

use std::collections::BTreeMap;

use spatia_core::Vec3;

use crate::error::DriverError;

/// Handle to an open output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub u32);

/// Handle to a rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(pub u32);

/// Handle to a positional source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub u32);

/// Distance attenuation model (`alDistanceModel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceModel {
    /// No distance attenuation.
    None,
    /// `AL_INVERSE_DISTANCE`.
    InverseDistance,
    /// `AL_INVERSE_DISTANCE_CLAMPED`, the OpenAL default.
    #[default]
    InverseDistanceClamped,
}

/// Listener state (`alListener*`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlListener {
    /// `AL_POSITION`.
    pub position: Vec3,
    /// `AL_VELOCITY`.
    pub velocity: Vec3,
    /// "at" half of `AL_ORIENTATION`.
    pub at: Vec3,
    /// "up" half of `AL_ORIENTATION`.
    pub up: Vec3,
    /// `AL_GAIN`.
    pub gain: f32,
}

impl Default for AlListener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            gain: 1.0,
        }
    }
}

/// Source state (`alSource*`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlSource {
    /// `AL_POSITION`.
    pub position: Vec3,
    /// `AL_VELOCITY`.
    pub velocity: Vec3,
    /// `AL_DIRECTION`; zero makes the source omnidirectional.
    pub direction: Vec3,
    /// `AL_GAIN`, 0..1.
    pub gain: f32,
    /// `AL_PITCH`.
    pub pitch: f32,
    /// `AL_ROLLOFF_FACTOR`.
    pub rolloff_factor: f32,
    /// `AL_REFERENCE_DISTANCE`.
    pub reference_distance: f32,
    /// `AL_MAX_DISTANCE`.
    pub max_distance: f32,
    /// `AL_CONE_INNER_ANGLE` in degrees.
    pub cone_inner_angle: f32,
    /// `AL_CONE_OUTER_ANGLE` in degrees.
    pub cone_outer_angle: f32,
    /// `AL_CONE_OUTER_GAIN`.
    pub cone_outer_gain: f32,
}

impl Default for AlSource {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            direction: Vec3::ZERO,
            gain: 1.0,
            pitch: 1.0,
            rolloff_factor: 1.0,
            reference_distance: 1.0,
            max_distance: f32::MAX,
            cone_inner_angle: 360.0,
            cone_outer_angle: 360.0,
            cone_outer_gain: 0.0,
        }
    }
}

/// OpenAL-style runtime.
///
/// Implementations are shared between the adapter and its resource guards, so
/// every method takes `&self`. Release methods never fail; releasing a handle
/// that is already gone is a no-op.
pub trait AlDriver: Send + Sync {
    /// Runtime name for logs.
    fn name(&self) -> &str;

    /// Load or locate the runtime. Called before any device is opened.
    fn probe(&self) -> Result<(), DriverError>;

    /// Open the default device, or the first device whose name contains `name`.
    fn open_device(&self, name: Option<&str>) -> Result<DeviceId, DriverError>;

    /// Close a device.
    fn close_device(&self, device: DeviceId);

    /// Create a context on an open device.
    fn create_context(&self, device: DeviceId) -> Result<ContextId, DriverError>;

    /// Destroy a context and every source it owns.
    fn destroy_context(&self, context: ContextId);

    /// Select the distance model for a context.
    fn set_distance_model(&self, context: ContextId, model: DistanceModel)
    -> Result<(), DriverError>;

    /// Update the listener of a context.
    fn set_listener(&self, context: ContextId, listener: &AlListener) -> Result<(), DriverError>;

    /// Allocate a source.
    fn gen_source(&self, context: ContextId) -> Result<SourceId, DriverError>;

    /// Release a source.
    fn delete_source(&self, context: ContextId, source: SourceId);

    /// Update every property of a source.
    fn set_source(
        &self,
        context: ContextId,
        source: SourceId,
        params: &AlSource,
    ) -> Result<(), DriverError>;

    /// Linear gain the runtime will render for a source, after distance, cone,
    /// and listener gain, clamped to 0..1.
    fn effective_gain(&self, context: ContextId, source: SourceId) -> Result<f32, DriverError>;

    /// `AL_VENDOR`, `AL_RENDERER`, `AL_VERSION`, and device strings.
    fn info(&self, context: ContextId) -> BTreeMap<String, String>;
}

/// Runtime for builds that cannot reach an OpenAL library.
///
/// Every acquisition fails with [`DriverError::RuntimeMissing`], so the
/// adapter registers but never initializes.
#[derive(Debug, Clone)]
pub struct UnavailableAlDriver {
    reason: String,
}

impl UnavailableAlDriver {
    /// Runtime that reports `reason` when probed.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn missing(&self) -> DriverError {
        DriverError::RuntimeMissing(self.reason.clone())
    }
}

impl AlDriver for UnavailableAlDriver {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn probe(&self) -> Result<(), DriverError> {
        Err(self.missing())
    }

    fn open_device(&self, _name: Option<&str>) -> Result<DeviceId, DriverError> {
        Err(self.missing())
    }

    fn close_device(&self, _device: DeviceId) {}

    fn create_context(&self, _device: DeviceId) -> Result<ContextId, DriverError> {
        Err(self.missing())
    }

    fn destroy_context(&self, _context: ContextId) {}

    fn set_distance_model(
        &self,
        _context: ContextId,
        _model: DistanceModel,
    ) -> Result<(), DriverError> {
        Err(self.missing())
    }

    fn set_listener(&self, _context: ContextId, _listener: &AlListener) -> Result<(), DriverError> {
        Err(self.missing())
    }

    fn gen_source(&self, _context: ContextId) -> Result<SourceId, DriverError> {
        Err(self.missing())
    }

    fn delete_source(&self, _context: ContextId, _source: SourceId) {}

    fn set_source(
        &self,
        _context: ContextId,
        _source: SourceId,
        _params: &AlSource,
    ) -> Result<(), DriverError> {
        Err(self.missing())
    }

    fn effective_gain(&self, _context: ContextId, _source: SourceId) -> Result<f32, DriverError> {
        Err(self.missing())
    }

    fn info(&self, _context: ContextId) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
