//! Spatial math processor.
//!
//! Pure functions that turn a source/listener pose pair and an
//! [`AudioProfile`](crate::AudioProfile) into spatial parameters, plus the
//! [`SpatialProcessor`] that runs them in order for a [`SpatialRequest`].
//!
//! # Formulas
//!
//! | Parameter | Formula |
//! |-----------|---------|
//! | distance | `‖source − listener‖` |
//! | direction | `(source − listener) / distance`, listener forward when degenerate |
//! | relative angle | `acos(clamp(forward · direction, −1, 1))` in degrees |
//! | pan | `clamp(direction · right, −1, 1)`, 0 for omnidirectional sounds |
//! | attenuation | `base_db − falloff × log10(max(distance, 1))`, floored |
//! | occlusion | `volume − occlusion × penalty_db`, floored |
//! | Doppler | `(c + v_listener) / (c + v_source)` with radial velocities |
//!
//! Nothing here holds state, so every function is safe to call from any number
//! of threads at once.

use alloc::collections::BTreeMap;
use alloc::string::String;
use libm::{acosf, atan2f, log10f, sqrtf};

use crate::error::{Result, SpatialError};
use crate::pose::{ListenerBasis, ListenerPose, Motion};
use crate::request::SpatialRequest;
use crate::result::ProcessedAudioResult;
use crate::vector::Vec3;

/// Speed of sound in world units (meters) per second.
pub const SPEED_OF_SOUND: f32 = 343.0;

/// Volume lost by a fully occluded sound, in dB.
pub const DEFAULT_OCCLUSION_PENALTY_DB: f32 = 10.0;

/// Minimum audible level; attenuation never goes below this.
pub const MIN_AUDIBLE_DB: f32 = -96.0;

/// Largest accepted absolute coordinate, in world units.
///
/// Squared distances between points inside this cube stay well within `f32`
/// range.
pub const MAX_COORDINATE: f32 = 1.0e6;

/// Distances below this are treated as coincident source and listener.
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// Radial velocities are clamped to this fraction of the speed of sound.
const MAX_RADIAL_FRACTION: f32 = 0.9;

/// Tunable constants used by the processor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessorSettings {
    /// Speed of sound for Doppler, in units per second.
    pub speed_of_sound: f32,
    /// dB removed for an occlusion factor of 1.0.
    pub occlusion_penalty_db: f32,
    /// Floor for attenuated volume, in dB.
    pub min_audible_db: f32,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            speed_of_sound: SPEED_OF_SOUND,
            occlusion_penalty_db: DEFAULT_OCCLUSION_PENALTY_DB,
            min_audible_db: MIN_AUDIBLE_DB,
        }
    }
}

impl ProcessorSettings {
    /// First field outside its valid range, with its value.
    ///
    /// `speed_of_sound` must be finite and positive, `occlusion_penalty_db`
    /// finite and non-negative, `min_audible_db` finite and at most 0.
    pub fn invalid_field(&self) -> Option<(&'static str, f32)> {
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Some(("speed_of_sound", self.speed_of_sound));
        }
        if !(self.occlusion_penalty_db.is_finite() && self.occlusion_penalty_db >= 0.0) {
            return Some(("occlusion_penalty_db", self.occlusion_penalty_db));
        }
        if !(self.min_audible_db.is_finite() && self.min_audible_db <= 0.0) {
            return Some(("min_audible_db", self.min_audible_db));
        }
        None
    }
}

/// Per-call switches chosen by the backend serving the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessOptions {
    /// Compute a Doppler shift when the request carries motion.
    pub doppler: bool,
}

impl ProcessOptions {
    /// Options with Doppler enabled.
    pub const fn with_doppler() -> Self {
        Self { doppler: true }
    }
}

/// Stateless spatial processor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpatialProcessor {
    settings: ProcessorSettings,
}

impl SpatialProcessor {
    /// Create a processor with the given settings.
    pub const fn new(settings: ProcessorSettings) -> Self {
        Self { settings }
    }

    /// The processor's settings.
    pub const fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Validate the request and compute every generic parameter.
    ///
    /// The returned result has an empty `backend` and no backend-specific
    /// parameters; the calling backend fills those in.
    pub fn process(
        &self,
        request: &SpatialRequest<'_>,
        options: ProcessOptions,
    ) -> Result<ProcessedAudioResult> {
        validate_request(request)?;

        let profile = request.profile;
        let listener = ListenerPose::new(
            request.listener.position,
            request.listener.orientation.normalized(),
        );
        let basis = listener.orientation.basis();

        let dist = distance(request.source, listener.position);
        let (dir, degenerate) = direction(&listener, request.source);
        let angle = relative_angle_deg(basis.forward, dir);
        let pan_value = pan(basis.right, dir, profile.directional);

        let floor = self.settings.min_audible_db;
        let mut volume = attenuate_db(
            profile.base_volume_db,
            profile.falloff_exponent,
            dist,
            floor,
        );
        if let Some(occlusion) = request.occlusion {
            volume = occlude_db(volume, occlusion, self.settings.occlusion_penalty_db, floor);
        }

        let doppler = match (options.doppler, request.motion) {
            (true, Some(motion)) => Some(doppler_shift(
                &motion,
                request.source,
                listener.position,
                dir,
                self.settings.speed_of_sound,
            )),
            _ => None,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            profile = %profile.id,
            distance = dist,
            pan = pan_value,
            volume_db = volume,
            degenerate,
            "spatial parameters computed"
        );

        Ok(ProcessedAudioResult {
            backend: String::new(),
            distance: dist,
            direction: dir,
            degenerate,
            relative_angle_deg: angle,
            pan: pan_value,
            attenuated_volume_db: volume,
            frequency_range: profile.frequency_range,
            doppler_shift: doppler,
            reverb_amount: profile.reverb_amount,
            parameters: BTreeMap::new(),
        })
    }
}

/// Reject requests with non-finite or out-of-range inputs.
///
/// Orientation angles only need to be finite; they are wrapped into
/// [-180, 180] during processing.
pub fn validate_request(request: &SpatialRequest<'_>) -> Result<()> {
    if !in_world(request.source) {
        return Err(SpatialError::invalid_pose(
            "source position must be finite and within ±1e6 units",
        ));
    }
    if !in_world(request.listener.position) {
        return Err(SpatialError::invalid_pose(
            "listener position must be finite and within ±1e6 units",
        ));
    }
    if !request.listener.orientation.is_finite() {
        return Err(SpatialError::invalid_pose(
            "listener orientation angles must be finite",
        ));
    }
    if request
        .occlusion
        .is_some_and(|occlusion| !(0.0..=1.0).contains(&occlusion))
    {
        return Err(SpatialError::invalid_pose(
            "occlusion factor must be within 0..1",
        ));
    }
    if let Some(motion) = request.motion
        && !(motion.is_valid()
            && in_world(motion.previous_source)
            && in_world(motion.previous_listener))
    {
        return Err(SpatialError::invalid_pose(
            "motion needs previous positions within ±1e6 units and a time step of at least 1 µs",
        ));
    }
    Ok(())
}

/// True when every component is finite and within [`MAX_COORDINATE`].
pub fn in_world(point: Vec3) -> bool {
    point.is_finite()
        && point.x.abs() <= MAX_COORDINATE
        && point.y.abs() <= MAX_COORDINATE
        && point.z.abs() <= MAX_COORDINATE
}

/// Euclidean distance between two points. Symmetric in its arguments.
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Unit vector from the listener to the source.
///
/// Returns the listener's forward vector and `true` when the two positions
/// coincide.
pub fn direction(listener: &ListenerPose, source: Vec3) -> (Vec3, bool) {
    let offset = source - listener.position;
    if offset.length() < DEGENERATE_DISTANCE {
        return (listener.orientation.basis().forward, true);
    }
    match offset.try_normalize() {
        Some(dir) => (dir, false),
        None => (listener.orientation.basis().forward, true),
    }
}

/// Angle in degrees between the listener's forward vector and `direction`.
///
/// The cosine is clamped before `acos` so floating-point drift cannot push it
/// outside the domain; the result is always within [0, 180].
pub fn relative_angle_deg(forward: Vec3, direction: Vec3) -> f32 {
    let cos = forward.dot(direction).clamp(-1.0, 1.0);
    acosf(cos).to_degrees().clamp(0.0, 180.0)
}

/// Stereo pan: projection of `direction` onto the listener's right vector.
///
/// Omnidirectional sounds always report 0.
pub fn pan(right: Vec3, direction: Vec3, directional: bool) -> f32 {
    if !directional {
        return 0.0;
    }
    direction.dot(right).clamp(-1.0, 1.0)
}

/// Distance attenuation in dB.
///
/// Distances below 1 unit are treated as 1 so the logarithm never amplifies.
///
/// # Example
/// ```rust
/// use spatia_core::attenuate_db;
///
/// assert_eq!(attenuate_db(-12.0, 2.0, 0.5, -96.0), -12.0);
/// assert!((attenuate_db(-12.0, 2.0, 100.0, -96.0) - (-16.0)).abs() < 1e-4);
/// assert_eq!(attenuate_db(-12.0, 100.0, 1e9, -96.0), -96.0);
/// ```
pub fn attenuate_db(base_db: f32, falloff_exponent: f32, distance: f32, floor_db: f32) -> f32 {
    (base_db - falloff_exponent * log10f(distance.max(1.0))).max(floor_db)
}

/// Apply an additive occlusion penalty, keeping the floor.
pub fn occlude_db(volume_db: f32, occlusion: f32, penalty_db: f32, floor_db: f32) -> f32 {
    (volume_db - occlusion.clamp(0.0, 1.0) * penalty_db).max(floor_db)
}

/// Doppler frequency multiplier from position deltas.
///
/// `direction` points from listener to source. The listener's radial velocity
/// is positive when moving toward the source; the source's is positive when
/// moving away from the listener. Both are clamped to 0.9 of the speed of sound.
///
/// Returns 1.0 (no shift) when `speed_of_sound` is not finite and positive or
/// the velocities are not finite.
pub fn doppler_shift(
    motion: &Motion,
    source: Vec3,
    listener: Vec3,
    direction: Vec3,
    speed_of_sound: f32,
) -> f32 {
    if !(speed_of_sound.is_finite() && speed_of_sound > 0.0) {
        return 1.0;
    }
    let inv_dt = 1.0 / motion.dt_secs;
    let source_velocity = (source - motion.previous_source) * inv_dt;
    let listener_velocity = (listener - motion.previous_listener) * inv_dt;

    let limit = speed_of_sound * MAX_RADIAL_FRACTION;
    let listener_radial = listener_velocity.dot(direction).clamp(-limit, limit);
    let source_radial = source_velocity.dot(direction).clamp(-limit, limit);

    if !(listener_radial.is_finite() && source_radial.is_finite()) {
        return 1.0;
    }
    (speed_of_sound + listener_radial) / (speed_of_sound + source_radial)
}

/// Listener-relative azimuth and elevation of `direction`, in degrees.
///
/// Azimuth is in [-180, 180] with 0 straight ahead and +90 to the right;
/// elevation is in [-90, 90] with +90 straight up.
pub fn azimuth_elevation(basis: &ListenerBasis, direction: Vec3) -> (f32, f32) {
    let right = direction.dot(basis.right);
    let forward = direction.dot(basis.forward);
    let up = direction.dot(basis.up);
    let azimuth = atan2f(right, forward).to_degrees();
    let elevation = atan2f(up, sqrtf(right * right + forward * forward)).to_degrees();
    (azimuth, elevation)
}
