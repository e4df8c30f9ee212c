//! Listener orientation, poses, and motion samples.

use crate::vector::Vec3;
use libm::{cosf, fmodf, sinf};

/// Wrap an angle in degrees into [-180, 180].
///
/// Non-finite input is returned unchanged so validation can reject it.
///
/// # Example
/// ```rust
/// use spatia_core::normalize_degrees;
///
/// assert_eq!(normalize_degrees(270.0), -90.0);
/// assert_eq!(normalize_degrees(-540.0), -180.0);
/// assert_eq!(normalize_degrees(45.0), 45.0);
/// ```
pub fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return degrees;
    }
    let mut wrapped = fmodf(degrees, 360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped < -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Listener orientation as yaw/pitch/roll in degrees.
///
/// - **Yaw**: rotation about +Y; 0 faces +Z, 90 faces +X
/// - **Pitch**: positive looks up
/// - **Roll**: positive dips the right ear
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Roll in degrees.
    pub roll: f32,
}

impl Orientation {
    /// Create an orientation, normalizing every angle into [-180, 180].
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self {
            yaw,
            pitch,
            roll,
        }
        .normalized()
    }

    /// Return a copy with every angle wrapped into [-180, 180].
    pub fn normalized(self) -> Self {
        Self {
            yaw: normalize_degrees(self.yaw),
            pitch: normalize_degrees(self.pitch),
            roll: normalize_degrees(self.roll),
        }
    }

    /// True when every angle is finite.
    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }

    /// Compute the listener's forward/right/up basis.
    pub fn basis(&self) -> ListenerBasis {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let roll = self.roll.to_radians();

        let forward = Vec3::new(
            sinf(yaw) * cosf(pitch),
            sinf(pitch),
            cosf(yaw) * cosf(pitch),
        );
        let level_right = Vec3::new(cosf(yaw), 0.0, -sinf(yaw));
        let level_up = forward.cross(level_right);

        // Roll rotates the ear axis about forward.
        let right = level_right * cosf(roll) - level_up * sinf(roll);
        let up = forward.cross(right);

        ListenerBasis { forward, right, up }
    }
}

/// Orthonormal listener basis derived from an [`Orientation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenerBasis {
    /// Facing direction.
    pub forward: Vec3,
    /// Direction of the right ear.
    pub right: Vec3,
    /// Top of the head.
    pub up: Vec3,
}

/// A listener's position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerPose {
    /// Listener position.
    pub position: Vec3,
    /// Listener orientation.
    pub orientation: Orientation,
}

impl ListenerPose {
    /// Create a listener pose.
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Listener at `position` facing +Z with no pitch or roll.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Orientation::default())
    }
}

/// Prior poses for velocity estimation.
///
/// When attached to a request, velocities are the position deltas divided by
/// `dt_secs`, which enables the Doppler calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motion {
    /// Source position one time step earlier.
    pub previous_source: Vec3,
    /// Listener position one time step earlier.
    pub previous_listener: Vec3,
    /// Time step in seconds (at least [`MIN_MOTION_DT_SECS`]).
    pub dt_secs: f32,
}

/// Shortest accepted motion time step, in seconds.
pub const MIN_MOTION_DT_SECS: f32 = 1.0e-6;

impl Motion {
    /// Create a motion sample.
    pub fn new(previous_source: Vec3, previous_listener: Vec3, dt_secs: f32) -> Self {
        Self {
            previous_source,
            previous_listener,
            dt_secs,
        }
    }

    /// True when every position is finite and `dt_secs` is finite and at
    /// least [`MIN_MOTION_DT_SECS`].
    pub fn is_valid(&self) -> bool {
        self.previous_source.is_finite()
            && self.previous_listener.is_finite()
            && self.dt_secs.is_finite()
            && self.dt_secs >= MIN_MOTION_DT_SECS
    }
}
