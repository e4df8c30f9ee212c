//! Per-call processing request.

use crate::pose::{ListenerPose, Motion};
use crate::profile::AudioProfile;
use crate::vector::Vec3;

/// One spatial processing call: a profile, a source position, and a listener.
///
/// Requests borrow the profile from its store and are constructed per call.
#[derive(Debug, Clone, Copy)]
pub struct SpatialRequest<'a> {
    /// Profile of the emitting sound.
    pub profile: &'a AudioProfile,
    /// Source position.
    pub source: Vec3,
    /// Listener pose.
    pub listener: ListenerPose,
    /// Occlusion factor (0..1) supplied by a map/zone profile.
    pub occlusion: Option<f32>,
    /// Prior poses; presence requests a Doppler calculation.
    pub motion: Option<Motion>,
}

impl<'a> SpatialRequest<'a> {
    /// Create a stateless request with no occlusion and no motion.
    pub fn new(profile: &'a AudioProfile, source: Vec3, listener: ListenerPose) -> Self {
        Self {
            profile,
            source,
            listener,
            occlusion: None,
            motion: None,
        }
    }

    /// Apply a zone occlusion factor.
    pub fn with_occlusion(mut self, occlusion: f32) -> Self {
        self.occlusion = Some(occlusion);
        self
    }

    /// Attach a motion sample.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    /// True when the caller asked for a Doppler shift.
    pub fn wants_doppler(&self) -> bool {
        self.motion.is_some()
    }
}
