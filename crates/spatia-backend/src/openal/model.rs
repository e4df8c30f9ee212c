//! OpenAL 1.1 gain equations.
//!
//! OpenAL has no query for the gain a source is rendered at, so both drivers
//! evaluate the OpenAL 1.1 equations over the parameters the runtime holds.
//!
//! For `AL_INVERSE_DISTANCE_CLAMPED`:
//!
//! ```text
//! d    = clamp(distance, reference, max)
//! gain = reference / (reference + rolloff × (d − reference))
//! ```
//!
//! The cone factor is 1 inside half the inner angle, `cone_outer_gain` outside
//! half the outer angle, and linearly interpolated between.

use spatia_core::Vec3;

use super::driver::{AlSource, DistanceModel};

/// Inverse-distance gain for a source.
pub fn distance_gain(model: DistanceModel, source: &AlSource, distance: f32) -> f32 {
    let reference = source.reference_distance.max(f32::EPSILON);
    let rolloff = source.rolloff_factor.max(0.0);
    match model {
        DistanceModel::None => 1.0,
        DistanceModel::InverseDistance => {
            let d = distance.max(f32::EPSILON);
            reference / (reference + rolloff * (d - reference)).max(f32::EPSILON)
        }
        DistanceModel::InverseDistanceClamped => {
            let d = distance.clamp(reference, source.max_distance.max(reference));
            reference / (reference + rolloff * (d - reference))
        }
    }
}

/// Cone gain for a source heard from `listener`.
pub fn cone_gain(source: &AlSource, listener: Vec3) -> f32 {
    let Some(facing) = source.direction.try_normalize() else {
        return 1.0;
    };
    let Some(to_listener) = (listener - source.position).try_normalize() else {
        return 1.0;
    };
    let angle = libm::acosf(facing.dot(to_listener).clamp(-1.0, 1.0)).to_degrees();
    let inner = source.cone_inner_angle * 0.5;
    let outer = (source.cone_outer_angle * 0.5).max(inner);
    if angle <= inner {
        1.0
    } else if angle >= outer {
        source.cone_outer_gain
    } else {
        let t = (angle - inner) / (outer - inner);
        1.0 + t * (source.cone_outer_gain - 1.0)
    }
}

/// Source gain after distance, cone, and listener gain, clamped to 0..1.
pub fn rendered_gain(
    model: DistanceModel,
    source: &AlSource,
    listener_position: Vec3,
    listener_gain: f32,
) -> f32 {
    let distance = source.position.distance(listener_position);
    let gain = source.gain
        * distance_gain(model, source, distance)
        * cone_gain(source, listener_position)
        * listener_gain;
    gain.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_distance_clamped() {
        let source = AlSource {
            rolloff_factor: 1.0,
            reference_distance: 1.0,
            max_distance: 100.0,
            ..AlSource::default()
        };
        let model = DistanceModel::InverseDistanceClamped;
        assert_eq!(distance_gain(model, &source, 0.2), 1.0);
        assert!((distance_gain(model, &source, 10.0) - 0.1).abs() < 1e-6);
        assert!((distance_gain(model, &source, 500.0) - 0.01).abs() < 1e-6);
        assert_eq!(distance_gain(DistanceModel::None, &source, 500.0), 1.0);
    }

    #[test]
    fn unclamped_model_keeps_falling_past_max() {
        let source = AlSource {
            max_distance: 100.0,
            ..AlSource::default()
        };
        let g = distance_gain(DistanceModel::InverseDistance, &source, 500.0);
        assert!((g - 1.0 / 500.0).abs() < 1e-6);
    }

    #[test]
    fn cone_interpolates() {
        let source = AlSource {
            direction: Vec3::Z,
            cone_inner_angle: 60.0,
            cone_outer_angle: 120.0,
            cone_outer_gain: 0.5,
            ..AlSource::default()
        };
        assert_eq!(cone_gain(&source, Vec3::new(0.0, 0.0, 5.0)), 1.0);
        assert_eq!(cone_gain(&source, Vec3::new(0.0, 0.0, -5.0)), 0.5);
        // 45 degrees off axis: halfway between 30 and 60
        let g = cone_gain(&source, Vec3::new(5.0, 0.0, 5.0));
        assert!((g - 0.75).abs() < 1e-4);

        let omni = AlSource::default();
        assert_eq!(cone_gain(&omni, Vec3::new(0.0, 0.0, -5.0)), 1.0);
    }

    #[test]
    fn rendered_gain_combines_factors() {
        let source = AlSource {
            position: Vec3::new(0.0, 0.0, 4.0),
            gain: 0.5,
            max_distance: 100.0,
            ..AlSource::default()
        };
        let gain = rendered_gain(DistanceModel::InverseDistanceClamped, &source, Vec3::ZERO, 1.0);
        assert!((gain - 0.125).abs() < 1e-6);
        let quiet = rendered_gain(DistanceModel::InverseDistanceClamped, &source, Vec3::ZERO, 0.5);
        assert!((quiet - 0.0625).abs() < 1e-6);
    }
}
