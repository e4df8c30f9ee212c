//! Profile and map validation.
//!
//! Catalogs are validated once, when a store is built, so the engine can rely
//! on every profile it receives being well formed.
//!
//! # Example
//!
//! ```rust
//! use spatia_config::{ValidationError, validate_profile};
//! use spatia_core::AudioProfile;
//!
//! let ok = AudioProfile::new("Ash").with_volume_db(-18.0).with_falloff(2.5);
//! assert!(validate_profile(&ok).is_ok());
//!
//! let loud = AudioProfile::new("Ash").with_volume_db(6.0);
//! assert!(matches!(
//!     validate_profile(&loud),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use spatia_core::{AudioProfile, FrequencyRange, MIN_AUDIBLE_DB};
use thiserror::Error;

use crate::catalog::{EXTERIOR_ZONE, INTERIOR_ZONE, MapAcoustics};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Profile or map with an empty identifier.
    #[error("profile identifier is empty")]
    EmptyId,

    /// Frequency band that is not finite, negative, or inverted.
    #[error("'{profile}': invalid frequency range {low_hz}..{high_hz} Hz")]
    InvalidFrequencyRange {
        /// Owning profile or map.
        profile: String,
        /// Lower edge.
        low_hz: f32,
        /// Upper edge.
        high_hz: f32,
    },

    /// Field value outside its allowed range.
    #[error("'{profile}': {field} value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Owning profile or map.
        profile: String,
        /// Field name.
        field: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Field that must be strictly positive.
    #[error("'{profile}': {field} must be positive, got {value}")]
    NotPositive {
        /// Owning profile or map.
        profile: String,
        /// Field name.
        field: String,
        /// Offending value.
        value: f32,
    },

    /// Reverb zone named like one of the spatial zones.
    #[error("'{map}': reverb zone name '{zone}' is reserved")]
    ReservedZone {
        /// Owning map.
        map: String,
        /// Offending zone name.
        zone: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

struct Checker<'a> {
    owner: &'a str,
    errors: Vec<ValidationError>,
}

impl<'a> Checker<'a> {
    fn new(owner: &'a str) -> Self {
        let mut errors = Vec::new();
        if owner.trim().is_empty() {
            errors.push(ValidationError::EmptyId);
        }
        Self { owner, errors }
    }

    fn range(&mut self, field: &str, value: f32, min: f32, max: f32) {
        if !(min..=max).contains(&value) {
            self.errors.push(ValidationError::OutOfRange {
                profile: self.owner.to_string(),
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
    }

    fn positive(&mut self, field: &str, value: f32) {
        if !(value.is_finite() && value > 0.0) {
            self.errors.push(ValidationError::NotPositive {
                profile: self.owner.to_string(),
                field: field.to_string(),
                value,
            });
        }
    }

    fn frequency(&mut self, range: &FrequencyRange) {
        if !range.is_valid() {
            self.errors.push(ValidationError::InvalidFrequencyRange {
                profile: self.owner.to_string(),
                low_hz: range.low_hz,
                high_hz: range.high_hz,
            });
        }
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

/// Validate one audio profile.
///
/// Checks: non-empty id, ordered frequency band, base volume in
/// [`MIN_AUDIBLE_DB`, 0], positive falloff, reverb and occlusion in 0..1.
pub fn validate_profile(profile: &AudioProfile) -> ValidationResult<()> {
    let mut check = Checker::new(&profile.id);
    check.frequency(&profile.frequency_range);
    check.range("base_volume_db", profile.base_volume_db, MIN_AUDIBLE_DB, 0.0);
    check.positive("falloff_exponent", profile.falloff_exponent);
    check.range("reverb_amount", profile.reverb_amount, 0.0, 1.0);
    check.range("occlusion_factor", profile.occlusion_factor, 0.0, 1.0);
    if let Some(modifiers) = &profile.modifiers {
        check.positive("speed_multiplier", modifiers.speed_multiplier);
    }
    check.finish()
}

/// Validate a map's acoustics, its zones and its ambient sounds.
pub fn validate_map(map: &MapAcoustics) -> ValidationResult<()> {
    let mut check = Checker::new(&map.id);
    check.frequency(&map.ambient_frequency_range);
    check.range("ambient_volume_db", map.ambient_volume_db, MIN_AUDIBLE_DB, 0.0);

    for (name, zone) in [(EXTERIOR_ZONE, &map.exterior), (INTERIOR_ZONE, &map.interior)] {
        check.range(&format!("{name}.occlusion"), zone.occlusion, 0.0, 1.0);
        check.range(&format!("{name}.outdoor_factor"), zone.outdoor_factor, 0.0, 1.0);
    }

    for (name, zone) in &map.reverb_zones {
        if name == EXTERIOR_ZONE || name == INTERIOR_ZONE {
            check.errors.push(ValidationError::ReservedZone {
                map: map.id.clone(),
                zone: name.clone(),
            });
        }
        check.range(&format!("{name}.reverb"), zone.reverb, 0.0, 1.0);
        check.range(
            &format!("{name}.echo_delay_secs"),
            zone.echo_delay_secs,
            0.0,
            f32::MAX,
        );
    }

    for sound in &map.ambient_sounds {
        check.frequency(&sound.frequency_range);
        check.range(
            &format!("{}.volume_db", sound.name),
            sound.volume_db,
            MIN_AUDIBLE_DB,
            0.0,
        );
    }
    check.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ReverbZone, SpatialZone};

    fn map() -> MapAcoustics {
        MapAcoustics {
            id: "Bank".into(),
            description: String::new(),
            ambient_frequency_range: FrequencyRange::new(80.0, 4000.0),
            ambient_volume_db: -35.0,
            exterior: SpatialZone {
                occlusion: 0.2,
                outdoor_factor: 1.0,
            },
            interior: SpatialZone {
                occlusion: 0.6,
                outdoor_factor: 0.0,
            },
            reverb_zones: [(
                "lobby".to_string(),
                ReverbZone {
                    reverb: 0.8,
                    echo_delay_secs: 0.15,
                    description: String::new(),
                },
            )]
            .into_iter()
            .collect(),
            ambient_sounds: Vec::new(),
        }
    }

    #[test]
    fn valid_profile_passes() {
        let profile = AudioProfile::new("Thermite")
            .with_frequency_range(200.0, 1800.0)
            .with_volume_db(-12.0)
            .with_modifiers(1.0, 2);
        assert!(validate_profile(&profile).is_ok());
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let profile = AudioProfile::new("Ash").with_falloff(0.0);
        assert_eq!(
            validate_profile(&profile),
            Err(ValidationError::NotPositive {
                profile: "Ash".into(),
                field: "falloff_exponent".into(),
                value: 0.0,
            })
        );
    }

    #[test]
    fn collects_multiple_errors() {
        let profile = AudioProfile::new("")
            .with_frequency_range(2000.0, 100.0)
            .with_reverb(1.5)
            .with_occlusion(f32::NAN);
        match validate_profile(&profile) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 4);
                assert_eq!(errors[0], ValidationError::EmptyId);
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn valid_map_passes() {
        assert!(validate_map(&map()).is_ok());
    }

    #[test]
    fn reserved_zone_names_rejected() {
        let mut m = map();
        let lobby = m.reverb_zones["lobby"].clone();
        m.reverb_zones.insert(EXTERIOR_ZONE.into(), lobby);
        assert!(matches!(
            validate_map(&m),
            Err(ValidationError::ReservedZone { zone, .. }) if zone == EXTERIOR_ZONE
        ));
    }

    #[test]
    fn zone_occlusion_checked() {
        let mut m = map();
        m.interior.occlusion = 1.2;
        let msg = validate_map(&m).unwrap_err().to_string();
        assert!(msg.contains("interior.occlusion"), "got: {msg}");
    }
}
