//! Processing output.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::profile::FrequencyRange;
use crate::vector::Vec3;

/// A backend-specific parameter value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// Numeric value.
    Number(f32),
    /// Flag.
    Bool(bool),
    /// Free-form label.
    Text(String),
    /// 3D vector.
    Vector(Vec3),
}

impl ParamValue {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Flag value, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Vector value, if this is a vector.
    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            ParamValue::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(String::from(v))
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        ParamValue::Vector(v)
    }
}

/// Spatial parameters computed for one request.
///
/// The generic fields are always present as a baseline; backends add their
/// native refinements to [`parameters`](Self::parameters) without overwriting
/// the baseline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessedAudioResult {
    /// Identifier of the backend that produced the result.
    pub backend: String,
    /// Distance from listener to source (>= 0).
    pub distance: f32,
    /// Unit vector from listener to source.
    pub direction: Vec3,
    /// True when source and listener coincide and `direction` is the listener's forward.
    pub degenerate: bool,
    /// Angle between listener forward and `direction`, 0..180 degrees.
    pub relative_angle_deg: f32,
    /// Stereo balance, -1 (left) to +1 (right).
    pub pan: f32,
    /// Volume after distance attenuation and occlusion, in dB.
    pub attenuated_volume_db: f32,
    /// Frequency band (copied from the profile, possibly backend-adjusted).
    pub frequency_range: FrequencyRange,
    /// Frequency multiplier from relative motion, when computed.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub doppler_shift: Option<f32>,
    /// Reverb amount carried from the profile.
    pub reverb_amount: f32,
    /// Backend-specific parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: BTreeMap<String, ParamValue>,
}

impl ProcessedAudioResult {
    /// Insert or replace a backend-specific parameter.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.parameters.insert(key.into(), value.into());
    }

    /// Look up a backend-specific parameter.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    /// Look up a numeric backend-specific parameter.
    pub fn number(&self, key: &str) -> Option<f32> {
        self.param(key).and_then(ParamValue::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> ProcessedAudioResult {
        ProcessedAudioResult {
            backend: String::from("none"),
            distance: 0.0,
            direction: Vec3::Z,
            degenerate: true,
            relative_angle_deg: 0.0,
            pan: 0.0,
            attenuated_volume_db: -10.0,
            frequency_range: FrequencyRange::default(),
            doppler_shift: None,
            reverb_amount: 0.0,
            parameters: BTreeMap::new(),
        }
    }

    #[test]
    fn params_roundtrip_by_type() {
        let mut r = empty();
        r.set_param("gain", 0.5);
        r.set_param("hrtf", true);
        r.set_param("format", "Windows Sonic");
        r.set_param("pos", Vec3::X);

        assert_eq!(r.number("gain"), Some(0.5));
        assert_eq!(r.param("hrtf").and_then(ParamValue::as_bool), Some(true));
        assert_eq!(
            r.param("format").and_then(ParamValue::as_text),
            Some("Windows Sonic")
        );
        assert_eq!(r.param("pos").and_then(ParamValue::as_vector), Some(Vec3::X));
        assert_eq!(r.number("hrtf"), None);
        assert!(r.param("missing").is_none());
    }
}
