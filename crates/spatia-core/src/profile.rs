//! Static audio metadata for a sound emitter.

use alloc::string::String;
use alloc::vec::Vec;

/// Frequency band of a sound, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyRange {
    /// Lower edge in Hz.
    pub low_hz: f32,
    /// Upper edge in Hz (>= `low_hz`).
    pub high_hz: f32,
}

impl FrequencyRange {
    /// Create a frequency range.
    pub const fn new(low_hz: f32, high_hz: f32) -> Self {
        Self { low_hz, high_hz }
    }

    /// True when both edges are finite, non-negative, and ordered.
    pub fn is_valid(&self) -> bool {
        self.low_hz.is_finite()
            && self.high_hz.is_finite()
            && self.low_hz >= 0.0
            && self.low_hz <= self.high_hz
    }

    /// Geometric center of the band.
    pub fn center_hz(&self) -> f32 {
        libm::sqrtf(self.low_hz.max(1.0) * self.high_hz.max(1.0))
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self::new(300.0, 2000.0)
    }
}

/// Optional gameplay attributes attached to an operator profile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameplayModifiers {
    /// Movement speed relative to the baseline (1.0 = average).
    pub speed_multiplier: f32,
    /// Armor rating (1 = light, 3 = heavy).
    pub armor_rating: u8,
}

/// Audio metadata for an operator or map sound.
///
/// Profiles are immutable once loaded and owned by a profile store; the engine
/// only reads them.
///
/// ## Fields
///
/// - `base_volume_db`: volume at 1 unit of distance (<= 0 dB)
/// - `falloff_exponent`: dB lost per decade of distance (> 0)
/// - `reverb_amount`: wet amount, 0..1
/// - `occlusion_factor`: how much intervening material muffles the sound, 0..1
/// - `directional`: omnidirectional sounds are never panned
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioProfile {
    /// Profile identifier (operator name, or `map/zone` for map variants).
    pub id: String,
    /// Human-readable description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Audible frequency band.
    #[cfg_attr(feature = "serde", serde(default))]
    pub frequency_range: FrequencyRange,
    /// Base volume in dB.
    pub base_volume_db: f32,
    /// Distance falloff exponent.
    pub falloff_exponent: f32,
    /// Reverb amount, 0..1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reverb_amount: f32,
    /// Occlusion factor, 0..1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub occlusion_factor: f32,
    /// Whether the sound can be localized (panned).
    #[cfg_attr(feature = "serde", serde(default = "default_directional"))]
    pub directional: bool,
    /// Optional gameplay modifiers.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub modifiers: Option<GameplayModifiers>,
    /// Labels of distinctive audio cues.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cues: Vec<String>,
}

#[cfg(feature = "serde")]
fn default_directional() -> bool {
    true
}

impl AudioProfile {
    /// Create a profile with neutral defaults.
    ///
    /// Defaults: 300-2000 Hz, -15 dB, falloff 2.0, reverb 0.4, occlusion 0.5,
    /// directional.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            frequency_range: FrequencyRange::default(),
            base_volume_db: -15.0,
            falloff_exponent: 2.0,
            reverb_amount: 0.4,
            occlusion_factor: 0.5,
            directional: true,
            modifiers: None,
            cues: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the frequency range.
    pub fn with_frequency_range(mut self, low_hz: f32, high_hz: f32) -> Self {
        self.frequency_range = FrequencyRange::new(low_hz, high_hz);
        self
    }

    /// Set the base volume.
    pub fn with_volume_db(mut self, db: f32) -> Self {
        self.base_volume_db = db;
        self
    }

    /// Set the falloff exponent.
    pub fn with_falloff(mut self, exponent: f32) -> Self {
        self.falloff_exponent = exponent;
        self
    }

    /// Set the reverb amount.
    pub fn with_reverb(mut self, amount: f32) -> Self {
        self.reverb_amount = amount;
        self
    }

    /// Set the occlusion factor.
    pub fn with_occlusion(mut self, factor: f32) -> Self {
        self.occlusion_factor = factor;
        self
    }

    /// Set the directional flag.
    pub fn with_directional(mut self, directional: bool) -> Self {
        self.directional = directional;
        self
    }

    /// Attach gameplay modifiers.
    pub fn with_modifiers(mut self, speed_multiplier: f32, armor_rating: u8) -> Self {
        self.modifiers = Some(GameplayModifiers {
            speed_multiplier,
            armor_rating,
        });
        self
    }

    /// Add an audio cue label.
    pub fn with_cue(mut self, cue: impl Into<String>) -> Self {
        self.cues.push(cue.into());
        self
    }
}
