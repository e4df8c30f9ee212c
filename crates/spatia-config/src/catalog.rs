//! TOML profile catalogs.
//!
//! A catalog lists operator profiles and map acoustics:
//!
//! ```toml
//! [[operators]]
//! id = "Ash"
//! frequency_range = { low_hz = 800.0, high_hz = 3200.0 }
//! base_volume_db = -18.0
//! falloff_exponent = 2.5
//! reverb_amount = 0.3
//! occlusion_factor = 0.7
//!
//! [[maps]]
//! id = "Bank"
//! ambient_frequency_range = { low_hz = 80.0, high_hz = 4000.0 }
//! ambient_volume_db = -35.0
//! exterior = { occlusion = 0.2, outdoor_factor = 1.0 }
//! interior = { occlusion = 0.6, outdoor_factor = 0.0 }
//!
//! [maps.reverb_zones.lobby]
//! reverb = 0.8
//! echo_delay_secs = 0.15
//! ```
//!
//! # Map zones
//!
//! A map resolves to one profile per zone:
//!
//! | zone | reverb | occlusion |
//! |------|--------|-----------|
//! | none | [`AMBIENT_REVERB`] | interior |
//! | `exterior` | [`AMBIENT_REVERB`] | exterior |
//! | `interior` | [`AMBIENT_REVERB`] | interior |
//! | reverb zone | the zone's reverb | interior |
//!
//! Map profiles are omnidirectional beds with [`AMBIENT_FALLOFF`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spatia_core::{AudioProfile, FrequencyRange};

use crate::ConfigError;

/// Zone name for outdoor areas.
pub const EXTERIOR_ZONE: &str = "exterior";

/// Zone name for indoor areas.
pub const INTERIOR_ZONE: &str = "interior";

/// Zone name that matches every ambient sound placement.
pub const ALL_ZONES: &str = "all";

/// Falloff exponent of map ambience.
pub const AMBIENT_FALLOFF: f32 = 1.0;

/// Reverb amount of map ambience outside reverb zones.
pub const AMBIENT_REVERB: f32 = 0.2;

/// Occlusion factor of individual ambient sounds.
pub const AMBIENT_SOUND_OCCLUSION: f32 = 0.8;

/// Occlusion of an indoor or outdoor area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialZone {
    /// Occlusion factor, 0..1.
    pub occlusion: f32,
    /// How open to the outside the area is, 0..1.
    #[serde(default)]
    pub outdoor_factor: f32,
}

/// Room acoustics of a named area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverbZone {
    /// Reverb amount, 0..1.
    pub reverb: f32,
    /// Dominant echo delay in seconds.
    #[serde(default)]
    pub echo_delay_secs: f32,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Ambient emitter placed in a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientSound {
    /// Sound name, unique within its map.
    pub name: String,
    /// Audible band.
    pub frequency_range: FrequencyRange,
    /// Volume in dB.
    pub volume_db: f32,
    /// Zone the sound plays in, or [`ALL_ZONES`].
    #[serde(default = "default_sound_zone")]
    pub zone: String,
}

fn default_sound_zone() -> String {
    ALL_ZONES.to_string()
}

impl AmbientSound {
    /// True when the sound is audible in `zone` (every sound matches `None`).
    pub fn plays_in(&self, zone: Option<&str>) -> bool {
        match zone {
            None => true,
            Some(zone) => self.zone == ALL_ZONES || zone == ALL_ZONES || self.zone == zone,
        }
    }
}

/// Acoustic description of a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapAcoustics {
    /// Map identifier.
    pub id: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Band of the ambient bed.
    pub ambient_frequency_range: FrequencyRange,
    /// Volume of the ambient bed in dB.
    pub ambient_volume_db: f32,
    /// Outdoor occlusion.
    pub exterior: SpatialZone,
    /// Indoor occlusion.
    pub interior: SpatialZone,
    /// Named indoor areas with their own reverb.
    #[serde(default)]
    pub reverb_zones: BTreeMap<String, ReverbZone>,
    /// Ambient emitters.
    #[serde(default)]
    pub ambient_sounds: Vec<AmbientSound>,
}

impl MapAcoustics {
    /// Every zone name the map resolves, spatial zones first.
    pub fn zone_names(&self) -> Vec<String> {
        [EXTERIOR_ZONE, INTERIOR_ZONE]
            .into_iter()
            .map(str::to_string)
            .chain(self.reverb_zones.keys().cloned())
            .collect()
    }

    /// Profile of the ambient bed, optionally for one zone.
    ///
    /// Returns `None` for an unknown zone.
    pub fn zone_profile(&self, zone: Option<&str>) -> Option<AudioProfile> {
        let (id, reverb, occlusion) = match zone {
            None => (self.id.clone(), AMBIENT_REVERB, self.interior.occlusion),
            Some(EXTERIOR_ZONE) => (
                format!("{}/{EXTERIOR_ZONE}", self.id),
                AMBIENT_REVERB,
                self.exterior.occlusion,
            ),
            Some(INTERIOR_ZONE) => (
                format!("{}/{INTERIOR_ZONE}", self.id),
                AMBIENT_REVERB,
                self.interior.occlusion,
            ),
            Some(name) => {
                let room = self.reverb_zones.get(name)?;
                (
                    format!("{}/{name}", self.id),
                    room.reverb,
                    self.interior.occlusion,
                )
            }
        };
        let range = self.ambient_frequency_range;
        Some(
            AudioProfile::new(id)
                .with_description(self.description.clone())
                .with_frequency_range(range.low_hz, range.high_hz)
                .with_volume_db(self.ambient_volume_db)
                .with_falloff(AMBIENT_FALLOFF)
                .with_reverb(reverb)
                .with_occlusion(occlusion)
                .with_directional(false),
        )
    }

    /// Profiles of the ambient sounds audible in `zone`.
    pub fn ambient_profiles(&self, zone: Option<&str>) -> Vec<AudioProfile> {
        self.ambient_sounds
            .iter()
            .filter(|sound| sound.plays_in(zone))
            .map(|sound| {
                AudioProfile::new(format!("{}:{}", self.id, sound.name))
                    .with_description(format!("Ambient sound: {} on {}", sound.name, self.id))
                    .with_frequency_range(sound.frequency_range.low_hz, sound.frequency_range.high_hz)
                    .with_volume_db(sound.volume_db)
                    .with_falloff(AMBIENT_FALLOFF)
                    .with_reverb(AMBIENT_REVERB)
                    .with_occlusion(AMBIENT_SOUND_OCCLUSION)
                    .with_directional(false)
            })
            .collect()
    }
}

/// Operator profiles and map acoustics as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCatalog {
    /// Operator emitters.
    #[serde(default)]
    pub operators: Vec<AudioProfile>,
    /// Map acoustics.
    #[serde(default)]
    pub maps: Vec<MapAcoustics>,
}

impl ProfileCatalog {
    /// Load a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the catalog to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Serialize the catalog to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Append every operator and map of `other`, which must not repeat ids.
    pub fn merge(&mut self, other: ProfileCatalog) -> Result<(), ConfigError> {
        for op in &other.operators {
            if self.operators.iter().any(|o| o.id == op.id) {
                return Err(ConfigError::DuplicateProfile(op.id.clone()));
            }
        }
        for map in &other.maps {
            if self.maps.iter().any(|m| m.id == map.id) {
                return Err(ConfigError::DuplicateProfile(map.id.clone()));
            }
        }
        self.operators.extend(other.operators);
        self.maps.extend(other.maps);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"
[[maps]]
id = "Bank"
description = "Urban bank"
ambient_frequency_range = { low_hz = 80.0, high_hz = 4000.0 }
ambient_volume_db = -35.0
exterior = { occlusion = 0.2, outdoor_factor = 1.0 }
interior = { occlusion = 0.6 }

[maps.reverb_zones.lobby]
reverb = 0.8
echo_delay_secs = 0.15

[[maps.ambient_sounds]]
name = "city_traffic"
frequency_range = { low_hz = 100.0, high_hz = 800.0 }
volume_db = -40.0
zone = "exterior"

[[maps.ambient_sounds]]
name = "hvac_hum"
frequency_range = { low_hz = 60.0, high_hz = 250.0 }
volume_db = -45.0
"#;

    fn bank() -> MapAcoustics {
        ProfileCatalog::from_toml(BANK).unwrap().maps.remove(0)
    }

    #[test]
    fn ambient_profile_uses_interior_occlusion() {
        let p = bank().zone_profile(None).unwrap();
        assert_eq!(p.id, "Bank");
        assert_eq!(p.occlusion_factor, 0.6);
        assert_eq!(p.reverb_amount, AMBIENT_REVERB);
        assert_eq!(p.falloff_exponent, AMBIENT_FALLOFF);
        assert_eq!(p.base_volume_db, -35.0);
        assert!(!p.directional);
    }

    #[test]
    fn zone_variants() {
        let map = bank();
        let exterior = map.zone_profile(Some("exterior")).unwrap();
        assert_eq!(exterior.id, "Bank/exterior");
        assert_eq!(exterior.occlusion_factor, 0.2);

        let lobby = map.zone_profile(Some("lobby")).unwrap();
        assert_eq!(lobby.id, "Bank/lobby");
        assert_eq!(lobby.reverb_amount, 0.8);
        assert_eq!(lobby.occlusion_factor, 0.6);

        assert!(map.zone_profile(Some("rooftop")).is_none());
    }

    #[test]
    fn ambient_sounds_filter_by_zone() {
        let map = bank();
        assert_eq!(map.ambient_profiles(None).len(), 2);

        let lobby = map.ambient_profiles(Some("lobby"));
        assert_eq!(lobby.len(), 1);
        assert_eq!(lobby[0].id, "Bank:hvac_hum");
        assert_eq!(lobby[0].occlusion_factor, AMBIENT_SOUND_OCCLUSION);

        assert_eq!(map.ambient_profiles(Some("exterior")).len(), 2);
        assert_eq!(map.ambient_profiles(Some(ALL_ZONES)).len(), 2);
    }

    #[test]
    fn zone_names_list_spatial_zones_first() {
        assert_eq!(bank().zone_names(), ["exterior", "interior", "lobby"]);
    }

    #[test]
    fn merge_rejects_duplicates() {
        let mut catalog = ProfileCatalog::from_toml(BANK).unwrap();
        let again = ProfileCatalog::from_toml(BANK).unwrap();
        assert!(matches!(
            catalog.merge(again),
            Err(ConfigError::DuplicateProfile(id)) if id == "Bank"
        ));

        let extra = ProfileCatalog {
            operators: vec![AudioProfile::new("Ash")],
            maps: Vec::new(),
        };
        catalog.merge(extra).unwrap();
        assert_eq!(catalog.operators.len(), 1);
    }

    #[test]
    fn toml_roundtrip() {
        let catalog = ProfileCatalog::from_toml(BANK).unwrap();
        let reparsed = ProfileCatalog::from_toml(&catalog.to_toml().unwrap()).unwrap();
        assert_eq!(catalog, reparsed);
    }
}
