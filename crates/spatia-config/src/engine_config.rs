//! Engine configuration file.
//!
//! ```toml
//! preferred_backends = ["platform", "openal"]
//! profiles = "/home/me/.config/spatia/profiles.toml"
//!
//! [processor]
//! speed_of_sound = 343.0
//! occlusion_penalty_db = 10.0
//! min_audible_db = -96.0
//!
//! [backends.openal]
//! enabled = true
//! device = "Headphones"
//! max_sources = 64
//! ```
//!
//! Every key is optional; an empty file yields [`EngineConfig::default`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spatia_backend::{BackendConfig, NULL_BACKEND_ID, OPENAL_BACKEND_ID, PLATFORM_BACKEND_ID};
use spatia_core::ProcessorSettings;

use crate::ConfigError;
use crate::store::CatalogStore;

/// Backends the engine registers from configuration.
pub const KNOWN_BACKENDS: &[&str] = &[PLATFORM_BACKEND_ID, OPENAL_BACKEND_ID, NULL_BACKEND_ID];

/// Per-backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// Whether the backend is registered at all.
    pub enabled: bool,
    /// Output device name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Voice limit override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sources: Option<u32>,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            enabled: true,
            device: None,
            max_sources: None,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Backends tried in order at startup; the null backend is the floor.
    pub preferred_backends: Vec<String>,
    /// Extra catalog merged over the factory catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<PathBuf>,
    /// Constants for the generic spatial math.
    pub processor: ProcessorSettings,
    /// Per-backend sections keyed by backend id.
    pub backends: BTreeMap<String, BackendSection>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preferred_backends: vec![PLATFORM_BACKEND_ID.to_string(), OPENAL_BACKEND_ID.to_string()],
            profiles: None,
            processor: ProcessorSettings::default(),
            backends: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let mut config = Self::from_toml(&content)?;
        if let Some(profiles) = &config.profiles
            && profiles.is_relative()
            && let Some(dir) = path.parent()
        {
            config.profiles = Some(dir.join(profiles));
        }
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path.as_ref().display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories.
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

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject out-of-range processor settings and backend ids the engine
    /// cannot register.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((field, value)) = self.processor.invalid_field() {
            return Err(ConfigError::InvalidSetting { field, value });
        }
        let named = self
            .preferred_backends
            .iter()
            .chain(self.backends.keys());
        for id in named {
            if !KNOWN_BACKENDS.contains(&id.as_str()) {
                return Err(ConfigError::UnknownBackend(id.clone()));
            }
        }
        Ok(())
    }

    /// Whether a backend should be registered. The null backend always is.
    pub fn is_enabled(&self, id: &str) -> bool {
        id == NULL_BACKEND_ID || self.backends.get(id).is_none_or(|section| section.enabled)
    }

    /// Initialization settings for one backend.
    pub fn backend_config(&self, id: &str) -> BackendConfig {
        let section = self.backends.get(id);
        BackendConfig {
            processor: self.processor,
            device: section.and_then(|s| s.device.clone()),
            max_sources: section.and_then(|s| s.max_sources),
        }
    }

    /// Profile store for this configuration.
    ///
    /// The factory catalog, extended with [`profiles`](Self::profiles) when set.
    pub fn profile_store(&self) -> Result<CatalogStore, ConfigError> {
        match &self.profiles {
            Some(path) => CatalogStore::factory_with(path),
            None => CatalogStore::factory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.preferred_backends, ["platform", "openal"]);
    }

    #[test]
    fn backend_sections() {
        let config = EngineConfig::from_toml(
            r#"
[processor]
occlusion_penalty_db = 6.0

[backends.openal]
device = "Headphones"
max_sources = 32

[backends.platform]
enabled = false
"#,
        )
        .unwrap();

        let openal = config.backend_config("openal");
        assert_eq!(openal.device.as_deref(), Some("Headphones"));
        assert_eq!(openal.max_sources, Some(32));
        assert_eq!(openal.processor.occlusion_penalty_db, 6.0);
        assert_eq!(openal.processor.speed_of_sound, 343.0);

        assert!(config.is_enabled("openal"));
        assert!(!config.is_enabled("platform"));
        assert!(config.is_enabled("none"));
        assert_eq!(config.backend_config("none").device, None);
    }

    #[test]
    fn null_backend_cannot_be_disabled() {
        let config = EngineConfig::from_toml("[backends.none]\nenabled = false\n").unwrap();
        assert!(config.is_enabled("none"));
    }

    #[test]
    fn unknown_backend_rejected() {
        assert!(matches!(
            EngineConfig::from_toml(r#"preferred_backends = ["xaudio2"]"#),
            Err(ConfigError::UnknownBackend(id)) if id == "xaudio2"
        ));
        assert!(matches!(
            EngineConfig::from_toml("[backends.wasapi]\n"),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn processor_settings_are_range_checked() {
        for (toml, field) in [
            ("[processor]\nspeed_of_sound = -343.0\n", "speed_of_sound"),
            ("[processor]\nspeed_of_sound = nan\n", "speed_of_sound"),
            ("[processor]\nspeed_of_sound = 0.0\n", "speed_of_sound"),
            ("[processor]\nocclusion_penalty_db = -3.0\n", "occlusion_penalty_db"),
            ("[processor]\nmin_audible_db = inf\n", "min_audible_db"),
        ] {
            assert!(
                matches!(
                    EngineConfig::from_toml(toml),
                    Err(ConfigError::InvalidSetting { field: f, .. }) if f == field
                ),
                "{toml}"
            );
        }

        let config = EngineConfig::from_toml("[processor]\nspeed_of_sound = 1500.0\n").unwrap();
        assert_eq!(config.processor.speed_of_sound, 1500.0);
    }

    #[test]
    fn malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml("preferred_backends = 3"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = EngineConfig::default();
        config.backends.insert(
            "openal".into(),
            BackendSection {
                max_sources: Some(16),
                ..BackendSection::default()
            },
        );
        let reparsed = EngineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, reparsed);
    }
}
