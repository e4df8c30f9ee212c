//! Audio profile lookup.
//!
//! [`ProfileStore`] is the read-only service the engine resolves profile ids
//! through. [`CatalogStore`] implements it over a validated [`ProfileCatalog`],
//! resolving every map zone variant up front so lookups hand out shared
//! `Arc<AudioProfile>` values without allocating profiles.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use spatia_core::AudioProfile;

use crate::catalog::{MapAcoustics, ProfileCatalog};
use crate::factory_catalog::factory_catalog;
use crate::validation::{validate_map, validate_profile};
use crate::ConfigError;

/// Read-only source of audio profiles.
pub trait ProfileStore: Send + Sync {
    /// Profile of an operator, or `None` if unknown.
    fn lookup_operator_profile(&self, id: &str) -> Option<Arc<AudioProfile>>;

    /// Profile of a map's ambience, optionally for one zone.
    ///
    /// `None` when the map or the zone is unknown.
    fn lookup_map_profile(&self, id: &str, zone: Option<&str>) -> Option<Arc<AudioProfile>>;

    /// Sorted operator identifiers.
    fn operator_ids(&self) -> Vec<String>;

    /// Sorted map identifiers.
    fn map_ids(&self) -> Vec<String>;

    /// Zone names a map resolves.
    fn map_zones(&self, _id: &str) -> Vec<String> {
        Vec::new()
    }

    /// Ambient sounds of a map audible in `zone`.
    fn ambient_sounds(&self, _id: &str, _zone: Option<&str>) -> Vec<Arc<AudioProfile>> {
        Vec::new()
    }
}

/// Key of a resolved map variant.
fn variant_key(map: &str, zone: Option<&str>) -> String {
    match zone {
        Some(zone) => format!("{map}/{zone}"),
        None => map.to_string(),
    }
}

/// [`ProfileStore`] over an in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    operators: BTreeMap<String, Arc<AudioProfile>>,
    maps: BTreeMap<String, MapAcoustics>,
    map_variants: BTreeMap<String, Arc<AudioProfile>>,
}

impl CatalogStore {
    /// Build a store, validating every entry.
    ///
    /// Fails on the first invalid profile or map, or on a repeated id.
    pub fn new(catalog: ProfileCatalog) -> Result<Self, ConfigError> {
        let mut store = Self::default();

        for profile in catalog.operators {
            validate_profile(&profile)?;
            if store.operators.contains_key(&profile.id) {
                return Err(ConfigError::DuplicateProfile(profile.id));
            }
            store.operators.insert(profile.id.clone(), Arc::new(profile));
        }

        for map in catalog.maps {
            validate_map(&map)?;
            if store.maps.contains_key(&map.id) {
                return Err(ConfigError::DuplicateProfile(map.id));
            }
            let zones = std::iter::once(None).chain(map.zone_names().into_iter().map(Some));
            for zone in zones {
                if let Some(profile) = map.zone_profile(zone.as_deref()) {
                    store
                        .map_variants
                        .insert(variant_key(&map.id, zone.as_deref()), Arc::new(profile));
                }
            }
            store.maps.insert(map.id.clone(), map);
        }

        tracing::debug!(
            operators = store.operators.len(),
            maps = store.maps.len(),
            "profile catalog loaded"
        );
        Ok(store)
    }

    /// Store over the embedded factory catalog.
    pub fn factory() -> Result<Self, ConfigError> {
        Self::new(factory_catalog()?)
    }

    /// Store over a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::new(ProfileCatalog::load(path)?)
    }

    /// Store over the factory catalog extended with a catalog file.
    pub fn factory_with(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut catalog = factory_catalog()?;
        catalog.merge(ProfileCatalog::load(path)?)?;
        Self::new(catalog)
    }

    /// Map acoustics by id.
    pub fn map(&self, id: &str) -> Option<&MapAcoustics> {
        self.maps.get(id)
    }
}

impl ProfileStore for CatalogStore {
    fn lookup_operator_profile(&self, id: &str) -> Option<Arc<AudioProfile>> {
        self.operators.get(id).cloned()
    }

    fn lookup_map_profile(&self, id: &str, zone: Option<&str>) -> Option<Arc<AudioProfile>> {
        self.map_variants.get(&variant_key(id, zone)).cloned()
    }

    fn operator_ids(&self) -> Vec<String> {
        self.operators.keys().cloned().collect()
    }

    fn map_ids(&self) -> Vec<String> {
        self.maps.keys().cloned().collect()
    }

    fn map_zones(&self, id: &str) -> Vec<String> {
        self.maps
            .get(id)
            .map(MapAcoustics::zone_names)
            .unwrap_or_default()
    }

    fn ambient_sounds(&self, id: &str, zone: Option<&str>) -> Vec<Arc<AudioProfile>> {
        self.maps
            .get(id)
            .map(|map| map.ambient_profiles(zone).into_iter().map(Arc::new).collect())
            .unwrap_or_default()
    }
}
