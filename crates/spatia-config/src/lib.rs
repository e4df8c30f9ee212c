//! Configuration and audio profile catalogs for spatia.
//!
//! # Features
//!
//! - **Engine config**: [`EngineConfig`] TOML with processor constants,
//!   backend preference order, and per-backend settings
//! - **Profile store**: the [`ProfileStore`] lookup service and its
//!   catalog-backed implementation [`CatalogStore`]
//! - **Catalogs**: [`ProfileCatalog`] TOML with operators and map acoustics,
//!   plus the embedded factory catalog
//! - **Validation**: range checks applied when a store is built
//! - **Paths**: platform-specific config directories
//!
//! # Example
//!
//! ```rust
//! use spatia_config::{CatalogStore, ProfileStore};
//!
//! let store = CatalogStore::factory().unwrap();
//! let ash = store.lookup_operator_profile("Ash").unwrap();
//! assert_eq!(ash.base_volume_db, -18.0);
//!
//! let lobby = store.lookup_map_profile("Bank", Some("lobby")).unwrap();
//! assert_eq!(lobby.reverb_amount, 0.8);
//! ```

mod catalog;
mod engine_config;
mod error;
mod store;

/// Factory profile catalog bundled with the library.
pub mod factory_catalog;

/// Platform-specific configuration paths.
#[cfg(feature = "std")]
pub mod paths;

/// Profile and map validation.
pub mod validation;

pub use catalog::{
    ALL_ZONES, AMBIENT_FALLOFF, AMBIENT_REVERB, AMBIENT_SOUND_OCCLUSION, AmbientSound,
    EXTERIOR_ZONE, INTERIOR_ZONE, MapAcoustics, ProfileCatalog, ReverbZone, SpatialZone,
};
pub use engine_config::{BackendSection, EngineConfig, KNOWN_BACKENDS};
pub use error::ConfigError;
pub use factory_catalog::{FACTORY_CATALOG_TOML, factory_catalog};
pub use store::{CatalogStore, ProfileStore};
pub use validation::{ValidationError, ValidationResult, validate_map, validate_profile};
