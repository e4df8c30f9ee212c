//! Factory profile catalog bundled with spatia.
//!
//! The catalog is embedded at compile time so the engine always has profiles
//! to resolve, even without a user catalog on disk.

use crate::ConfigError;
use crate::catalog::ProfileCatalog;

/// TOML source of the factory catalog.
pub static FACTORY_CATALOG_TOML: &str = include_str!("../catalog/factory.toml");

/// Parse the factory catalog.
pub fn factory_catalog() -> Result<ProfileCatalog, ConfigError> {
    ProfileCatalog::from_toml(FACTORY_CATALOG_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_map, validate_profile};

    #[test]
    fn factory_catalog_parses_and_validates() {
        let catalog = factory_catalog().expect("factory catalog should parse");
        assert_eq!(catalog.operators.len(), 31);
        assert_eq!(catalog.maps.len(), 8);
        for op in &catalog.operators {
            validate_profile(op).unwrap_or_else(|e| panic!("{}: {e}", op.id));
        }
        for map in &catalog.maps {
            validate_map(map).unwrap_or_else(|e| panic!("{}: {e}", map.id));
        }
    }

    #[test]
    fn caveira_is_not_directional() {
        let catalog = factory_catalog().unwrap();
        let caveira = catalog
            .operators
            .iter()
            .find(|p| p.id == "Caveira")
            .unwrap();
        assert!(!caveira.directional);
        assert_eq!(caveira.base_volume_db, -25.0);
        assert!(
            catalog
                .operators
                .iter()
                .filter(|p| p.id != "Caveira")
                .all(|p| p.directional)
        );
    }

    #[test]
    fn every_operator_has_modifiers_and_cues() {
        for op in factory_catalog().unwrap().operators {
            assert!(op.modifiers.is_some(), "{}", op.id);
            assert!(!op.cues.is_empty(), "{}", op.id);
        }
    }
}
