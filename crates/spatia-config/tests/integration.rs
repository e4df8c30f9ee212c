//! Integration tests for spatia-config.
//!
//! These tests exercise config and catalog files on disk.

use spatia_config::{
    CatalogStore, ConfigError, EngineConfig, ProfileCatalog, ProfileStore, factory_catalog,
};
use spatia_core::AudioProfile;
use tempfile::TempDir;

#[test]
fn config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = EngineConfig {
        preferred_backends: vec!["openal".into()],
        ..EngineConfig::default()
    };
    config.processor.speed_of_sound = 340.0;
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_config_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, EngineConfig::default());

    assert!(EngineConfig::load(dir.path().join("absent.toml"))
        .unwrap_err()
        .is_not_found());
}

#[test]
fn invalid_config_is_not_masked_by_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "preferred_backends = [\"dsound\"]\n").unwrap();
    assert!(matches!(
        EngineConfig::load_or_default(&path),
        Err(ConfigError::UnknownBackend(_))
    ));
}

#[test]
fn relative_catalog_path_resolves_next_to_config() {
    let dir = TempDir::new().unwrap();
    let catalog = ProfileCatalog {
        operators: vec![
            AudioProfile::new("Recruit")
                .with_frequency_range(300.0, 2000.0)
                .with_volume_db(-15.0),
        ],
        maps: Vec::new(),
    };
    catalog.save(dir.path().join("profiles.toml")).unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "profiles = \"profiles.toml\"\n",
    )
    .unwrap();

    let config = EngineConfig::load(dir.path().join("config.toml")).unwrap();
    assert_eq!(
        config.profiles.as_deref(),
        Some(dir.path().join("profiles.toml").as_path())
    );

    let store = config.profile_store().unwrap();
    assert!(store.lookup_operator_profile("Recruit").is_some());
    assert!(store.lookup_operator_profile("Ash").is_some());
}

#[test]
fn user_catalog_cannot_shadow_factory_profiles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profiles.toml");
    let catalog = ProfileCatalog {
        operators: vec![AudioProfile::new("Ash")],
        maps: Vec::new(),
    };
    catalog.save(&path).unwrap();

    assert!(matches!(
        CatalogStore::factory_with(&path),
        Err(ConfigError::DuplicateProfile(id)) if id == "Ash"
    ));
}

#[test]
fn catalog_file_roundtrip_preserves_lookups() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("factory_copy.toml");
    factory_catalog().unwrap().save(&path).unwrap();

    let from_disk = CatalogStore::load(&path).unwrap();
    let embedded = CatalogStore::factory().unwrap();
    assert_eq!(from_disk.operator_ids(), embedded.operator_ids());
    assert_eq!(from_disk.map_ids(), embedded.map_ids());
    for id in embedded.map_ids() {
        for zone in embedded.map_zones(&id) {
            assert_eq!(
                from_disk.lookup_map_profile(&id, Some(&zone)),
                embedded.lookup_map_profile(&id, Some(&zone)),
            );
        }
    }
}

#[test]
fn unreadable_catalog_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = CatalogStore::load(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.toml"), "got: {err}");
}

#[test]
fn factory_maps_have_ambient_sounds() {
    let store = CatalogStore::factory().unwrap();
    for id in store.map_ids() {
        assert!(!store.ambient_sounds(&id, None).is_empty(), "{id}");
        let ambient = store.lookup_map_profile(&id, None).unwrap();
        assert!(!ambient.directional);
    }
}
