//! Spatia Engine - spatial audio processing facade
//!
//! [`SpatialEngine`] composes a [`BackendManager`](spatia_registry::BackendManager)
//! with a [`ProfileStore`](spatia_config::ProfileStore) and exposes the
//! operations a request/response wrapper needs:
//!
//! | Operation | Returns |
//! |-----------|---------|
//! | [`list_backends`](SpatialEngine::list_backends) | [`BackendListing`] per registered backend |
//! | [`get_capabilities`](SpatialEngine::get_capabilities) | [`CapabilitiesReport`] |
//! | [`configure_backend`](SpatialEngine::configure_backend) | [`ConfigureOutcome`] |
//! | [`process_spatial_audio`](SpatialEngine::process_spatial_audio) | [`ProcessedAudioResult`](spatia_core::ProcessedAudioResult) |
//!
//! Inputs and outputs are serde types; errors convert to [`ErrorReport`]
//! with a stable `error_kind`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use spatia_config::CatalogStore;
//! use spatia_core::{Orientation, Vec3};
//! use spatia_engine::{ProcessSpatialAudio, SpatialEngine};
//!
//! let engine = SpatialEngine::new(Arc::new(CatalogStore::factory().unwrap()));
//!
//! let request = ProcessSpatialAudio::new("Thermite", Vec3::new(10.0, 2.0, 5.0), Vec3::new(0.0, 2.0, 0.0))
//!     .with_orientation(Orientation::new(45.0, 0.0, 0.0))
//!     .on_map("Bank", Some("lobby"));
//! let result = engine.process_spatial_audio(&request).unwrap();
//! assert_eq!(result.backend, "none");
//! assert!((result.relative_angle_deg - 18.43).abs() < 0.01);
//!
//! let outcome = engine.configure_backend("quantum");
//! assert!(!outcome.success);
//! assert_eq!(outcome.active_backend, "none");
//! ```

mod api;
mod engine;

pub use api::{
    BackendListing, CapabilitiesReport, ConfigureOutcome, ErrorReport, MapContext,
    ProcessSpatialAudio,
};
pub use engine::SpatialEngine;
