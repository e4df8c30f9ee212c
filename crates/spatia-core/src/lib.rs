//! Spatia Core - spatial audio data model and parameter math
//!
//! This crate holds everything the spatia engine needs that does not depend on a
//! rendering backend: the value types exchanged between callers and backends, and
//! the pure functions that turn a source/listener pose pair into spatial
//! parameters.
//!
//! # Core Abstractions
//!
//! ## Geometry
//!
//! - [`Vec3`] - Finite 3D vector in the engine's frame (+Y up, yaw 0 faces +Z)
//! - [`Orientation`] - Listener yaw/pitch/roll in degrees, normalized to [-180, 180]
//! - [`ListenerPose`] - Listener position plus orientation
//! - [`Motion`] - Previous poses and time step, used for Doppler
//!
//! ## Profiles and Requests
//!
//! - [`AudioProfile`] - Static per-sound metadata (volume, falloff, reverb, occlusion)
//! - [`SpatialRequest`] - One processing call: profile + source + listener
//! - [`ProcessedAudioResult`] - Computed parameters plus backend-specific extras
//!
//! ## Processing
//!
//! - [`SpatialProcessor`] - Stateless processor configured by [`ProcessorSettings`]
//! - Free functions: [`distance`], [`direction`], [`relative_angle_deg`], [`pan`],
//!   [`attenuate_db`], [`occlude_db`], [`doppler_shift`], [`azimuth_elevation`]
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//!
//! # Example
//!
//! ```rust
//! use spatia_core::{
//!     AudioProfile, ListenerPose, Orientation, ProcessOptions, SpatialProcessor,
//!     SpatialRequest, Vec3,
//! };
//!
//! let profile = AudioProfile::new("footsteps").with_volume_db(-12.0);
//! let listener = ListenerPose::new(Vec3::new(0.0, 2.0, 0.0), Orientation::new(45.0, 0.0, 0.0));
//! let request = SpatialRequest::new(&profile, Vec3::new(10.0, 2.0, 5.0), listener);
//!
//! let result = SpatialProcessor::default()
//!     .process(&request, ProcessOptions::default())
//!     .unwrap();
//! assert!((result.distance - 11.18).abs() < 0.01);
//! assert!(result.pan > 0.0); // source is to the listener's right
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for profile strings and
//! the backend parameter map). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! spatia-core = { version = "0.1", default-features = false }
//! ```
//!
//! The `serde` feature implies `std` and derives `Serialize`/`Deserialize` for
//! every public value type.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod math;
pub mod pose;
pub mod processor;
pub mod profile;
pub mod request;
pub mod result;
pub mod vector;

pub use error::{Result, SpatialError};
pub use math::{db_to_linear, linear_to_db};
pub use pose::{
    ListenerBasis, ListenerPose, MIN_MOTION_DT_SECS, Motion, Orientation, normalize_degrees,
};
pub use processor::{
    DEFAULT_OCCLUSION_PENALTY_DB, MAX_COORDINATE, MIN_AUDIBLE_DB, ProcessOptions,
    ProcessorSettings, SPEED_OF_SOUND, SpatialProcessor, attenuate_db, azimuth_elevation,
    direction, distance, doppler_shift, in_world, occlude_db, pan, relative_angle_deg,
    validate_request,
};
pub use profile::{AudioProfile, FrequencyRange, GameplayModifiers};
pub use request::SpatialRequest;
pub use result::{ParamValue, ProcessedAudioResult};
pub use vector::Vec3;
