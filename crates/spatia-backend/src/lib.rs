//! Spatial audio backends for spatia.
//!
//! This crate defines the [`SpatialBackend`] plugin interface and ships three
//! implementations:
//!
//! - [`NullBackend`] - pure math, always available, the fallback floor
//! - [`OpenAlBackend`] - OpenAL positional audio through an [`AlDriver`]
//! - [`PlatformBackend`] - OS object-based spatial rendering through a
//!   [`SpatialEndpoint`]
//!
//! Native adapters talk to their platform through a driver seam so that the
//! optional native dependency is probed at `initialize` time and a missing
//! runtime surfaces as an ordinary initialization failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use spatia_backend::{BackendConfig, NullBackend, SpatialBackend};
//! use spatia_core::{AudioProfile, ListenerPose, SpatialRequest, Vec3};
//!
//! let backend = NullBackend::new();
//! backend.initialize(&BackendConfig::default()).unwrap();
//!
//! let profile = AudioProfile::new("Thermite");
//! let request = SpatialRequest::new(&profile, Vec3::new(3.0, 0.0, 4.0), ListenerPose::default());
//! let result = backend.process(&request).unwrap();
//! assert_eq!(result.backend, "none");
//! assert!((result.distance - 5.0).abs() < 1e-5);
//! ```
//!
//! ## Features
//!
//! - `cpal`: enables [`CpalEndpoint`](platform::CpalEndpoint), which probes the
//!   host's audio output through cpal. Without it the platform adapter's
//!   default endpoint reports the platform as unavailable.
//! - `openal`: enables `SystemAlDriver`, which loads the host's OpenAL library
//!   at run time. Without it the OpenAL adapter's default driver reports the
//!   runtime as missing.

pub mod backend;
pub mod error;
pub mod null;
pub mod openal;
pub mod platform;

pub use backend::{
    BackendCapabilities, BackendConfig, BackendDescriptor, BackendKind, SpatialBackend,
};
pub use error::DriverError;
pub use null::{NULL_BACKEND_ID, NullBackend};
pub use openal::{
    AlDriver, OPENAL_BACKEND_ID, OpenAlBackend, ReferenceAlDriver, UnavailableAlDriver,
};
#[cfg(feature = "openal")]
pub use openal::SystemAlDriver;
pub use platform::{
    EndpointSession, PLATFORM_BACKEND_ID, PlatformBackend, SpatialEndpoint, VirtualEndpoint,
};
