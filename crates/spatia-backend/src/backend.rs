//! Pluggable spatial backend abstraction.
//!
//! This module defines the [`SpatialBackend`] trait, which decouples request
//! handling from any specific spatial audio API. Every backend produces the
//! same generic parameters through [`SpatialProcessor`](spatia_core::SpatialProcessor) and may add native
//! refinements on top.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │          BackendManager          │
//! │   (registry, active handle)      │
//! └──────────────┬───────────────────┘
//!                │ uses SpatialBackend trait
//!                ▼
//! ┌──────────────────────────────────┐
//! │       SpatialBackend trait       │
//! │  initialize / process / shutdown │
//! └──────────────┬───────────────────┘
//!                │ implemented by
//!     ┌──────────┼──────────────┐
//!     ▼          ▼              ▼
//! ┌────────┐ ┌──────────┐ ┌──────────────┐
//! │  Null  │ │  OpenAL  │ │   Platform   │
//! │ (none) │ │ AlDriver │ │SpatialEndpoint│
//! └────────┘ └──────────┘ └──────────────┘
//! ```
//!
//! ## Object Safety
//!
//! The trait is object-safe and takes `&self` everywhere, so backends are shared
//! as `Arc<dyn SpatialBackend>` and guard their native state with interior
//! mutability. A request may be processed while the manager is switching to
//! another backend; the old backend's `shutdown` waits for in-flight calls.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use spatia_core::{ProcessedAudioResult, ProcessorSettings, Result, SpatialError, SpatialRequest};

/// Family of a backend implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Pure computation without native rendering.
    None,
    /// OpenAL-style positional audio.
    #[serde(rename = "openal")]
    OpenAl,
    /// Operating-system object-based spatial audio.
    PlatformNative,
    /// Any third-party backend.
    Custom,
}

impl BackendKind {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::None => "none",
            BackendKind::OpenAl => "openal",
            BackendKind::PlatformNative => "platform_native",
            BackendKind::Custom => "custom",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static feature set a backend declares.
///
/// Capabilities never require device access to query and do not change over a
/// backend's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendCapabilities {
    /// Native 3D positioning.
    pub spatial_positioning: bool,
    /// Head-related transfer function rendering.
    pub hrtf: bool,
    /// Native reverb.
    pub reverb: bool,
    /// Native occlusion filtering.
    pub occlusion: bool,
    /// Doppler shift from relative motion.
    pub doppler: bool,
    /// Height rendering.
    pub elevation: bool,
    /// Directional (coned) sources.
    pub directional_sources: bool,
    /// Native distance attenuation.
    pub distance_attenuation: bool,
    /// Low-latency processing suitable for per-frame use.
    pub real_time_processing: bool,
    /// Native voice/object limit; `None` when unbounded.
    pub max_sources: Option<u32>,
}

impl BackendCapabilities {
    /// Capabilities of a backend that renders nothing natively.
    pub const fn none() -> Self {
        Self {
            spatial_positioning: false,
            hrtf: false,
            reverb: false,
            occlusion: false,
            doppler: false,
            elevation: false,
            directional_sources: false,
            distance_attenuation: false,
            real_time_processing: false,
            max_sources: None,
        }
    }

    /// Names of every supported feature, in declaration order.
    pub fn supported(&self) -> Vec<&'static str> {
        [
            ("spatial_positioning", self.spatial_positioning),
            ("hrtf", self.hrtf),
            ("reverb", self.reverb),
            ("occlusion", self.occlusion),
            ("doppler", self.doppler),
            ("elevation", self.elevation),
            ("directional_sources", self.directional_sources),
            ("distance_attenuation", self.distance_attenuation),
            ("real_time_processing", self.real_time_processing),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

/// Descriptive metadata for a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Unique identifier used for selection (e.g. `"openal"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Implementation family.
    pub kind: BackendKind,
    /// Backend version.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Declared capabilities.
    pub capabilities: BackendCapabilities,
}

/// Settings handed to [`SpatialBackend::initialize`].
///
/// ## Fields
///
/// - `processor`: constants for the generic math (speed of sound, occlusion
///   penalty, audibility floor)
/// - `device`: optional output device name filter (system default if `None`)
/// - `max_sources`: optional cap below the backend's native voice limit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendConfig {
    /// Processor constants.
    pub processor: ProcessorSettings,
    /// Output device name filter.
    pub device: Option<String>,
    /// Voice limit override.
    pub max_sources: Option<u32>,
}

impl BackendConfig {
    /// Effective voice limit given the backend's native limit.
    pub fn voice_limit(&self, native: Option<u32>) -> Option<u32> {
        match (self.max_sources, native) {
            (Some(cap), Some(native)) => Some(cap.min(native)),
            (Some(cap), None) => Some(cap),
            (None, native) => native,
        }
    }
}

/// Pluggable spatial audio backend.
///
/// ## Lifecycle
///
/// 1. Registered with the manager (uninitialized, no native resources)
/// 2. `initialize` acquires native resources; repeated calls are no-ops
/// 3. `process` serves requests
/// 4. `shutdown` releases everything and is always safe to call
///
/// ## Implementing a Custom Backend
///
/// ```rust
/// use parking_lot::Mutex;
/// use spatia_backend::{
///     BackendCapabilities, BackendConfig, BackendDescriptor, BackendKind, SpatialBackend,
/// };
/// use spatia_core::{
///     ProcessOptions, ProcessedAudioResult, Result, SpatialError, SpatialProcessor,
///     SpatialRequest,
/// };
///
/// #[derive(Default)]
/// struct Logger {
///     processor: Mutex<Option<SpatialProcessor>>,
/// }
///
/// impl SpatialBackend for Logger {
///     fn descriptor(&self) -> BackendDescriptor {
///         BackendDescriptor {
///             id: "logger".into(),
///             name: "Logger".into(),
///             kind: BackendKind::Custom,
///             version: "0.1.0".into(),
///             description: "Prints every request".into(),
///             capabilities: BackendCapabilities::none(),
///         }
///     }
///     fn id(&self) -> &str { "logger" }
///     fn initialize(&self, config: &BackendConfig) -> Result<()> {
///         *self.processor.lock() = Some(SpatialProcessor::new(config.processor));
///         Ok(())
///     }
///     fn shutdown(&self) { *self.processor.lock() = None; }
///     fn is_initialized(&self) -> bool { self.processor.lock().is_some() }
///     fn process(&self, request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult> {
///         let guard = self.processor.lock();
///         let processor = guard
///             .as_ref()
///             .ok_or_else(|| SpatialError::unsupported("logger is not initialized"))?;
///         let mut result = processor.process(request, ProcessOptions::default())?;
///         result.backend = "logger".into();
///         println!("{} at {:.1}", request.profile.id, result.distance);
///         Ok(result)
///     }
/// }
/// ```
pub trait SpatialBackend: Send + Sync {
    /// Descriptive metadata, including capabilities.
    fn descriptor(&self) -> BackendDescriptor;

    /// Unique identifier (matches `descriptor().id`).
    fn id(&self) -> &str;

    /// Acquire native resources.
    ///
    /// Idempotent when already initialized. On failure nothing may remain
    /// acquired.
    fn initialize(&self, config: &BackendConfig) -> Result<()>;

    /// Release every native resource.
    ///
    /// Safe to call when never initialized or after a failed initialization.
    fn shutdown(&self);

    /// Whether `initialize` has succeeded and `shutdown` has not been called since.
    fn is_initialized(&self) -> bool;

    /// Declared capabilities. Never touches the device.
    fn capabilities(&self) -> BackendCapabilities {
        self.descriptor().capabilities
    }

    /// Compute spatial parameters for one request.
    ///
    /// Fails with `UnsupportedOperation` when the backend is not initialized.
    fn process(&self, request: &SpatialRequest<'_>) -> Result<ProcessedAudioResult>;

    /// Vendor, renderer, and device format strings once initialized.
    fn runtime_info(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

impl fmt::Debug for dyn SpatialBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialBackend")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

/// Error for a `process` call on a backend that is not initialized.
pub(crate) fn not_initialized(id: &str) -> SpatialError {
    SpatialError::unsupported(format!("backend '{id}' is not initialized"))
}
