//! Spatial output endpoints.
//!
//! An endpoint stands for an OS spatial audio device. Opening it yields an
//! [`EndpointSession`] that knows the device format and renders dynamic
//! objects into per-channel gains.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use spatia_core::Vec3;

use crate::error::DriverError;

/// Sample rate reported by endpoints that do not probe hardware.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default dynamic object limit.
pub const DEFAULT_MAX_OBJECTS: u32 = 128;

/// Directivity pattern of a spatial object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directivity {
    /// Radiates equally in every direction.
    Omnidirectional,
    /// Heart-shaped front-facing pattern.
    Cardioid,
}

impl Directivity {
    /// Display label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Directivity::Omnidirectional => "Omnidirectional",
            Directivity::Cardioid => "Cardioid",
        }
    }
}

/// Negotiated device format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Total channel count, height channels included.
    pub channels: u16,
    /// Number of overhead channels.
    pub height_channels: u16,
    /// Maximum simultaneous dynamic objects.
    pub max_dynamic_objects: u32,
}

impl EndpointFormat {
    /// Format with the given layout and the default rate and object limit.
    pub const fn new(channels: u16, height_channels: u16) -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels,
            height_channels,
            max_dynamic_objects: DEFAULT_MAX_OBJECTS,
        }
    }

    /// Conventional layout label ("Stereo", "7.1.4", ...).
    pub fn layout_label(&self) -> String {
        match (self.channels, self.height_channels) {
            (1, 0) => "Mono".to_owned(),
            (2, 0) => "Stereo".to_owned(),
            (6, 0) => "5.1".to_owned(),
            (8, 0) => "7.1".to_owned(),
            (10, 4) => "5.1.4".to_owned(),
            (12, 4) => "7.1.4".to_owned(),
            (channels, 0) => format!("{channels}ch"),
            (channels, height) => format!("{channels}ch+{height}h"),
        }
    }
}

/// One dynamic object to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialObject {
    /// Listener-relative position on the unit sphere: +X right, +Y up, +Z ahead.
    pub position: Vec3,
    /// Linear volume, 0..1.
    pub volume: f32,
    /// Radiation pattern.
    pub directivity: Directivity,
}

/// Gains an object contributes to the bed and height layers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelGains {
    /// Left bed gain.
    pub left: f32,
    /// Right bed gain.
    pub right: f32,
    /// Combined height-layer gain.
    pub height: f32,
}

impl ChannelGains {
    /// Pan position implied by the bed gains, -1..1.
    pub fn pan(&self) -> f32 {
        let l2 = self.left * self.left;
        let r2 = self.right * self.right;
        let total = l2 + r2;
        if total <= f32::EPSILON {
            0.0
        } else {
            ((r2 - l2) / total).clamp(-1.0, 1.0)
        }
    }
}

/// Opened spatial device.
pub trait EndpointSession: Send {
    /// Device name.
    fn device_name(&self) -> &str;

    /// Negotiated format.
    fn format(&self) -> &EndpointFormat;

    /// Render one object and return its channel gains.
    fn render_object(&mut self, object: &SpatialObject) -> Result<ChannelGains, DriverError>;
}

/// OS spatial audio endpoint.
pub trait SpatialEndpoint: Send + Sync {
    /// Endpoint name for logs.
    fn name(&self) -> &str;

    /// Open the default device, or the first whose name contains `device`.
    fn open(&self, device: Option<&str>) -> Result<Box<dyn EndpointSession>, DriverError>;
}

/// Equal-power object panner.
///
/// Upward elevation moves energy from the bed into the height layer when the
/// format has height channels; without them the whole object stays in the bed.
pub fn pan_object(format: &EndpointFormat, object: &SpatialObject) -> ChannelGains {
    let volume = object.volume.clamp(0.0, 1.0);
    let (bed, height) = if format.height_channels > 0 {
        let lift = object.position.y.clamp(0.0, 1.0);
        (volume * libm::sqrtf(1.0 - lift * lift), volume * lift)
    } else {
        (volume, 0.0)
    };
    if format.channels < 2 {
        return ChannelGains {
            left: bed,
            right: bed,
            height,
        };
    }
    let theta = (object.position.x.clamp(-1.0, 1.0) + 1.0) * core::f32::consts::FRAC_PI_4;
    ChannelGains {
        left: bed * libm::cosf(theta),
        right: bed * libm::sinf(theta),
        height,
    }
}

/// Session that pans objects in software over a known format.
pub(crate) struct PannerSession {
    device_name: String,
    format: EndpointFormat,
    open_sessions: Option<Arc<AtomicUsize>>,
}

impl PannerSession {
    pub(crate) fn new(device_name: String, format: EndpointFormat) -> Self {
        Self {
            device_name,
            format,
            open_sessions: None,
        }
    }

    fn tracked(mut self, counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        self.open_sessions = Some(Arc::clone(counter));
        self
    }
}

impl Drop for PannerSession {
    fn drop(&mut self) {
        if let Some(counter) = &self.open_sessions {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl EndpointSession for PannerSession {
    fn device_name(&self) -> &str {
        &self.device_name
    }

    fn format(&self) -> &EndpointFormat {
        &self.format
    }

    fn render_object(&mut self, object: &SpatialObject) -> Result<ChannelGains, DriverError> {
        if !object.position.is_finite() || !object.volume.is_finite() {
            return Err(DriverError::Source("object parameters must be finite".into()));
        }
        Ok(pan_object(&self.format, object))
    }
}

/// Name of the device a [`VirtualEndpoint`] exposes.
pub const VIRTUAL_DEVICE_NAME: &str = "Virtual Spatial Output";

/// Software endpoint with a fixed speaker layout.
///
/// Useful for headless hosts and tests: it always opens and renders with the
/// same panner a hardware endpoint uses.
#[derive(Debug, Clone)]
pub struct VirtualEndpoint {
    format: EndpointFormat,
    open_sessions: Arc<AtomicUsize>,
}

impl VirtualEndpoint {
    /// Endpoint with the given format.
    pub fn new(format: EndpointFormat) -> Self {
        Self {
            format,
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Two-channel endpoint.
    pub fn stereo() -> Self {
        Self::new(EndpointFormat::new(2, 0))
    }

    /// 7.1.4 endpoint.
    pub fn surround_7_1_4() -> Self {
        Self::new(EndpointFormat::new(12, 4))
    }

    /// Number of sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

impl SpatialEndpoint for VirtualEndpoint {
    fn name(&self) -> &str {
        "virtual"
    }

    fn open(&self, device: Option<&str>) -> Result<Box<dyn EndpointSession>, DriverError> {
        if let Some(search) = device
            && !VIRTUAL_DEVICE_NAME
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return Err(DriverError::Device(format!(
                "no spatial device matching '{search}'"
            )));
        }
        let session = PannerSession::new(VIRTUAL_DEVICE_NAME.to_owned(), self.format.clone())
            .tracked(&self.open_sessions);
        Ok(Box::new(session))
    }
}

/// Endpoint for hosts without a spatial audio platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEndpoint;

impl SpatialEndpoint for UnavailableEndpoint {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn open(&self, _device: Option<&str>) -> Result<Box<dyn EndpointSession>, DriverError> {
        Err(DriverError::RuntimeMissing(
            "spatial audio platform not available in this build".into(),
        ))
    }
}
