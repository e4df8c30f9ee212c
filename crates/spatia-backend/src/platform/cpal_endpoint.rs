//! cpal-backed spatial endpoint.
//!
//! Probes the host's output device through [cpal](https://crates.io/crates/cpal)
//! (ALSA, CoreAudio, WASAPI) and renders objects with the shared panner over
//! the device's default channel layout.

use cpal::traits::{DeviceTrait, HostTrait};

use super::endpoint::{
    DEFAULT_MAX_OBJECTS, EndpointFormat, EndpointSession, PannerSession, SpatialEndpoint,
};
use crate::error::DriverError;

fn device_name(device: &cpal::Device) -> Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Endpoint over the platform's default cpal host.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpalEndpoint;

impl CpalEndpoint {
    /// Create an endpoint over the default host.
    pub fn new() -> Self {
        Self
    }

    fn find_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device, DriverError> {
        match name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = host
                    .output_devices()
                    .map_err(|e| DriverError::Device(e.to_string()))?;
                for device in devices {
                    if let Ok(dev_name) = device_name(&device)
                        && dev_name.to_lowercase().contains(&search_lower)
                    {
                        return Ok(device);
                    }
                }
                Err(DriverError::Device(format!(
                    "no output device matching '{search}'"
                )))
            }
            None => host
                .default_output_device()
                .ok_or_else(|| DriverError::Device("no default output device".into())),
        }
    }
}

impl SpatialEndpoint for CpalEndpoint {
    fn name(&self) -> &str {
        "cpal"
    }

    fn open(&self, device: Option<&str>) -> Result<Box<dyn EndpointSession>, DriverError> {
        let host = cpal::default_host();
        let device = Self::find_device(&host, device)?;
        let name = device_name(&device).unwrap_or_else(|_| "unknown".to_owned());
        let config = device
            .default_output_config()
            .map_err(|e| DriverError::Device(e.to_string()))?;

        let channels = config.channels();
        let format = EndpointFormat {
            sample_rate: config.sample_rate(),
            channels,
            height_channels: if channels >= 10 { 4 } else { 0 },
            max_dynamic_objects: DEFAULT_MAX_OBJECTS,
        };
        tracing::info!(
            host = host.id().name(),
            device = %name,
            channels,
            sample_rate = format.sample_rate,
            "spatial endpoint opened"
        );
        Ok(Box::new(PannerSession::new(name, format)))
    }
}
