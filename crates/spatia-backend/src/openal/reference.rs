//! In-memory OpenAL runtime.
//!
//! [`ReferenceAlDriver`] keeps device, context, and source state in process
//! and renders with the equations in [`super::model`]. It backs tests and
//! hosts that want the OpenAL adapter's parameter mapping without a sound card.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::driver::{
    AlDriver, AlListener, AlSource, ContextId, DeviceId, DistanceModel, SourceId,
};
use super::model::rendered_gain;
use crate::error::DriverError;

/// Name of the single output device the reference runtime exposes.
pub const REFERENCE_DEVICE_NAME: &str = "Reference Output";

#[derive(Debug, Default)]
struct ContextState {
    device: u32,
    model: DistanceModel,
    listener: AlListener,
    sources: BTreeMap<u32, AlSource>,
}

#[derive(Debug, Default)]
struct DriverState {
    next_handle: u32,
    probed: bool,
    devices: BTreeMap<u32, String>,
    contexts: BTreeMap<u32, ContextState>,
}

impl DriverState {
    fn allocate(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn context(&mut self, context: ContextId) -> Result<&mut ContextState, DriverError> {
        self.contexts
            .get_mut(&context.0)
            .ok_or_else(|| DriverError::InvalidHandle(format!("context {}", context.0)))
    }
}

/// Software OpenAL 1.1 runtime with one output device.
#[derive(Debug)]
pub struct ReferenceAlDriver {
    available: bool,
    state: Mutex<DriverState>,
}

impl ReferenceAlDriver {
    /// Runtime that comes up.
    pub fn new() -> Self {
        Self {
            available: true,
            state: Mutex::new(DriverState::default()),
        }
    }

    /// Runtime whose probe reports the library as missing.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Number of live sources across every context.
    pub fn live_sources(&self) -> usize {
        self.state
            .lock()
            .contexts
            .values()
            .map(|c| c.sources.len())
            .sum()
    }

    /// Number of open devices.
    pub fn open_devices(&self) -> usize {
        self.state.lock().devices.len()
    }
}

impl Default for ReferenceAlDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AlDriver for ReferenceAlDriver {
    fn name(&self) -> &str {
        "reference-openal"
    }

    fn probe(&self) -> Result<(), DriverError> {
        if !self.available {
            return Err(DriverError::RuntimeMissing(
                "reference runtime disabled".into(),
            ));
        }
        self.state.lock().probed = true;
        Ok(())
    }

    fn open_device(&self, name: Option<&str>) -> Result<DeviceId, DriverError> {
        let mut state = self.state.lock();
        if !state.probed {
            return Err(DriverError::Device("runtime not probed".into()));
        }
        if let Some(search) = name
            && !REFERENCE_DEVICE_NAME
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return Err(DriverError::Device(format!(
                "no output device matching '{search}'"
            )));
        }
        let id = state.allocate();
        state.devices.insert(id, REFERENCE_DEVICE_NAME.to_owned());
        Ok(DeviceId(id))
    }

    fn close_device(&self, device: DeviceId) {
        let mut state = self.state.lock();
        state.contexts.retain(|_, ctx| ctx.device != device.0);
        state.devices.remove(&device.0);
    }

    fn create_context(&self, device: DeviceId) -> Result<ContextId, DriverError> {
        let mut state = self.state.lock();
        if !state.devices.contains_key(&device.0) {
            return Err(DriverError::InvalidHandle(format!("device {}", device.0)));
        }
        let id = state.allocate();
        state.contexts.insert(
            id,
            ContextState {
                device: device.0,
                ..ContextState::default()
            },
        );
        Ok(ContextId(id))
    }

    fn destroy_context(&self, context: ContextId) {
        self.state.lock().contexts.remove(&context.0);
    }

    fn set_distance_model(
        &self,
        context: ContextId,
        model: DistanceModel,
    ) -> Result<(), DriverError> {
        self.state.lock().context(context)?.model = model;
        Ok(())
    }

    fn set_listener(&self, context: ContextId, listener: &AlListener) -> Result<(), DriverError> {
        self.state.lock().context(context)?.listener = *listener;
        Ok(())
    }

    fn gen_source(&self, context: ContextId) -> Result<SourceId, DriverError> {
        let mut state = self.state.lock();
        state.context(context)?;
        let id = state.allocate();
        state
            .context(context)?
            .sources
            .insert(id, AlSource::default());
        Ok(SourceId(id))
    }

    fn delete_source(&self, context: ContextId, source: SourceId) {
        if let Ok(ctx) = self.state.lock().context(context) {
            ctx.sources.remove(&source.0);
        }
    }

    fn set_source(
        &self,
        context: ContextId,
        source: SourceId,
        params: &AlSource,
    ) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let slot = state
            .context(context)?
            .sources
            .get_mut(&source.0)
            .ok_or_else(|| DriverError::InvalidHandle(format!("source {}", source.0)))?;
        *slot = *params;
        Ok(())
    }

    fn effective_gain(&self, context: ContextId, source: SourceId) -> Result<f32, DriverError> {
        let mut state = self.state.lock();
        let ctx = state.context(context)?;
        let src = ctx
            .sources
            .get(&source.0)
            .ok_or_else(|| DriverError::InvalidHandle(format!("source {}", source.0)))?;
        Ok(rendered_gain(
            ctx.model,
            src,
            ctx.listener.position,
            ctx.listener.gain,
        ))
    }

    fn info(&self, context: ContextId) -> BTreeMap<String, String> {
        let state = self.state.lock();
        let mut info = BTreeMap::new();
        info.insert("vendor".to_owned(), "spatia".to_owned());
        info.insert(
            "renderer".to_owned(),
            "OpenAL 1.1 reference model".to_owned(),
        );
        info.insert("version".to_owned(), "1.1".to_owned());
        if let Some(device) = state
            .contexts
            .get(&context.0)
            .and_then(|ctx| state.devices.get(&ctx.device))
        {
            info.insert("device".to_owned(), device.clone());
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatia_core::Vec3;

    fn loaded() -> ReferenceAlDriver {
        let driver = ReferenceAlDriver::new();
        driver.probe().unwrap();
        driver
    }

    #[test]
    fn unavailable_runtime_is_missing() {
        let driver = ReferenceAlDriver::unavailable();
        assert!(matches!(
            driver.probe(),
            Err(DriverError::RuntimeMissing(_))
        ));
        assert!(driver.open_device(None).is_err());
    }

    #[test]
    fn lifecycle_tracks_handles() {
        let driver = loaded();
        let device = driver.open_device(Some("reference")).unwrap();
        let context = driver.create_context(device).unwrap();
        let source = driver.gen_source(context).unwrap();
        assert_eq!(driver.live_sources(), 1);
        assert_eq!(driver.info(context).get("device").unwrap(), REFERENCE_DEVICE_NAME);

        driver.delete_source(context, source);
        assert_eq!(driver.live_sources(), 0);
        driver.destroy_context(context);
        driver.close_device(device);
        assert_eq!(driver.open_devices(), 0);
        assert!(driver.gen_source(context).is_err());
    }

    #[test]
    fn unknown_device_name_is_rejected() {
        let driver = loaded();
        assert!(matches!(
            driver.open_device(Some("HDMI")),
            Err(DriverError::Device(_))
        ));
    }

    #[test]
    fn effective_gain_follows_listener_and_model() {
        let driver = loaded();
        let device = driver.open_device(None).unwrap();
        let context = driver.create_context(device).unwrap();
        let source = driver.gen_source(context).unwrap();

        driver
            .set_source(
                context,
                source,
                &AlSource {
                    position: Vec3::new(0.0, 0.0, 4.0),
                    gain: 0.5,
                    max_distance: 100.0,
                    ..AlSource::default()
                },
            )
            .unwrap();
        let gain = driver.effective_gain(context, source).unwrap();
        assert!((gain - 0.125).abs() < 1e-6);

        driver
            .set_distance_model(context, DistanceModel::None)
            .unwrap();
        assert!((driver.effective_gain(context, source).unwrap() - 0.5).abs() < 1e-6);
    }
}
