//! Host OpenAL runtime, loaded at run time.
//!
//! [`SystemAlDriver`] opens the OpenAL library with `libloading` on the first
//! probe and resolves the OpenAL 1.1 entry points the adapter uses. The current
//! context is process-wide, so every AL call runs under the driver lock: make
//! the owning context current, clear the error flag, call, then check
//! `alGetError`.
//!
//! OpenAL cannot report the gain it renders a source at. `effective_gain`
//! reads back the listener, the source, and the distance model as the runtime
//! stored them (after its own range checks) and evaluates the 1.1 gain
//! equations over those values.

#![allow(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

use libloading::Library;
use parking_lot::Mutex;
use spatia_core::Vec3;

use super::driver::{
    AlDriver, AlListener, AlSource, ContextId, DeviceId, DistanceModel, SourceId,
};
use super::model::rendered_gain;
use crate::error::DriverError;

const AL_NO_ERROR: c_int = 0;
const AL_NONE: c_int = 0;
const AL_CONE_INNER_ANGLE: c_int = 0x1001;
const AL_CONE_OUTER_ANGLE: c_int = 0x1002;
const AL_PITCH: c_int = 0x1003;
const AL_POSITION: c_int = 0x1004;
const AL_DIRECTION: c_int = 0x1005;
const AL_VELOCITY: c_int = 0x1006;
const AL_GAIN: c_int = 0x100A;
const AL_ORIENTATION: c_int = 0x100F;
const AL_REFERENCE_DISTANCE: c_int = 0x1020;
const AL_ROLLOFF_FACTOR: c_int = 0x1021;
const AL_CONE_OUTER_GAIN: c_int = 0x1022;
const AL_MAX_DISTANCE: c_int = 0x1023;
const AL_VENDOR: c_int = 0xB001;
const AL_VERSION: c_int = 0xB002;
const AL_RENDERER: c_int = 0xB003;
const AL_DISTANCE_MODEL: c_int = 0xD000;
const AL_INVERSE_DISTANCE: c_int = 0xD001;
const AL_INVERSE_DISTANCE_CLAMPED: c_int = 0xD002;
const ALC_DEVICE_SPECIFIER: c_int = 0x1005;

type AlcOpenDevice = unsafe extern "C" fn(*const c_char) -> *mut c_void;
type AlcCloseDevice = unsafe extern "C" fn(*mut c_void) -> c_char;
type AlcCreateContext = unsafe extern "C" fn(*mut c_void, *const c_int) -> *mut c_void;
type AlcMakeContextCurrent = unsafe extern "C" fn(*mut c_void) -> c_char;
type AlcDestroyContext = unsafe extern "C" fn(*mut c_void);
type AlcGetString = unsafe extern "C" fn(*mut c_void, c_int) -> *const c_char;
type AlcGetError = unsafe extern "C" fn(*mut c_void) -> c_int;
type AlGetError = unsafe extern "C" fn() -> c_int;
type AlGetString = unsafe extern "C" fn(c_int) -> *const c_char;
type AlGetInteger = unsafe extern "C" fn(c_int) -> c_int;
type AlDistanceModelFn = unsafe extern "C" fn(c_int);
type AlListenerf = unsafe extern "C" fn(c_int, f32);
type AlListenerfv = unsafe extern "C" fn(c_int, *const f32);
type AlGetListenerf = unsafe extern "C" fn(c_int, *mut f32);
type AlGetListenerfv = unsafe extern "C" fn(c_int, *mut f32);
type AlGenSources = unsafe extern "C" fn(c_int, *mut u32);
type AlDeleteSources = unsafe extern "C" fn(c_int, *const u32);
type AlSourcef = unsafe extern "C" fn(u32, c_int, f32);
type AlSourcefv = unsafe extern "C" fn(u32, c_int, *const f32);
type AlGetSourcef = unsafe extern "C" fn(u32, c_int, *mut f32);
type AlGetSourcefv = unsafe extern "C" fn(u32, c_int, *mut f32);

/// Library names tried, in order, by [`SystemAlDriver::new`].
pub fn library_candidates() -> Vec<PathBuf> {
    let names: &[&str] = if cfg!(target_os = "windows") {
        &["OpenAL32.dll", "soft_oal.dll"]
    } else if cfg!(target_os = "macos") {
        &[
            "libopenal.1.dylib",
            "libopenal.dylib",
            "/System/Library/Frameworks/OpenAL.framework/OpenAL",
        ]
    } else {
        &["libopenal.so.1", "libopenal.so"]
    };
    names.iter().map(PathBuf::from).collect()
}

macro_rules! symbol {
    ($library:expr, $name:literal, $ty:ty) => {{
        // SAFETY: `$ty` matches the OpenAL 1.1 prototype of `$name`, and the
        // pointer is only called while the library stays loaded.
        let symbol = unsafe { $library.get::<$ty>(concat!($name, "\0").as_bytes()) }
            .map_err(|e| format!("missing {}: {e}", $name))?;
        *symbol
    }};
}

/// Resolved entry points. `_library` is declared last so it unloads after
/// nothing can call through the pointers above it.
struct AlApi {
    alc_open_device: AlcOpenDevice,
    alc_close_device: AlcCloseDevice,
    alc_create_context: AlcCreateContext,
    alc_make_context_current: AlcMakeContextCurrent,
    alc_destroy_context: AlcDestroyContext,
    alc_get_string: AlcGetString,
    alc_get_error: AlcGetError,
    al_get_error: AlGetError,
    al_get_string: AlGetString,
    al_get_integer: AlGetInteger,
    al_distance_model: AlDistanceModelFn,
    al_listenerf: AlListenerf,
    al_listenerfv: AlListenerfv,
    al_get_listenerf: AlGetListenerf,
    al_get_listenerfv: AlGetListenerfv,
    al_gen_sources: AlGenSources,
    al_delete_sources: AlDeleteSources,
    al_sourcef: AlSourcef,
    al_sourcefv: AlSourcefv,
    al_get_sourcef: AlGetSourcef,
    al_get_sourcefv: AlGetSourcefv,
    _library: Library,
}

impl AlApi {
    fn load(path: &Path) -> Result<Self, String> {
        // SAFETY: loading runs the library's initializers; OpenAL runtimes
        // have no preconditions on the loading thread.
        let library = unsafe { Library::new(path) }.map_err(|e| e.to_string())?;
        Ok(Self {
            alc_open_device: symbol!(library, "alcOpenDevice", AlcOpenDevice),
            alc_close_device: symbol!(library, "alcCloseDevice", AlcCloseDevice),
            alc_create_context: symbol!(library, "alcCreateContext", AlcCreateContext),
            alc_make_context_current: symbol!(
                library,
                "alcMakeContextCurrent",
                AlcMakeContextCurrent
            ),
            alc_destroy_context: symbol!(library, "alcDestroyContext", AlcDestroyContext),
            alc_get_string: symbol!(library, "alcGetString", AlcGetString),
            alc_get_error: symbol!(library, "alcGetError", AlcGetError),
            al_get_error: symbol!(library, "alGetError", AlGetError),
            al_get_string: symbol!(library, "alGetString", AlGetString),
            al_get_integer: symbol!(library, "alGetInteger", AlGetInteger),
            al_distance_model: symbol!(library, "alDistanceModel", AlDistanceModelFn),
            al_listenerf: symbol!(library, "alListenerf", AlListenerf),
            al_listenerfv: symbol!(library, "alListenerfv", AlListenerfv),
            al_get_listenerf: symbol!(library, "alGetListenerf", AlGetListenerf),
            al_get_listenerfv: symbol!(library, "alGetListenerfv", AlGetListenerfv),
            al_gen_sources: symbol!(library, "alGenSources", AlGenSources),
            al_delete_sources: symbol!(library, "alDeleteSources", AlDeleteSources),
            al_sourcef: symbol!(library, "alSourcef", AlSourcef),
            al_sourcefv: symbol!(library, "alSourcefv", AlSourcefv),
            al_get_sourcef: symbol!(library, "alGetSourcef", AlGetSourcef),
            al_get_sourcefv: symbol!(library, "alGetSourcefv", AlGetSourcefv),
            _library: library,
        })
    }

    /// ALC string for `device` (null for device-independent strings).
    fn alc_string(&self, device: *mut c_void, param: c_int) -> Option<String> {
        // SAFETY: `device` is null or an open device.
        let raw = unsafe { (self.alc_get_string)(device, param) };
        if raw.is_null() {
            return None;
        }
        // SAFETY: non-null ALC strings are NUL-terminated and owned by the runtime.
        Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    /// Output devices the runtime enumerates.
    fn device_names(&self) -> Vec<String> {
        // SAFETY: a null device asks for the enumeration list.
        let raw = unsafe { (self.alc_get_string)(ptr::null_mut(), ALC_DEVICE_SPECIFIER) };
        if raw.is_null() {
            return Vec::new();
        }
        // SAFETY: the device list is a run of NUL-terminated names ending in an
        // empty one.
        unsafe { device_list(raw) }
    }

    // The remaining helpers need a current context; without one OpenAL
    // ignores the call and raises an error.

    fn al_string(&self, param: c_int) -> Option<String> {
        // SAFETY: `param` is a string query.
        let raw = unsafe { (self.al_get_string)(param) };
        if raw.is_null() {
            return None;
        }
        // SAFETY: non-null AL strings are NUL-terminated and owned by the runtime.
        Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    fn set_listener_f(&self, param: c_int, value: f32) {
        // SAFETY: scalar listener property.
        unsafe { (self.al_listenerf)(param, value) };
    }

    fn set_listener_v(&self, param: c_int, values: &[f32]) {
        // SAFETY: `values` holds as many floats as `param` reads (3, or 6
        // for AL_ORIENTATION).
        unsafe { (self.al_listenerfv)(param, values.as_ptr()) };
    }

    fn listener_f(&self, param: c_int) -> f32 {
        let mut value = 0.0;
        // SAFETY: one float is written.
        unsafe { (self.al_get_listenerf)(param, &mut value) };
        value
    }

    fn listener_v(&self, param: c_int) -> Vec3 {
        let mut values = [0.0; 3];
        // SAFETY: vector listener properties write three floats.
        unsafe { (self.al_get_listenerfv)(param, values.as_mut_ptr()) };
        Vec3::new(values[0], values[1], values[2])
    }

    fn set_source_f(&self, source: u32, param: c_int, value: f32) {
        // SAFETY: scalar source property on a live source.
        unsafe { (self.al_sourcef)(source, param, value) };
    }

    fn set_source_v(&self, source: u32, param: c_int, value: Vec3) {
        let values = value.to_array();
        // SAFETY: vector source properties read three floats.
        unsafe { (self.al_sourcefv)(source, param, values.as_ptr()) };
    }

    fn source_f(&self, source: u32, param: c_int) -> f32 {
        let mut value = 0.0;
        // SAFETY: one float is written.
        unsafe { (self.al_get_sourcef)(source, param, &mut value) };
        value
    }

    fn source_v(&self, source: u32, param: c_int) -> Vec3 {
        let mut values = [0.0; 3];
        // SAFETY: vector source properties write three floats.
        unsafe { (self.al_get_sourcefv)(source, param, values.as_mut_ptr()) };
        Vec3::new(values[0], values[1], values[2])
    }
}

/// Split an ALC device list: NUL-terminated names ending in an empty name.
///
/// # Safety
///
/// `raw` must point to such a list.
unsafe fn device_list(raw: *const c_char) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = raw;
    loop {
        // SAFETY: `cursor` points at the start of a name within the list.
        let name = unsafe { CStr::from_ptr(cursor) };
        if name.is_empty() {
            return names;
        }
        let len = name.to_bytes_with_nul().len();
        names.push(name.to_string_lossy().into_owned());
        // SAFETY: the next name starts right after this one's NUL.
        cursor = unsafe { cursor.add(len) };
    }
}

fn distance_model_code(model: DistanceModel) -> c_int {
    match model {
        DistanceModel::None => AL_NONE,
        DistanceModel::InverseDistance => AL_INVERSE_DISTANCE,
        DistanceModel::InverseDistanceClamped => AL_INVERSE_DISTANCE_CLAMPED,
    }
}

fn distance_model_from_code(code: c_int) -> Option<DistanceModel> {
    match code {
        AL_NONE => Some(DistanceModel::None),
        AL_INVERSE_DISTANCE => Some(DistanceModel::InverseDistance),
        AL_INVERSE_DISTANCE_CLAMPED => Some(DistanceModel::InverseDistanceClamped),
        _ => None,
    }
}

/// ALC device or context pointer.
#[derive(Debug, Clone, Copy)]
struct Raw(NonNull<c_void>);

// SAFETY: ALC handles are process-wide, and every use goes through the
// driver lock.
unsafe impl Send for Raw {}

impl Raw {
    fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

struct OpenDevice {
    raw: Raw,
    name: String,
}

struct OpenContext {
    device: u32,
    raw: Raw,
    sources: BTreeSet<u32>,
}

#[derive(Default)]
struct SystemState {
    api: Option<AlApi>,
    library: Option<PathBuf>,
    next_handle: u32,
    devices: BTreeMap<u32, OpenDevice>,
    contexts: BTreeMap<u32, OpenContext>,
}

impl SystemState {
    fn api(&self) -> Result<&AlApi, DriverError> {
        self.api
            .as_ref()
            .ok_or_else(|| DriverError::Device("runtime not probed".into()))
    }

    fn allocate(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Run `op` with `context` current and map a raised AL error through
    /// `failure`.
    fn with_current<T>(
        &self,
        context: ContextId,
        failure: fn(String) -> DriverError,
        op: impl FnOnce(&AlApi) -> T,
    ) -> Result<T, DriverError> {
        let api = self.api()?;
        let ctx = self
            .contexts
            .get(&context.0)
            .ok_or_else(|| DriverError::InvalidHandle(format!("context {}", context.0)))?;
        // SAFETY: `ctx.raw` is a live context of this runtime.
        if unsafe { (api.alc_make_context_current)(ctx.raw.as_ptr()) } == 0 {
            return Err(DriverError::Context("alcMakeContextCurrent failed".into()));
        }
        // SAFETY: a context is current; reading the flag clears it.
        unsafe { (api.al_get_error)() };
        let value = op(api);
        // SAFETY: the same context is still current.
        let code = unsafe { (api.al_get_error)() };
        if code != AL_NO_ERROR {
            return Err(failure(format!("AL error 0x{code:04X}")));
        }
        Ok(value)
    }
}

fn release_context(api: &AlApi, ctx: &OpenContext) {
    // SAFETY: `ctx.raw` is live until destroyed here, and every name in
    // `ctx.sources` was generated on it.
    unsafe {
        (api.alc_make_context_current)(ctx.raw.as_ptr());
        for source in &ctx.sources {
            (api.al_delete_sources)(1, source);
        }
        (api.alc_make_context_current)(ptr::null_mut());
        (api.alc_destroy_context)(ctx.raw.as_ptr());
    }
}

/// OpenAL runtime installed on the host.
pub struct SystemAlDriver {
    candidates: Vec<PathBuf>,
    state: Mutex<SystemState>,
}

impl SystemAlDriver {
    /// Driver over the platform's usual OpenAL library names.
    pub fn new() -> Self {
        Self::with_candidates(library_candidates())
    }

    /// Driver that tries each library path or name in order.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            state: Mutex::new(SystemState::default()),
        }
    }

    /// Library that was loaded, once probed.
    pub fn library(&self) -> Option<PathBuf> {
        self.state.lock().library.clone()
    }
}

impl Default for SystemAlDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemAlDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SystemAlDriver")
            .field("candidates", &self.candidates)
            .field("library", &state.library)
            .field("devices", &state.devices.len())
            .finish()
    }
}

impl AlDriver for SystemAlDriver {
    fn name(&self) -> &str {
        "system-openal"
    }

    fn probe(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if state.api.is_some() {
            return Ok(());
        }
        let mut failures = Vec::new();
        for candidate in &self.candidates {
            match AlApi::load(candidate) {
                Ok(api) => {
                    tracing::debug!(library = %candidate.display(), "OpenAL runtime loaded");
                    state.api = Some(api);
                    state.library = Some(candidate.clone());
                    return Ok(());
                }
                Err(e) => failures.push(format!("{}: {e}", candidate.display())),
            }
        }
        if failures.is_empty() {
            failures.push("no library candidates".to_owned());
        }
        Err(DriverError::RuntimeMissing(failures.join("; ")))
    }

    fn open_device(&self, name: Option<&str>) -> Result<DeviceId, DriverError> {
        let mut state = self.state.lock();
        let api = state.api()?;
        let specifier = match name {
            None => None,
            Some(search) => {
                let needle = search.to_lowercase();
                let found = api
                    .device_names()
                    .into_iter()
                    .find(|device| device.to_lowercase().contains(&needle))
                    .ok_or_else(|| {
                        DriverError::Device(format!("no output device matching '{search}'"))
                    })?;
                Some(CString::new(found).map_err(|e| DriverError::Device(e.to_string()))?)
            }
        };
        let requested = specifier.as_ref().map_or(ptr::null(), |s| s.as_ptr());
        // SAFETY: `requested` is null or a NUL-terminated name that outlives the call.
        let raw = NonNull::new(unsafe { (api.alc_open_device)(requested) })
            .map(Raw)
            .ok_or_else(|| DriverError::Device("alcOpenDevice returned no device".into()))?;
        let device_name = api
            .alc_string(raw.as_ptr(), ALC_DEVICE_SPECIFIER)
            .unwrap_or_default();

        let id = state.allocate();
        state.devices.insert(
            id,
            OpenDevice {
                raw,
                name: device_name,
            },
        );
        Ok(DeviceId(id))
    }

    fn close_device(&self, device: DeviceId) {
        let mut state = self.state.lock();
        let Some(open) = state.devices.remove(&device.0) else {
            return;
        };
        let (orphaned, kept): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut state.contexts)
                .into_iter()
                .partition(|(_, ctx)| ctx.device == device.0);
        state.contexts = kept;
        let Some(api) = state.api.as_ref() else {
            return;
        };
        for ctx in orphaned.values() {
            release_context(api, ctx);
        }
        // SAFETY: the device is open and none of its contexts survive.
        if unsafe { (api.alc_close_device)(open.raw.as_ptr()) } == 0 {
            tracing::warn!(device = %open.name, "alcCloseDevice failed");
        }
    }

    fn create_context(&self, device: DeviceId) -> Result<ContextId, DriverError> {
        let mut state = self.state.lock();
        let api = state.api()?;
        let device_raw = state
            .devices
            .get(&device.0)
            .map(|open| open.raw)
            .ok_or_else(|| DriverError::InvalidHandle(format!("device {}", device.0)))?;
        // SAFETY: the device is open; a null attribute list asks for defaults.
        let created = unsafe { (api.alc_create_context)(device_raw.as_ptr(), ptr::null()) };
        let Some(raw) = NonNull::new(created).map(Raw) else {
            // SAFETY: the device is open.
            let code = unsafe { (api.alc_get_error)(device_raw.as_ptr()) };
            return Err(DriverError::Context(format!(
                "alcCreateContext failed (ALC error 0x{code:04X})"
            )));
        };

        let id = state.allocate();
        state.contexts.insert(
            id,
            OpenContext {
                device: device.0,
                raw,
                sources: BTreeSet::new(),
            },
        );
        Ok(ContextId(id))
    }

    fn destroy_context(&self, context: ContextId) {
        let mut state = self.state.lock();
        let Some(ctx) = state.contexts.remove(&context.0) else {
            return;
        };
        if let Some(api) = state.api.as_ref() {
            release_context(api, &ctx);
        }
    }

    fn set_distance_model(
        &self,
        context: ContextId,
        model: DistanceModel,
    ) -> Result<(), DriverError> {
        let code = distance_model_code(model);
        self.state
            .lock()
            .with_current(context, DriverError::Context, |api| {
                // SAFETY: `code` is a distance model enum.
                unsafe { (api.al_distance_model)(code) };
            })
    }

    fn set_listener(&self, context: ContextId, listener: &AlListener) -> Result<(), DriverError> {
        let (at, up) = (listener.at, listener.up);
        let orientation = [at.x, at.y, at.z, up.x, up.y, up.z];
        self.state
            .lock()
            .with_current(context, DriverError::Context, |api| {
                api.set_listener_v(AL_POSITION, &listener.position.to_array());
                api.set_listener_v(AL_VELOCITY, &listener.velocity.to_array());
                api.set_listener_v(AL_ORIENTATION, &orientation);
                api.set_listener_f(AL_GAIN, listener.gain);
            })
    }

    fn gen_source(&self, context: ContextId) -> Result<SourceId, DriverError> {
        let mut state = self.state.lock();
        let name = state.with_current(context, DriverError::Source, |api| {
            let mut name = 0;
            // SAFETY: one name is written.
            unsafe { (api.al_gen_sources)(1, &mut name) };
            name
        })?;
        if let Some(ctx) = state.contexts.get_mut(&context.0) {
            ctx.sources.insert(name);
        }
        Ok(SourceId(name))
    }

    fn delete_source(&self, context: ContextId, source: SourceId) {
        let mut state = self.state.lock();
        let tracked = state
            .contexts
            .get_mut(&context.0)
            .is_some_and(|ctx| ctx.sources.remove(&source.0));
        if !tracked {
            return;
        }
        let deleted = state.with_current(context, DriverError::Source, |api| {
            // SAFETY: `source.0` was generated on this context.
            unsafe { (api.al_delete_sources)(1, &source.0) };
        });
        if let Err(e) = deleted {
            tracing::warn!(source = source.0, error = %e, "alDeleteSources failed");
        }
    }

    fn set_source(
        &self,
        context: ContextId,
        source: SourceId,
        params: &AlSource,
    ) -> Result<(), DriverError> {
        let state = self.state.lock();
        let owned = state
            .contexts
            .get(&context.0)
            .is_some_and(|ctx| ctx.sources.contains(&source.0));
        if !owned {
            return Err(DriverError::InvalidHandle(format!("source {}", source.0)));
        }
        state.with_current(context, DriverError::Source, |api| {
            let name = source.0;
            api.set_source_v(name, AL_POSITION, params.position);
            api.set_source_v(name, AL_VELOCITY, params.velocity);
            api.set_source_v(name, AL_DIRECTION, params.direction);
            api.set_source_f(name, AL_GAIN, params.gain);
            api.set_source_f(name, AL_PITCH, params.pitch);
            api.set_source_f(name, AL_ROLLOFF_FACTOR, params.rolloff_factor);
            api.set_source_f(name, AL_REFERENCE_DISTANCE, params.reference_distance);
            api.set_source_f(name, AL_MAX_DISTANCE, params.max_distance);
            api.set_source_f(name, AL_CONE_INNER_ANGLE, params.cone_inner_angle);
            api.set_source_f(name, AL_CONE_OUTER_ANGLE, params.cone_outer_angle);
            api.set_source_f(name, AL_CONE_OUTER_GAIN, params.cone_outer_gain);
        })
    }

    fn effective_gain(&self, context: ContextId, source: SourceId) -> Result<f32, DriverError> {
        let state = self.state.lock();
        let owned = state
            .contexts
            .get(&context.0)
            .is_some_and(|ctx| ctx.sources.contains(&source.0));
        if !owned {
            return Err(DriverError::InvalidHandle(format!("source {}", source.0)));
        }
        let (code, stored, listener_position, listener_gain) =
            state.with_current(context, DriverError::Source, |api| {
                let name = source.0;
                // SAFETY: AL_DISTANCE_MODEL is an integer state query.
                let code = unsafe { (api.al_get_integer)(AL_DISTANCE_MODEL) };
                let stored = AlSource {
                    position: api.source_v(name, AL_POSITION),
                    velocity: api.source_v(name, AL_VELOCITY),
                    direction: api.source_v(name, AL_DIRECTION),
                    gain: api.source_f(name, AL_GAIN),
                    pitch: api.source_f(name, AL_PITCH),
                    rolloff_factor: api.source_f(name, AL_ROLLOFF_FACTOR),
                    reference_distance: api.source_f(name, AL_REFERENCE_DISTANCE),
                    max_distance: api.source_f(name, AL_MAX_DISTANCE),
                    cone_inner_angle: api.source_f(name, AL_CONE_INNER_ANGLE),
                    cone_outer_angle: api.source_f(name, AL_CONE_OUTER_ANGLE),
                    cone_outer_gain: api.source_f(name, AL_CONE_OUTER_GAIN),
                };
                (
                    code,
                    stored,
                    api.listener_v(AL_POSITION),
                    api.listener_f(AL_GAIN),
                )
            })?;
        let model = distance_model_from_code(code).ok_or_else(|| {
            DriverError::Context(format!("unsupported distance model 0x{code:04X}"))
        })?;
        Ok(rendered_gain(model, &stored, listener_position, listener_gain))
    }

    fn info(&self, context: ContextId) -> BTreeMap<String, String> {
        let state = self.state.lock();
        let mut info = BTreeMap::new();
        let strings = state.with_current(context, DriverError::Context, |api| {
            [("vendor", AL_VENDOR), ("renderer", AL_RENDERER), ("version", AL_VERSION)]
                .into_iter()
                .filter_map(|(key, param)| Some((key.to_owned(), api.al_string(param)?)))
                .collect::<Vec<_>>()
        });
        match strings {
            Ok(strings) => info.extend(strings),
            Err(e) => tracing::debug!(error = %e, "OpenAL strings unavailable"),
        }
        if let Some(device) = state
            .contexts
            .get(&context.0)
            .and_then(|ctx| state.devices.get(&ctx.device))
        {
            info.insert("device".to_owned(), device.name.clone());
        }
        if let Some(library) = &state.library {
            info.insert("library".to_owned(), library.display().to_string());
        }
        info
    }
}
