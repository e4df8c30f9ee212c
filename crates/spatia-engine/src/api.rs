//! Serializable inputs and outputs of the engine operations.

use serde::{Deserialize, Serialize};
use spatia_backend::{BackendCapabilities, BackendKind};
use spatia_core::{Motion, Orientation, SpatialError, Vec3};
use spatia_registry::BackendStatus;

/// One row of [`SpatialEngine::list_backends`](crate::SpatialEngine::list_backends).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendListing {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Backend family.
    #[serde(rename = "type")]
    pub kind: BackendKind,
    /// Adapter version.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Whether the backend holds native resources.
    pub initialized: bool,
    /// Whether the backend serves requests.
    pub active: bool,
}

impl From<BackendStatus> for BackendListing {
    fn from(status: BackendStatus) -> Self {
        let d = status.descriptor;
        Self {
            id: d.id,
            name: d.name,
            kind: d.kind,
            version: d.version,
            description: d.description,
            initialized: status.initialized,
            active: status.active,
        }
    }
}

/// Capabilities of one backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilitiesReport {
    /// Backend the capabilities belong to.
    pub backend: String,
    /// Declared capabilities.
    pub capabilities: BackendCapabilities,
}

/// Structured description of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Stable snake-case error kind, e.g. `backend_unavailable`.
    pub error_kind: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&SpatialError> for ErrorReport {
    fn from(err: &SpatialError) -> Self {
        Self {
            error_kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<SpatialError> for ErrorReport {
    fn from(err: SpatialError) -> Self {
        Self::from(&err)
    }
}

/// Result of [`SpatialEngine::configure_backend`](crate::SpatialEngine::configure_backend).
///
/// `active_backend` is always the backend serving requests after the call,
/// whether or not the switch succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigureOutcome {
    /// Whether the requested backend is now active.
    pub success: bool,
    /// Backend active after the call.
    pub active_backend: String,
    /// Why the switch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

/// Map placement of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapContext {
    /// Map identifier.
    pub id: String,
    /// Zone within the map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

/// Input of [`SpatialEngine::process_spatial_audio`](crate::SpatialEngine::process_spatial_audio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSpatialAudio {
    /// Operator profile identifier.
    pub profile_id: String,
    /// Source position.
    pub source_position: Vec3,
    /// Listener position.
    pub listener_position: Vec3,
    /// Listener orientation in degrees.
    #[serde(default)]
    pub listener_orientation: Orientation,
    /// Map and zone the sound plays in; supplies occlusion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapContext>,
    /// Prior poses; requests a Doppler shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<Motion>,
}

impl ProcessSpatialAudio {
    /// Request for `profile_id` with the listener facing +Z.
    pub fn new(profile_id: impl Into<String>, source: Vec3, listener: Vec3) -> Self {
        Self {
            profile_id: profile_id.into(),
            source_position: source,
            listener_position: listener,
            listener_orientation: Orientation::default(),
            map: None,
            motion: None,
        }
    }

    /// Set the listener orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.listener_orientation = orientation;
        self
    }

    /// Place the request on a map, optionally in a zone.
    pub fn on_map(mut self, id: impl Into<String>, zone: Option<&str>) -> Self {
        self.map = Some(MapContext {
            id: id.into(),
            zone: zone.map(str::to_string),
        });
        self
    }

    /// Attach a motion sample.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_report_from_error() {
        let report = ErrorReport::from(SpatialError::BackendUnavailable("quantum".into()));
        assert_eq!(report.error_kind, "backend_unavailable");
        assert_eq!(report.message, "backend not registered: quantum");
    }

    #[test]
    fn builder_sets_map_zone() {
        let request =
            ProcessSpatialAudio::new("Ash", Vec3::ZERO, Vec3::ZERO).on_map("Bank", Some("lobby"));
        let map = request.map.unwrap();
        assert_eq!(map.id, "Bank");
        assert_eq!(map.zone.as_deref(), Some("lobby"));
    }
}
