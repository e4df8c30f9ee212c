//! Spatial processing command.
//!
//! Always prints the processed result as JSON.

use clap::Args;
use spatia_core::{Motion, Orientation, Vec3};
use spatia_engine::{ProcessSpatialAudio, SpatialEngine};

use super::common::{parse_vec3, print_json};

#[derive(Args)]
pub struct ProcessArgs {
    /// Operator profile id (e.g. Thermite)
    #[arg(value_name = "PROFILE")]
    profile: String,

    /// Source position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    source: Vec3,

    /// Listener position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    listener: Vec3,

    /// Listener yaw in degrees (0 faces +Z, 90 faces +X)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    yaw: f32,

    /// Listener pitch in degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pitch: f32,

    /// Listener roll in degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    roll: f32,

    /// Map the sound plays on
    #[arg(long)]
    map: Option<String>,

    /// Zone within the map (exterior, interior, or a reverb zone)
    #[arg(long, requires = "map")]
    zone: Option<String>,

    /// Previous source position, enables Doppler
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, requires = "dt")]
    prev_source: Option<Vec3>,

    /// Previous listener position (defaults to the current one)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, requires = "dt")]
    prev_listener: Option<Vec3>,

    /// Seconds between the previous and current poses
    #[arg(long)]
    dt: Option<f32>,
}

impl ProcessArgs {
    fn request(&self) -> ProcessSpatialAudio {
        let mut request = ProcessSpatialAudio::new(&self.profile, self.source, self.listener)
            .with_orientation(Orientation::new(self.yaw, self.pitch, self.roll));
        if let Some(map) = &self.map {
            request = request.on_map(map, self.zone.as_deref());
        }
        if let Some(dt) = self.dt {
            request = request.with_motion(Motion::new(
                self.prev_source.unwrap_or(self.source),
                self.prev_listener.unwrap_or(self.listener),
                dt,
            ));
        }
        request
    }
}

pub fn run(engine: &SpatialEngine, args: ProcessArgs) -> anyhow::Result<()> {
    let request = args.request();
    tracing::debug!(profile = %request.profile_id, "processing");
    let result = engine.process_spatial_audio(&request)?;
    print_json(&result)
}
