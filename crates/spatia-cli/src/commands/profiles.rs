//! Profile listing and inspection command.

use clap::{Args, Subcommand};
use serde::Serialize;
use spatia_core::AudioProfile;
use spatia_engine::SpatialEngine;

use super::common::print_json;

#[derive(Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    command: Option<ProfilesCommand>,
}

#[derive(Subcommand)]
enum ProfilesCommand {
    /// List operator and map ids
    List,

    /// Show an operator profile
    Operator {
        /// Operator id
        id: String,
    },

    /// Show a map's ambient profile and its zones
    Map {
        /// Map id
        id: String,

        /// Zone variant to show
        #[arg(long)]
        zone: Option<String>,
    },
}

#[derive(Serialize)]
struct Listing {
    operators: Vec<String>,
    maps: Vec<String>,
}

#[derive(Serialize)]
struct MapView {
    profile: AudioProfile,
    zones: Vec<String>,
    ambient_sounds: Vec<AudioProfile>,
}

pub fn run(engine: &SpatialEngine, args: ProfilesArgs, json: bool) -> anyhow::Result<()> {
    match args.command.unwrap_or(ProfilesCommand::List) {
        ProfilesCommand::List => {
            let listing = Listing {
                operators: engine.operator_ids(),
                maps: engine.map_ids(),
            };
            if json {
                return print_json(&listing);
            }
            println!("Operators ({}):", listing.operators.len());
            for chunk in listing.operators.chunks(6) {
                println!("  {}", chunk.join(", "));
            }
            println!();
            println!("Maps ({}):", listing.maps.len());
            println!("  {}", listing.maps.join(", "));
        }
        ProfilesCommand::Operator { id } => {
            let profile = engine.operator_profile(&id)?;
            if json {
                return print_json(&*profile);
            }
            print_profile(&profile);
            if let Some(modifiers) = profile.modifiers {
                println!("  speed:       x{}", modifiers.speed_multiplier);
                println!("  armor:       {}", modifiers.armor_rating);
            }
            if !profile.cues.is_empty() {
                println!();
                println!("Cues:");
                for cue in &profile.cues {
                    println!("  - {cue}");
                }
            }
        }
        ProfilesCommand::Map { id, zone } => {
            let profile = engine.map_profile(&id, zone.as_deref())?;
            let store = engine.profiles();
            let view = MapView {
                profile: (*profile).clone(),
                zones: store.map_zones(&id),
                ambient_sounds: store
                    .ambient_sounds(&id, zone.as_deref())
                    .iter()
                    .map(|p| (**p).clone())
                    .collect(),
            };
            if json {
                return print_json(&view);
            }
            print_profile(&view.profile);
            println!();
            println!("Zones: {}", view.zones.join(", "));
            println!();
            println!("Ambient sounds:");
            for sound in &view.ambient_sounds {
                println!(
                    "  {:32}  {:6.1} dB  {:.0}-{:.0} Hz",
                    sound.id,
                    sound.base_volume_db,
                    sound.frequency_range.low_hz,
                    sound.frequency_range.high_hz
                );
            }
        }
    }
    Ok(())
}

fn print_profile(profile: &AudioProfile) {
    println!("{}", profile.id);
    println!("{}", "=".repeat(profile.id.len()));
    if !profile.description.is_empty() {
        println!();
        println!("{}", profile.description);
    }
    println!();
    println!(
        "  band:        {:.0}-{:.0} Hz",
        profile.frequency_range.low_hz, profile.frequency_range.high_hz
    );
    println!("  volume:      {:.1} dB", profile.base_volume_db);
    println!("  falloff:     {}", profile.falloff_exponent);
    println!("  reverb:      {}", profile.reverb_amount);
    println!("  occlusion:   {}", profile.occlusion_factor);
    println!("  directional: {}", profile.directional);
}
