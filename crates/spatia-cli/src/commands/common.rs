//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use serde::Serialize;
use spatia_config::{EngineConfig, paths};
use spatia_core::Vec3;
use spatia_engine::SpatialEngine;

/// Load the engine configuration.
///
/// An explicit path must exist. Otherwise the user config, then the system
/// config, then built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => match paths::find_config() {
            Some(found) => {
                tracing::debug!(path = %found.display(), "using config file");
                EngineConfig::load(found)?
            }
            None => EngineConfig::default(),
        },
    };
    Ok(config)
}

/// Build the engine and apply a `--backend` override.
pub fn build_engine(config: Option<&Path>, backend: Option<&str>) -> anyhow::Result<SpatialEngine> {
    let config = load_config(config)?;
    let engine = SpatialEngine::from_config(&config)?;
    if let Some(id) = backend {
        let outcome = engine.configure_backend(id);
        if let Some(error) = outcome.error {
            anyhow::bail!(
                "cannot activate backend '{}': {} (active: {})",
                id,
                error.message,
                outcome.active_backend
            );
        }
    }
    Ok(engine)
}

/// Parse an `x,y,z` triple for clap's `value_parser`.
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("Invalid vector: '{}' (expected x,y,z)", s));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("Invalid coordinate '{}' in '{}'", part, s))?;
    }
    Ok(Vec3::new(xyz[0], xyz[1], xyz[2]))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vectors() {
        assert_eq!(parse_vec3("10,2,5").unwrap(), Vec3::new(10.0, 2.0, 5.0));
        assert_eq!(parse_vec3("-1.5, 0, 3").unwrap(), Vec3::new(-1.5, 0.0, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }
}
