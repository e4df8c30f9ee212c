//! Backend listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use spatia_engine::SpatialEngine;

use super::common::print_json;

pub fn run(engine: &SpatialEngine, json: bool) -> anyhow::Result<()> {
    let backends = engine.list_backends();
    if json {
        return print_json(&backends);
    }

    println!("Spatial Backends");
    println!("================\n");
    println!(
        "  {:10}  {:28}  {:16}  {:8}  {}",
        "ID", "Name", "Type", "Version", "State"
    );
    println!(
        "  {:10}  {:28}  {:16}  {:8}  {}",
        "--", "----", "----", "-------", "-----"
    );
    for backend in &backends {
        let state = match (backend.active, backend.initialized) {
            (true, _) => "active",
            (false, true) => "ready",
            (false, false) => "idle",
        };
        println!(
            "  {:10}  {:28}  {:16}  {:8}  {}",
            backend.id,
            backend.name,
            backend.kind.as_str(),
            backend.version,
            state
        );
    }
    println!();
    for backend in &backends {
        println!("  {}: {}", backend.id, backend.description);
    }
    Ok(())
}
