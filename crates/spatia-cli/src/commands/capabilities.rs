//! Backend capability command.

use clap::Args;
use serde::Serialize;
use spatia_backend::BackendCapabilities;
use spatia_engine::SpatialEngine;
use std::collections::BTreeMap;

use super::common::print_json;

#[derive(Args)]
pub struct CapabilitiesArgs {
    /// Backend to describe (defaults to the active backend)
    #[arg(value_name = "ID")]
    id: Option<String>,
}

#[derive(Serialize)]
struct CapabilitiesView {
    backend: String,
    capabilities: BackendCapabilities,
    runtime: BTreeMap<String, String>,
}

pub fn run(engine: &SpatialEngine, args: CapabilitiesArgs, json: bool) -> anyhow::Result<()> {
    let report = engine.get_capabilities(args.id.as_deref())?;
    let runtime = engine.runtime_info(Some(&report.backend))?;

    if json {
        return print_json(&CapabilitiesView {
            backend: report.backend,
            capabilities: report.capabilities,
            runtime,
        });
    }

    let caps = report.capabilities;
    println!("{}", report.backend);
    println!("{}", "=".repeat(report.backend.len()));
    println!();
    let supported = caps.supported();
    if supported.is_empty() {
        println!("Capabilities: none");
    } else {
        println!("Capabilities: {}", supported.join(", "));
    }
    match caps.max_sources {
        Some(max) => println!("Max sources:  {max}"),
        None => println!("Max sources:  unlimited"),
    }

    if !runtime.is_empty() {
        println!();
        println!("Runtime:");
        for (key, value) in &runtime {
            println!("  {key:14}  {value}");
        }
    }
    Ok(())
}
