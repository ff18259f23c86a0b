//! Offline renderer: prints the derived report for a schema file (or the demo document) as JSON.
//!
//! Usage: `render_report [path/to/schema.json]`

use anyhow::{anyhow, Context, Result};
use narrative_landscape::config::layout::resolve_path;
use narrative_landscape::defaults::default_schema;
use narrative_landscape::report::Report;
use narrative_landscape::{validate, LayoutConfig};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let schema = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            validate(&raw).with_context(|| format!("validating {path}"))?
        }
        None => default_schema().context("validating demo schema")?,
    };

    let cfg = LayoutConfig::load_or_default(&resolve_path());
    let mut sim = cfg.simulation;
    let report = Report::compose(&schema, &cfg, &mut sim, || true)
        .ok_or_else(|| anyhow!("tension settle did not complete"))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
