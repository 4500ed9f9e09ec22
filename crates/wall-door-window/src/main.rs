// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! wall-door-window - write the demo scene as an IFC4 file
//!
//! Logging follows `RUST_LOG` (default `info`).

use anyhow::{bail, Context, Result};
use ifc_author::IfcType;
use ifc_author_step::{ModelSummary, StepModel};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wall_door_window::build_scene;

mod cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<()> {
    let (mut model, scene) = build_scene().context("failed to build the scene")?;
    tracing::debug!(?scene, "Scene built");

    model
        .write_to_file(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    tracing::info!(
        output = %cli.output.display(),
        entities = model.file().len(),
        "Wrote IFC file"
    );

    if cli.verifies() {
        let summary = verify(&cli.output)?;
        if cli.json {
            println!("{}", summary.to_json()?);
        }
    }
    Ok(())
}

/// Read the written file back and check that nothing dangles
fn verify(path: &Path) -> Result<ModelSummary> {
    let model = StepModel::read_file(path)
        .with_context(|| format!("failed to read back {}", path.display()))?;

    let dangling = model.dangling_references();
    if let Some((from, to)) = dangling.first() {
        bail!(
            "{} dangling references in {}, first {} -> {}",
            dangling.len(),
            path.display(),
            from,
            to
        );
    }

    let summary = ModelSummary::build(&model, model.header().schema_identifier());
    tracing::info!(
        schema = %summary.schema,
        entities = summary.entity_count,
        walls = summary.count(&IfcType::IfcWall),
        doors = summary.count(&IfcType::IfcDoor),
        windows = summary.count(&IfcType::IfcWindow),
        openings = summary.count(&IfcType::IfcOpeningElement),
        "Verified IFC file"
    );
    for rel in &summary.aggregates {
        tracing::info!(
            name = rel.name.as_deref().unwrap_or("$"),
            relating = %rel.relating,
            related = rel.related.len(),
            "Aggregate"
        );
    }
    Ok(summary)
}
