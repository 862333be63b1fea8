//! Import command: graph description in, assembled models out

use crate::config;
use anyhow::{Context, Result};
use std::path::Path;
use umber_assemble::FileSource;
use umber_core::ActionFilters;
use umber_graph::resolve;

pub fn run(graph_path: &str, filters_path: Option<&str>) -> Result<()> {
    let graph = config::load_graph(Path::new(graph_path))?;
    let filters = match filters_path {
        Some(path) => config::load_filters(Path::new(path))?,
        None => ActionFilters::default(),
    };

    let plan = resolve(&graph).context("graph resolution failed")?;
    if plan.is_empty() {
        println!("Nothing to import: the graph resolves to an empty plan.");
        return Ok(());
    }

    let report = umber_assemble::run(&plan, &FileSource, &filters);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(model) => println!(
                "ok   {}: {} points, {} faces, {} materials, {} bones, {} tracks",
                outcome.name,
                model.mesh.points.len(),
                model.mesh.faces.len(),
                model.mesh.materials.len(),
                model.skeleton.as_ref().map_or(0, |s| s.bones.len()),
                model.tracks.len(),
            ),
            Err(err) => println!("FAIL {}: {err}", outcome.name),
        }
        for diag in outcome.diagnostics.iter() {
            println!("     warning: {diag}");
        }
    }

    println!(
        "{} of {} entries assembled, {} warnings",
        report.succeeded(),
        report.outcomes.len(),
        report.warning_count()
    );

    if report.failed() > 0 {
        anyhow::bail!("{} entries failed", report.failed());
    }
    Ok(())
}
