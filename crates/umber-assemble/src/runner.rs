//! Batch execution of a build plan
//!
//! Entries are assembled sequentially in plan order. A failed entry is
//! recorded and the run moves on; one bad asset never aborts a batch.

use crate::assemble::assemble;
use crate::model::AssembledModel;
use crate::source::AssetSource;
use umber_core::{ActionFilters, Diagnostics, Result};
use umber_graph::BuildPlan;

/// The result of assembling one plan entry
#[derive(Debug)]
pub struct EntryOutcome {
    pub name: String,
    pub result: Result<AssembledModel>,
    /// Non-fatal issues, also present for failed entries up to the
    /// point of failure when available
    pub diagnostics: Diagnostics,
}

impl EntryOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes for a whole run, in plan order
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn warning_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.diagnostics.len()).sum()
    }

    /// Successfully assembled models, in plan order
    pub fn models(&self) -> impl Iterator<Item = &AssembledModel> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

/// Execute every entry of `plan` against `source`.
pub fn run(plan: &BuildPlan, source: &dyn AssetSource, filters: &ActionFilters) -> RunReport {
    let mut outcomes = Vec::with_capacity(plan.len());
    for entry in &plan.entries {
        log::info!("assembling entry {:?}", entry.name);
        let (result, diagnostics) = match assemble(entry, source, filters) {
            Ok((model, diags)) => (Ok(model), diags),
            Err(err) => {
                log::error!("entry {:?} failed: {err}", entry.name);
                (Err(err), Diagnostics::new())
            }
        };
        outcomes.push(EntryOutcome {
            name: entry.name.clone(),
            result,
            diagnostics,
        });
    }
    RunReport { outcomes }
}
