// src/io/reporting.rs

use crate::error::EngineResult;
use crate::model::records::{Decision, ReplenishmentPlan};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the decision report, one row per group, in report order.
pub fn write_decision_report(path: &Path, rows: &[Decision]) -> EngineResult<()> {
    write_table(path, rows)?;
    info!(rows = rows.len(), path = %path.display(), "decision report saved");
    Ok(())
}

/// Reads a decision report back, e.g. for a downstream viewer.
pub fn read_decision_report(path: &Path) -> EngineResult<Vec<Decision>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<Result<Vec<Decision>, _>>()?;
    Ok(rows)
}

pub fn write_reorder_plan(path: &Path, plans: &[ReplenishmentPlan]) -> EngineResult<()> {
    write_table(path, plans)?;
    info!(rows = plans.len(), path = %path.display(), "reorder plan saved");
    Ok(())
}

/// Reads a reorder plan from an earlier run. A missing file is not an
/// error: the plan is optional and `None` is returned.
pub fn read_reorder_plan(path: &Path) -> EngineResult<Option<Vec<ReplenishmentPlan>>> {
    if !path.exists() {
        info!(path = %path.display(), "no reorder plan found, replenishment columns will be empty");
        return Ok(None);
    }
    let mut rdr = csv::Reader::from_path(path)?;
    let plans = rdr
        .deserialize()
        .collect::<Result<Vec<ReplenishmentPlan>, _>>()?;
    info!(rows = plans.len(), path = %path.display(), "loaded reorder plan");
    Ok(Some(plans))
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> EngineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
