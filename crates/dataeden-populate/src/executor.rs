use serde::Serialize;
use tracing::{info, warn};

use dataeden_core::{ColumnDescriptor, Error, Result, ValueGrid, Warning};
use dataeden_db::Handle;

use crate::convert::convert_row;
use crate::plan::{InsertPlan, plan_insert};

/// Outcome of one insert batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsertReport {
    pub rows_inserted: u64,
    pub warnings: Vec<Warning>,
}

/// Plan and execute the insert of `grid` into `table`.
pub async fn insert(
    handle: &Handle,
    table: &str,
    all_columns: &[ColumnDescriptor],
    grid: &ValueGrid,
) -> Result<InsertReport> {
    let plan = plan_insert(handle.dialect(), table, all_columns)?;
    execute_plan(handle, &plan, grid).await
}

/// Convert every cell of `grid` and run `plan` once per row as one batch.
///
/// An empty grid inserts nothing and never reaches the database.
pub async fn execute_plan(
    handle: &Handle,
    plan: &InsertPlan,
    grid: &ValueGrid,
) -> Result<InsertReport> {
    if grid.is_empty() {
        info!(table = plan.table(), "empty grid; nothing inserted");
        return Ok(InsertReport::default());
    }

    let width = plan.columns().len();
    if let Some(row) = grid.first_ragged_row(width) {
        return Err(Error::InvalidGrid(format!(
            "row {row} has {} values, expected {width}",
            grid.rows()[row].len()
        )));
    }

    let mut warnings = Vec::new();
    let rows: Vec<_> = grid
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| convert_row(plan.columns(), row, index, &mut warnings))
        .collect();
    for warning in &warnings {
        warn!(table = plan.table(), code = warning.code(), "{warning}");
    }

    let rows_inserted = handle
        .source()
        .execute_batch(plan.sql(), &rows)
        .await
        .inspect_err(|err| {
            warn!(
                table = plan.table(),
                address = %handle.redacted_address(),
                error = %err,
                "insert batch rejected"
            );
        })?;

    info!(
        table = plan.table(),
        dialect = %plan.dialect(),
        rows = rows_inserted,
        "insert batch executed"
    );
    Ok(InsertReport {
        rows_inserted,
        warnings,
    })
}
