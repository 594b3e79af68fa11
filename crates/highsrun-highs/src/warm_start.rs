//! Starting-point files for `--read_solution_file`.

use std::fmt::Write as _;

use highsrun_core::{Bounds, ModelView};
use highsrun_expr::VariableId;
use highsrun_solver::SolverError;
use tracing::debug;

use crate::index_map::VariableIndexMap;

/// Value closest to zero inside the bounds.
pub fn default_primal_value(bounds: &Bounds) -> f64 {
    if bounds.lower > 0.0 {
        bounds.lower
    } else if bounds.upper < 0.0 {
        bounds.upper
    } else {
        0.0
    }
}

/// Render a raw-style solution file holding the hinted column values.
///
/// Columns without a hint start at [`default_primal_value`]. Row activities
/// and the objective are computed from the resulting point.
///
/// # Errors
///
/// Returns `InvalidVariableId` for hints on variables that were not exported
/// and `UnsupportedModelConstruct` for non-finite hint values.
pub fn render_start<M: ModelView>(
    model: &M,
    index_map: &VariableIndexMap,
    hints: &[(VariableId, f64)],
) -> Result<String, SolverError> {
    let mut values = vec![0.0; index_map.len()];
    for (var_id, variable) in model.variables() {
        if let Some(column) = index_map.index_of(var_id) {
            values[column] = default_primal_value(&variable.bounds);
        }
    }

    for &(var_id, value) in hints {
        let column = index_map
            .index_of(var_id)
            .ok_or(SolverError::InvalidVariableId(var_id))?;
        if !value.is_finite() {
            return Err(SolverError::unsupported(format!(
                "start value for variable {var_id} is not finite ({value})"
            )));
        }
        values[column] = value;
    }

    let value_of = |var_id: VariableId| index_map.index_of(var_id).map(|column| values[column]);
    let undeclared = || SolverError::unsupported("start point references an undeclared variable");

    let objective = model
        .objective()
        .expr
        .without_constant()
        .evaluate(value_of)
        .ok_or_else(undeclared)?;

    let mut rows = Vec::new();
    for (_, constraint) in model.constraints() {
        rows.push(
            constraint
                .expr()
                .without_constant()
                .evaluate(value_of)
                .ok_or_else(undeclared)?,
        );
    }

    let mut out = String::from("Model status\nUnknown\n\n# Primal solution values\nFeasible\n");
    let _ = writeln!(out, "Objective {objective:?}");
    let _ = writeln!(out, "# Columns {}", values.len());
    for (column, value) in values.iter().enumerate() {
        let _ = writeln!(out, "{} {value:?}", VariableIndexMap::column_name(column));
    }
    let _ = writeln!(out, "# Rows {}", rows.len());
    for (row, activity) in rows.iter().enumerate() {
        let _ = writeln!(out, "c{row} {activity:?}");
    }

    debug!(
        component = "warm_start",
        operation = "render",
        status = "success",
        num_hints = hints.len(),
        columns = values.len(),
        rows = rows.len(),
        "Prepared warm-start solution"
    );

    Ok(out)
}
