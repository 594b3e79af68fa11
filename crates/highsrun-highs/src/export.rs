//! LP-format problem export.
//!
//! Columns are written as `x<index>`, rows as `c<position>`. Every column is
//! listed in the objective (zero coefficients included) in index order so the
//! solver numbers columns exactly as [`VariableIndexMap`] does; warm-start
//! files rely on that.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use highsrun_core::{Bounds, ModelView, Sense, Variable, VariableKind};
use highsrun_expr::{Expr, VariableId};
use highsrun_solver::SolverError;
use tracing::{debug, trace};

use crate::index_map::VariableIndexMap;

const TERMS_PER_LINE: usize = 8;

/// An exported problem file together with the column mapping used to write it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedProblem {
    content: String,
    index_map: VariableIndexMap,
    objective_offset: f64,
    num_rows: usize,
}

impl ExportedProblem {
    /// LP file text.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn index_map(&self) -> &VariableIndexMap {
        &self.index_map
    }

    /// Objective constant left out of the file; add it to the solver's objective value.
    pub fn objective_offset(&self) -> f64 {
        self.objective_offset
    }

    pub fn num_columns(&self) -> usize {
        self.index_map.len()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Write the LP text to `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<(), SolverError> {
        fs::write(path, &self.content)
            .map_err(|err| SolverError::io(format!("writing {}", path.display()), &err))
    }

    pub fn into_parts(self) -> (String, VariableIndexMap) {
        (self.content, self.index_map)
    }
}

fn number(value: f64) -> String {
    format!("{value:?}")
}

fn check_finite(value: f64, what: impl FnOnce() -> String) -> Result<(), SolverError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::unsupported(format!(
            "{} is not finite ({value})",
            what()
        )))
    }
}

fn column_of(
    index_map: &VariableIndexMap,
    var_id: VariableId,
    location: impl FnOnce() -> String,
) -> Result<usize, SolverError> {
    index_map.index_of(var_id).ok_or_else(|| {
        SolverError::unsupported(format!(
            "{} references undeclared variable {var_id}",
            location()
        ))
    })
}

fn linear_terms(
    expr: &Expr,
    index_map: &VariableIndexMap,
    location: &dyn Fn() -> String,
) -> Result<Vec<(usize, f64)>, SolverError> {
    if expr.degree() > 1 {
        return Err(SolverError::unsupported(format!(
            "{} contains quadratic terms",
            location()
        )));
    }
    expr.normalized_terms()
        .into_iter()
        .map(|(var_id, coeff)| {
            check_finite(coeff, || format!("coefficient of variable {var_id} in {}", location()))?;
            Ok((column_of(index_map, var_id, location)?, coeff))
        })
        .collect()
}

fn write_terms(out: &mut String, terms: &[(usize, f64)]) {
    for (position, &(column, coeff)) in terms.iter().enumerate() {
        if position > 0 && position % TERMS_PER_LINE == 0 {
            out.push_str("\n   ");
        }
        let name = VariableIndexMap::column_name(column);
        if position == 0 {
            let _ = write!(out, " {} {name}", number(coeff));
        } else if coeff.is_sign_negative() {
            let _ = write!(out, " - {} {name}", number(-coeff));
        } else {
            let _ = write!(out, " + {} {name}", number(coeff));
        }
    }
}

fn write_bound(out: &mut String, name: &str, bounds: &Bounds) {
    let Bounds { lower, upper } = *bounds;
    let _ = match (bounds.has_lower(), bounds.has_upper()) {
        (true, true) if lower == upper => writeln!(out, " {name} = {}", number(lower)),
        (true, true) => writeln!(out, " {} <= {name} <= {}", number(lower), number(upper)),
        (true, false) => writeln!(out, " {name} >= {}", number(lower)),
        (false, true) => writeln!(out, " -inf <= {name} <= {}", number(upper)),
        (false, false) => writeln!(out, " {name} free"),
    };
}

fn validate_variable(var_id: VariableId, variable: &Variable) -> Result<(), SolverError> {
    let Bounds { lower, upper } = variable.bounds;
    if !variable.bounds.is_valid() {
        return Err(SolverError::unsupported(format!(
            "variable {var_id} has invalid bounds [{lower}, {upper}]"
        )));
    }
    if variable.kind == VariableKind::Binary && (lower != 0.0 || upper != 1.0) {
        return Err(SolverError::unsupported(format!(
            "binary variable {var_id} must have bounds [0, 1], got [{lower}, {upper}]"
        )));
    }
    Ok(())
}

/// Export a model to LP text and record its column mapping.
///
/// Columns are assigned in `variables()` order; constraints and the objective
/// may only reference declared variables. A constraint whose terms all cancel
/// is written as `0 x0 <op> rhs`, so the solver judges its feasibility.
/// Nothing touches the filesystem.
///
/// # Errors
///
/// Returns `UnsupportedModelConstruct` for quadratic terms, undeclared
/// variables, non-finite numbers, invalid bounds, and an empty or sense-less
/// objective.
pub fn export<M: ModelView>(model: &M) -> Result<ExportedProblem, SolverError> {
    let mut index_map = VariableIndexMap::new();
    let mut columns: Vec<Variable> = Vec::new();
    for (var_id, variable) in model.variables() {
        validate_variable(var_id, variable)?;
        index_map.insert(var_id)?;
        columns.push(*variable);
        trace!(
            component = "export",
            operation = "add_column",
            status = "success",
            var_id = var_id.inner(),
            column = columns.len() - 1,
            kind = variable.kind.as_str(),
            "Assigned column"
        );
    }

    let objective = model.objective();
    let Some(sense) = objective.sense else {
        return Err(SolverError::unsupported("objective has no sense"));
    };
    let objective_terms = linear_terms(&objective.expr, &index_map, &|| "objective".to_string())?;
    if objective_terms.is_empty() {
        return Err(SolverError::unsupported(
            "objective has no nonzero linear terms",
        ));
    }
    let objective_offset = objective.expr.constant();
    check_finite(objective_offset, || "objective constant".to_string())?;

    let mut dense_objective = vec![0.0; columns.len()];
    for (column, coeff) in objective_terms {
        dense_objective[column] = coeff;
    }
    let dense_objective: Vec<(usize, f64)> = dense_objective.into_iter().enumerate().collect();

    let mut out = String::from("\\ Problem generated by highsrun\n");
    out.push_str(match sense {
        Sense::Minimize => "Minimize\n",
        Sense::Maximize => "Maximize\n",
    });
    out.push_str(" obj:");
    write_terms(&mut out, &dense_objective);
    out.push('\n');

    let mut num_rows = 0;
    for (position, (con_id, constraint)) in model.constraints().enumerate() {
        if position == 0 {
            out.push_str("Subject To\n");
        }
        let location = || format!("constraint {con_id}");
        let mut terms = linear_terms(constraint.expr(), &index_map, &location)?;
        if terms.is_empty() {
            // A row needs at least one term; a zero coefficient keeps `0 <op> rhs`.
            terms.push((0, 0.0));
        }
        let rhs = constraint.effective_rhs();
        check_finite(rhs, || format!("right-hand side of constraint {con_id}"))?;

        let _ = write!(out, " c{position}:");
        write_terms(&mut out, &terms);
        let _ = writeln!(out, " {} {}", constraint.sense().symbol(), number(rhs));
        num_rows += 1;
    }

    let mut bounds_header = false;
    for (column, variable) in columns.iter().enumerate() {
        if variable.kind == VariableKind::Binary {
            continue;
        }
        if !bounds_header {
            out.push_str("Bounds\n");
            bounds_header = true;
        }
        write_bound(&mut out, &VariableIndexMap::column_name(column), &variable.bounds);
    }

    write_name_section(&mut out, "General", &columns, VariableKind::Integer);
    write_name_section(&mut out, "Binary", &columns, VariableKind::Binary);
    out.push_str("End\n");

    debug!(
        component = "export",
        operation = "export",
        status = "success",
        columns = index_map.len(),
        rows = num_rows,
        bytes = out.len(),
        "Exported model to LP format"
    );

    Ok(ExportedProblem {
        content: out,
        index_map,
        objective_offset,
        num_rows,
    })
}

fn write_name_section(out: &mut String, header: &str, columns: &[Variable], kind: VariableKind) {
    let names: Vec<String> = columns
        .iter()
        .enumerate()
        .filter(|(_, variable)| variable.kind == kind)
        .map(|(column, _)| VariableIndexMap::column_name(column))
        .collect();
    if names.is_empty() {
        return;
    }
    out.push_str(header);
    out.push('\n');
    for chunk in names.chunks(TERMS_PER_LINE) {
        out.push(' ');
        out.push_str(&chunk.join(" "));
        out.push('\n');
    }
}
