//! Raw-style HiGHS solution file parsing.
//!
//! Layout (trailing dual and basis sections are ignored):
//!
//! ```text
//! Model status
//! Optimal
//!
//! # Primal solution values
//! Feasible
//! Objective 18
//! # Columns 2
//! x0 2
//! x1 2
//! # Rows 2
//! ...
//! # Basis
//! HiGHS v1
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use highsrun_expr::VariableId;
use highsrun_solver::{SolveResult, SolveStatus, SolverError};
use tracing::{debug, warn};

use crate::index_map::VariableIndexMap;
use crate::process::ProcessOutcome;
use crate::status::{HighsModelStatus, PrimalStatus, parse_model_status};

const MODEL_STATUS_HEADER: &str = "Model status";
const PRIMAL_HEADER: &str = "# Primal solution values";
const DUAL_HEADER: &str = "# Dual solution values";
const BASIS_HEADER: &str = "# Basis";
const COLUMNS_HEADER: &str = "# Columns";

/// Contents of a solution file, reconciled against the column map.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub model_status: HighsModelStatus,
    /// Status line exactly as written.
    pub raw_status: String,
    pub primal_status: PrimalStatus,
    pub objective: Option<f64>,
    pub values: BTreeMap<VariableId, f64>,
}

/// Adjustments applied when turning a raw solution into a result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParseSettings {
    /// Added to the objective value (the constant the problem file leaves out).
    pub objective_offset: f64,
    pub rounding_digits: Option<u32>,
    /// Significant-digit truncation of variable values, applied after rounding.
    pub truncate_precision: Option<u32>,
}

/// Whether the solver finished writing the file.
///
/// HiGHS writes the basis section last, so a file without it was cut short.
pub fn is_complete(text: &str) -> bool {
    text.ends_with('\n') && text.lines().any(|line| line.trim_end() == BASIS_HEADER)
}

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
        }
    }

    /// Next line with its 1-based number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.inner
            .next()
            .map(|(index, line)| (index + 1, line.trim_end()))
    }

    fn next_nonempty(&mut self) -> Option<(usize, &'a str)> {
        loop {
            let (number, line) = self.next_line()?;
            if !line.trim().is_empty() {
                return Some((number, line));
            }
        }
    }

    fn require(&mut self, what: &str) -> Result<(usize, &'a str), SolverError> {
        self.next_line()
            .ok_or_else(|| SolverError::malformed(None, format!("file ends before {what}")))
    }
}

fn parse_number(token: &str, line: usize, what: &str) -> Result<f64, SolverError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
        .ok_or_else(|| SolverError::malformed(Some(line), format!("invalid {what} '{token}'")))
}

/// Parse solution text and map column values back to variables.
///
/// # Errors
///
/// Returns `MalformedSolution` for layout problems, unknown status tokens
/// and bad numbers, and `IndexReconciliation` for columns the map does not know.
pub fn parse_solution_text(
    text: &str,
    index_map: &VariableIndexMap,
) -> Result<RawSolution, SolverError> {
    let mut lines = Lines::new(text);

    let (number, header) = lines
        .next_nonempty()
        .ok_or_else(|| SolverError::malformed(None, "solution file is empty"))?;
    if header.trim() != MODEL_STATUS_HEADER {
        return Err(SolverError::malformed(
            Some(number),
            format!("expected '{MODEL_STATUS_HEADER}', found '{header}'"),
        ));
    }
    let (number, token) = lines.require("the model status")?;
    let model_status = parse_model_status(token, number)?;
    let raw_status = token.trim().to_string();

    let mut solution = RawSolution {
        model_status,
        raw_status,
        primal_status: PrimalStatus::None,
        objective: None,
        values: BTreeMap::new(),
    };

    let found_primal = loop {
        match lines.next_nonempty() {
            Some((_, line)) if line.trim() == PRIMAL_HEADER => break true,
            Some((_, line)) if line.starts_with(DUAL_HEADER) || line.starts_with(BASIS_HEADER) => {
                break false;
            }
            Some(_) => continue,
            None => break false,
        }
    };
    if !found_primal {
        return Ok(solution);
    }

    let (number, token) = lines.require("the primal solution status")?;
    solution.primal_status = PrimalStatus::from_token(token).ok_or_else(|| {
        SolverError::malformed(
            Some(number),
            format!("unrecognized primal solution status '{}'", token.trim()),
        )
    })?;
    if !solution.primal_status.has_values() {
        return Ok(solution);
    }

    let (number, line) = lines.require("the objective value")?;
    let objective = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["Objective", value] => parse_number(value, number, "objective value")?,
        _ => {
            return Err(SolverError::malformed(
                Some(number),
                format!("expected 'Objective <value>', found '{line}'"),
            ));
        }
    };
    solution.objective = Some(objective);

    let (number, line) = lines.require("the column count")?;
    let count = line
        .strip_prefix(COLUMNS_HEADER)
        .and_then(|rest| rest.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            SolverError::malformed(
                Some(number),
                format!("expected '{COLUMNS_HEADER} <count>', found '{line}'"),
            )
        })?;
    if count != index_map.len() {
        return Err(SolverError::IndexReconciliation {
            column: format!("{COLUMNS_HEADER} {count}"),
            known_columns: index_map.len(),
        });
    }

    for _ in 0..count {
        let (number, line) = lines.require("all column values")?;
        let mut parts = line.split_whitespace();
        let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SolverError::malformed(
                Some(number),
                format!("expected '<column> <value>', found '{line}'"),
            ));
        };
        let variable = index_map.resolve(name)?;
        let value = parse_number(value, number, "column value")?;
        if solution.values.insert(variable, value).is_some() {
            return Err(SolverError::malformed(
                Some(number),
                format!("column '{name}' appears twice"),
            ));
        }
    }

    Ok(solution)
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(i32::MAX as u32) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() { rounded } else { value }
}

/// Round to `precision` digits counted from the leading digit, keeping at least one decimal.
fn truncate_significant(value: f64, precision: u32) -> f64 {
    let precision = i32::try_from(precision).unwrap_or(i32::MAX);
    let magnitude = (value.abs() + 10f64.powi(-precision)).log10().floor();
    if !magnitude.is_finite() {
        return value;
    }
    let digits = (f64::from(precision) - magnitude).max(1.0).min(f64::from(u32::MAX));
    round_to(value, digits as u32)
}

/// Turn a raw solution into a result for the caller.
///
/// # Errors
///
/// Returns `MalformedSolution` when a status that promises a solution comes
/// without an objective or column values.
pub fn into_result(
    raw: RawSolution,
    outcome: &ProcessOutcome,
    settings: &ParseSettings,
) -> Result<SolveResult, SolverError> {
    let status = raw.model_status.classify(raw.primal_status, outcome.timed_out);
    let round = |value: f64| match settings.rounding_digits {
        Some(digits) => round_to(value, digits),
        None => value,
    };

    let (objective, values) = if status.has_solution() {
        let Some(objective) = raw.objective else {
            return Err(SolverError::malformed(
                None,
                format!("status '{}' comes without a primal solution", raw.raw_status),
            ));
        };
        let values = raw
            .values
            .into_iter()
            .map(|(variable, value)| {
                let value = round(value);
                match settings.truncate_precision {
                    Some(precision) => (variable, truncate_significant(value, precision)),
                    None => (variable, value),
                }
            })
            .collect();
        (Some(round(objective + settings.objective_offset)), values)
    } else {
        (None, BTreeMap::new())
    };

    Ok(
        SolveResult::new(status, objective, values, outcome.elapsed.as_secs_f64())
            .with_exit_code(outcome.exit_code)
            .with_raw_status(raw.raw_status),
    )
}

/// Classify a finished process and read its solution file.
///
/// A killed process with no complete file yields `TimeLimitNoSolution`; a
/// process that exited without writing one yields `Error`. Neither is raised.
///
/// # Errors
///
/// Returns the errors of [`parse_solution_text`] and [`into_result`], and
/// `Io` if the file exists but cannot be read.
pub fn parse(
    outcome: &ProcessOutcome,
    solution_path: &Path,
    index_map: &VariableIndexMap,
    settings: &ParseSettings,
) -> Result<SolveResult, SolverError> {
    let text = match fs::read_to_string(solution_path) {
        Ok(text) => Some(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(SolverError::io(
                format!("reading {}", solution_path.display()),
                &err,
            ));
        }
    };
    let solve_time = outcome.elapsed.as_secs_f64();

    let text = match text {
        Some(text) if !outcome.timed_out || is_complete(&text) => text,
        _ if outcome.timed_out => {
            debug!(
                component = "parser",
                operation = "parse",
                status = "timeout",
                "Solver was killed before writing a complete solution"
            );
            return Ok(
                SolveResult::without_solution(SolveStatus::TimeLimitNoSolution, solve_time)
                    .with_exit_code(outcome.exit_code),
            );
        }
        _ => {
            warn!(
                component = "parser",
                operation = "parse",
                status = "error",
                exit_code = outcome.exit_code,
                stderr = %outcome.stderr.trim(),
                "Solver exited without writing a solution file"
            );
            return Ok(
                SolveResult::without_solution(SolveStatus::Error, solve_time)
                    .with_exit_code(outcome.exit_code),
            );
        }
    };

    let raw = parse_solution_text(&text, index_map)?;
    let result = into_result(raw, outcome, settings)?;

    debug!(
        component = "parser",
        operation = "parse",
        status = "success",
        solve_status = result.status().as_str(),
        raw_status = result.raw_status().unwrap_or_default(),
        values = result.values().len(),
        "Parsed solution file"
    );
    if result.status() == SolveStatus::Error {
        warn!(
            component = "parser",
            operation = "parse",
            status = "error",
            exit_code = outcome.exit_code,
            stderr = %outcome.stderr.trim(),
            "Solver reported an error status"
        );
    }

    Ok(result)
}
