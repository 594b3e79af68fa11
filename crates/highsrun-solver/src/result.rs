//! Result of one solve call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use highsrun_expr::VariableId;
use serde::{Deserialize, Serialize};

use crate::status::SolveStatus;

/// Status, objective and variable values reported for one solve call.
///
/// Objective and values are only carried when the status has a solution;
/// [`SolveResult::new`] drops them otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    status: SolveStatus,
    objective_value: Option<f64>,
    values: BTreeMap<VariableId, f64>,
    solve_time_seconds: f64,
    exit_code: Option<i32>,
    raw_status: Option<String>,
    artifact_dir: Option<PathBuf>,
}

impl SolveResult {
    pub fn new(
        status: SolveStatus,
        objective_value: Option<f64>,
        values: BTreeMap<VariableId, f64>,
        solve_time_seconds: f64,
    ) -> Self {
        let (objective_value, values) = if status.has_solution() {
            (objective_value, values)
        } else {
            (None, BTreeMap::new())
        };
        Self {
            status,
            objective_value,
            values,
            solve_time_seconds,
            exit_code: None,
            raw_status: None,
            artifact_dir: None,
        }
    }

    /// A result with no solution attached.
    pub fn without_solution(status: SolveStatus, solve_time_seconds: f64) -> Self {
        Self::new(status, None, BTreeMap::new(), solve_time_seconds)
    }

    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// Status text exactly as the solver wrote it.
    pub fn with_raw_status(mut self, raw_status: impl Into<String>) -> Self {
        self.raw_status = Some(raw_status.into());
        self
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    pub fn value(&self, variable: VariableId) -> Option<f64> {
        self.values.get(&variable).copied()
    }

    pub fn values(&self) -> &BTreeMap<VariableId, f64> {
        &self.values
    }

    pub fn solve_time_seconds(&self) -> f64 {
        self.solve_time_seconds
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn raw_status(&self) -> Option<&str> {
        self.raw_status.as_deref()
    }

    /// Directory holding the call's files, when they were retained.
    pub fn artifact_dir(&self) -> Option<&Path> {
        self.artifact_dir.as_deref()
    }
}

impl std::fmt::Display for SolveResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status={}", self.status)?;
        if let Some(objective) = self.objective_value {
            write!(f, " objective={objective}")?;
        }
        write!(
            f,
            " variables={} time={:.3}s",
            self.values.len(),
            self.solve_time_seconds
        )?;
        if let Some(code) = self.exit_code {
            write!(f, " exit_code={code}")?;
        }
        Ok(())
    }
}
