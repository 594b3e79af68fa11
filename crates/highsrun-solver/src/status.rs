//! Solve status types.

use serde::{Deserialize, Serialize};

/// Terminal status of one solve call.
///
/// Infeasibility, unboundedness and running out of time are outcomes, not
/// errors; they are reported here rather than through `SolverError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// A limit stopped the solver after it found a feasible solution.
    Feasible,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Solver proved the problem is infeasible or unbounded without deciding which.
    InfeasibleOrUnbounded,
    /// A limit stopped the solver before any feasible solution was found.
    TimeLimitNoSolution,
    /// The solver reported an internal failure or produced no result.
    Error,
}

impl SolveStatus {
    /// Check if the status indicates an optimal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    /// Whether a primal solution (and objective value) accompanies this status.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Check if the status indicates infeasibility.
    pub fn is_infeasible(self) -> bool {
        matches!(self, SolveStatus::Infeasible)
    }

    /// Check if the status indicates unboundedness.
    pub fn is_unbounded(self) -> bool {
        matches!(self, SolveStatus::Unbounded)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::InfeasibleOrUnbounded => "infeasible_or_unbounded",
            SolveStatus::TimeLimitNoSolution => "time_limit_no_solution",
            SolveStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
