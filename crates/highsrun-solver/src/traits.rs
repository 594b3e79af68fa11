//! Solver traits.

use highsrun_core::ModelView;
use highsrun_expr::VariableId;

use crate::error::SolverError;
use crate::options::SolverOptions;
use crate::result::SolveResult;
use crate::status::SolveStatus;

/// A backend able to solve a model.
pub trait Solve {
    type Solution: SolutionView;

    /// Solve `model` with per-call `options`.
    ///
    /// Terminal solver outcomes (infeasible, unbounded, time limit) are
    /// returned as a solution with the matching status, not as errors.
    fn solve<M: ModelView>(
        &self,
        model: &M,
        options: &SolverOptions,
    ) -> Result<Self::Solution, SolverError>;
}

/// Read access to a solve result.
pub trait SolutionView {
    fn status(&self) -> SolveStatus;

    fn objective_value(&self) -> Option<f64>;

    fn value(&self, variable: VariableId) -> Option<f64>;

    fn solve_time_seconds(&self) -> f64;

    fn is_optimal(&self) -> bool {
        self.status().is_optimal()
    }

    fn is_feasible(&self) -> bool {
        self.status().has_solution()
    }

    fn is_infeasible(&self) -> bool {
        self.status().is_infeasible()
    }

    fn is_unbounded(&self) -> bool {
        self.status().is_unbounded()
    }
}

impl SolutionView for SolveResult {
    fn status(&self) -> SolveStatus {
        SolveResult::status(self)
    }

    fn objective_value(&self) -> Option<f64> {
        SolveResult::objective_value(self)
    }

    fn value(&self, variable: VariableId) -> Option<f64> {
        SolveResult::value(self, variable)
    }

    fn solve_time_seconds(&self) -> f64 {
        SolveResult::solve_time_seconds(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn view_is_feasible<S: SolutionView>(solution: &S) -> bool {
        solution.is_feasible()
    }

    #[test]
    fn test_solution_view_defaults() {
        let feasible = SolveResult::new(
            SolveStatus::Feasible,
            Some(4.0),
            BTreeMap::from([(VariableId::new(0), 1.0)]),
            1.0,
        );
        assert!(view_is_feasible(&feasible));
        assert!(!SolutionView::is_optimal(&feasible));
        assert_eq!(SolutionView::value(&feasible, VariableId::new(0)), Some(1.0));

        let unbounded = SolveResult::without_solution(SolveStatus::Unbounded, 0.0);
        assert!(SolutionView::is_unbounded(&unbounded));
        assert!(!view_is_feasible(&unbounded));
    }
}
