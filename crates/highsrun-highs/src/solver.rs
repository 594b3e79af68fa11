//! Solver facade: translate, export, invoke, parse.

use std::path::Path;

use highsrun_core::ModelView;
use highsrun_expr::VariableId;
use highsrun_solver::{Solve, SolveResult, SolverConfig, SolverError, SolverOptions};
use tracing::{debug, trace, warn};

use crate::export::{ExportedProblem, export};
use crate::index_map::VariableIndexMap;
use crate::options::translate;
use crate::process::{Invocation, invoke};
use crate::solution::{ParseSettings, parse};
use crate::warm_start::render_start;
use crate::workspace::CallWorkspace;

/// Stage of a single solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
    Idle,
    Exporting,
    Invoking,
    Parsing,
    Done,
    Failed,
}

impl SolvePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SolvePhase::Idle => "idle",
            SolvePhase::Exporting => "exporting",
            SolvePhase::Invoking => "invoking",
            SolvePhase::Parsing => "parsing",
            SolvePhase::Done => "done",
            SolvePhase::Failed => "failed",
        }
    }
}

struct PhaseTracker {
    phase: SolvePhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: SolvePhase::Idle,
        }
    }

    fn advance(&mut self, next: SolvePhase) {
        trace!(
            component = "solver",
            operation = "phase",
            status = "success",
            from = self.phase.as_str(),
            to = next.as_str(),
            "Solve phase transition"
        );
        self.phase = next;
    }

    fn fail(&mut self, err: SolverError) -> SolverError {
        warn!(
            component = "solver",
            operation = "solve",
            status = "error",
            phase = self.phase.as_str(),
            code = err.code(),
            error = %err,
            "Solve failed"
        );
        self.phase = SolvePhase::Failed;
        err
    }
}

/// Inputs prepared before any file or process exists.
struct Prepared {
    options_file: String,
    problem: ExportedProblem,
    start_file: Option<String>,
    time_limit: Option<f64>,
}

/// HiGHS executable bridge.
///
/// Holds only configuration; every call gets its own directory, so one
/// `Solver` can serve concurrent calls from several threads.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Solver with default configuration (`highs` on `PATH`).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solver configured from `HIGHSRUN_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptionValue` for unparsable variables.
    pub fn from_env() -> Result<Self, SolverError> {
        SolverConfig::from_env().map(Self::with_config)
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `model` with per-call `options`.
    ///
    /// # Errors
    ///
    /// Model and option errors are returned before the solver starts.
    /// Process and parse errors are returned after the call's files are
    /// removed (or retained, when configured).
    pub fn solve<M: ModelView>(
        &self,
        model: &M,
        options: &SolverOptions,
    ) -> Result<SolveResult, SolverError> {
        self.run(model, options, None)
    }

    /// Solve starting from the given variable values.
    ///
    /// # Errors
    ///
    /// Same as [`Solver::solve`]; hints on unknown variables fail with
    /// `InvalidVariableId` before the solver starts.
    pub fn solve_with_start<M: ModelView>(
        &self,
        model: &M,
        options: &SolverOptions,
        hints: &[(VariableId, f64)],
    ) -> Result<SolveResult, SolverError> {
        self.run(model, options, Some(hints))
    }

    /// Export `model` to an LP file at `path` without solving it.
    ///
    /// # Errors
    ///
    /// Returns export errors and `Io` on write failure.
    pub fn write_problem<M: ModelView>(
        &self,
        model: &M,
        path: &Path,
    ) -> Result<VariableIndexMap, SolverError> {
        let problem = export(model)?;
        problem.write_to(path)?;
        debug!(
            component = "solver",
            operation = "write_problem",
            status = "success",
            path = %path.display(),
            columns = problem.num_columns(),
            rows = problem.num_rows(),
            "Wrote problem file"
        );
        Ok(problem.into_parts().1)
    }

    fn prepare<M: ModelView>(
        &self,
        model: &M,
        options: &SolverOptions,
        hints: Option<&[(VariableId, f64)]>,
    ) -> Result<Prepared, SolverError> {
        let options = match self.config.time_limit {
            Some(limit) => options.clone().with_default("time_limit", limit),
            None => options.clone(),
        };
        let options_file = translate(&options)?;
        let problem = export(model)?;
        let start_file = hints
            .map(|hints| render_start(model, problem.index_map(), hints))
            .transpose()?;
        Ok(Prepared {
            options_file,
            problem,
            start_file,
            time_limit: options.time_limit(),
        })
    }

    fn run<M: ModelView>(
        &self,
        model: &M,
        options: &SolverOptions,
        hints: Option<&[(VariableId, f64)]>,
    ) -> Result<SolveResult, SolverError> {
        let mut tracker = PhaseTracker::new();

        tracker.advance(SolvePhase::Exporting);
        let prepared = self
            .prepare(model, options, hints)
            .map_err(|err| tracker.fail(err))?;
        let workspace = CallWorkspace::create(self.config.work_dir.as_deref())
            .map_err(|err| tracker.fail(err))?;

        let outcome = self
            .execute(&mut tracker, &workspace, &prepared)
            .map_err(|err| tracker.fail(err));

        let artifact_dir = if self.config.keep_artifacts {
            Some(workspace.retain())
        } else {
            workspace.remove();
            None
        };

        let mut result = outcome?;
        if let Some(dir) = artifact_dir {
            result = result.with_artifact_dir(dir);
        }
        tracker.advance(SolvePhase::Done);

        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            solve_status = result.status().as_str(),
            objective = result.objective_value(),
            solve_time_s = result.solve_time_seconds(),
            "Solve completed"
        );
        Ok(result)
    }

    fn execute(
        &self,
        tracker: &mut PhaseTracker,
        workspace: &CallWorkspace,
        prepared: &Prepared,
    ) -> Result<SolveResult, SolverError> {
        let problem_path = workspace.problem_path();
        let options_path = workspace.options_path();
        let solution_path = workspace.solution_path();
        workspace.write(&problem_path, prepared.problem.content())?;
        workspace.write(&options_path, &prepared.options_file)?;

        let mut invocation = Invocation::new(
            &self.config.executable,
            &problem_path,
            &options_path,
            &solution_path,
            workspace.path(),
        )
        .with_leading_args(self.config.executable_args.clone())
        .with_deadline(self.config.kill_deadline(prepared.time_limit))
        .with_poll_interval(self.config.poll_interval());
        if let Some(start) = &prepared.start_file {
            let start_path = workspace.start_path();
            workspace.write(&start_path, start)?;
            invocation = invocation.with_start_file(start_path);
        }

        tracker.advance(SolvePhase::Invoking);
        let outcome = invoke(&invocation)?;

        tracker.advance(SolvePhase::Parsing);
        let settings = ParseSettings {
            objective_offset: prepared.problem.objective_offset(),
            rounding_digits: self.config.rounding_digits,
            truncate_precision: self.config.truncate_precision,
        };
        parse(
            &outcome,
            &solution_path,
            prepared.problem.index_map(),
            &settings,
        )
    }
}

impl Solve for Solver {
    type Solution = SolveResult;

    fn solve<M: ModelView>(
        &self,
        model: &M,
        options: &SolverOptions,
    ) -> Result<Self::Solution, SolverError> {
        Solver::solve(self, model, options)
    }
}
