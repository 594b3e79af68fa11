//! HiGHS model-status vocabulary.

use highsrun_solver::{SolveStatus, SolverError};

/// Model status as written on the line after `Model status` in a raw solution file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsModelStatus {
    NotSet,
    LoadError,
    ModelError,
    PresolveError,
    SolveError,
    PostsolveError,
    ModelEmpty,
    Optimal,
    Infeasible,
    UnboundedOrInfeasible,
    Unbounded,
    ObjectiveBound,
    ObjectiveTarget,
    TimeLimit,
    IterationLimit,
    Unknown,
    SolutionLimit,
    Interrupt,
    MemoryLimit,
}

/// Primal solution status written after `# Primal solution values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimalStatus {
    None,
    Infeasible,
    Feasible,
}

const TOKENS: &[(&str, HighsModelStatus)] = &[
    ("Not Set", HighsModelStatus::NotSet),
    ("Load error", HighsModelStatus::LoadError),
    ("Model error", HighsModelStatus::ModelError),
    ("Presolve error", HighsModelStatus::PresolveError),
    ("Solve error", HighsModelStatus::SolveError),
    ("Postsolve error", HighsModelStatus::PostsolveError),
    ("Empty", HighsModelStatus::ModelEmpty),
    ("Optimal", HighsModelStatus::Optimal),
    ("Infeasible", HighsModelStatus::Infeasible),
    (
        "Primal infeasible or unbounded",
        HighsModelStatus::UnboundedOrInfeasible,
    ),
    ("Unbounded", HighsModelStatus::Unbounded),
    ("Bound on objective reached", HighsModelStatus::ObjectiveBound),
    ("Target for objective reached", HighsModelStatus::ObjectiveTarget),
    ("Time limit reached", HighsModelStatus::TimeLimit),
    ("Iteration limit reached", HighsModelStatus::IterationLimit),
    ("Unknown", HighsModelStatus::Unknown),
    ("Solution limit reached", HighsModelStatus::SolutionLimit),
    ("Interrupted by user", HighsModelStatus::Interrupt),
    ("Memory limit reached", HighsModelStatus::MemoryLimit),
    // Spellings used by older releases.
    ("Reached time limit", HighsModelStatus::TimeLimit),
    ("Reached iteration limit", HighsModelStatus::IterationLimit),
    ("Objective bound", HighsModelStatus::ObjectiveBound),
    ("Objective target", HighsModelStatus::ObjectiveTarget),
    ("Primal infeasible", HighsModelStatus::Infeasible),
    ("Primal unbounded", HighsModelStatus::Unbounded),
];

impl HighsModelStatus {
    /// Parse a status token. Matching ignores surrounding whitespace and ASCII case.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        TOKENS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(token))
            .map(|(_, status)| *status)
    }

    /// Current spelling of this status.
    pub fn token(self) -> &'static str {
        TOKENS
            .iter()
            .find(|(_, status)| *status == self)
            .map_or("Unknown", |(text, _)| *text)
    }

    /// Whether a limit or interruption stopped the solver before it finished.
    pub fn is_limit(self) -> bool {
        matches!(
            self,
            HighsModelStatus::ObjectiveBound
                | HighsModelStatus::ObjectiveTarget
                | HighsModelStatus::TimeLimit
                | HighsModelStatus::IterationLimit
                | HighsModelStatus::SolutionLimit
                | HighsModelStatus::Interrupt
        )
    }

    /// Map onto the backend-neutral status.
    ///
    /// `killed` is set when the process was terminated at the wall-clock
    /// deadline; an `Optimal` claim is then downgraded to `Feasible`.
    pub fn classify(self, primal: PrimalStatus, killed: bool) -> SolveStatus {
        match self {
            HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty if killed => {
                SolveStatus::Feasible
            }
            HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => SolveStatus::Optimal,
            HighsModelStatus::Infeasible => SolveStatus::Infeasible,
            HighsModelStatus::Unbounded => SolveStatus::Unbounded,
            HighsModelStatus::UnboundedOrInfeasible => SolveStatus::InfeasibleOrUnbounded,
            status if status.is_limit() => match primal {
                PrimalStatus::Feasible => SolveStatus::Feasible,
                PrimalStatus::None | PrimalStatus::Infeasible => SolveStatus::TimeLimitNoSolution,
            },
            _ => SolveStatus::Error,
        }
    }
}

impl std::fmt::Display for HighsModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl PrimalStatus {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            t if t.eq_ignore_ascii_case("None") => Some(PrimalStatus::None),
            t if t.eq_ignore_ascii_case("Infeasible") => Some(PrimalStatus::Infeasible),
            t if t.eq_ignore_ascii_case("Feasible") => Some(PrimalStatus::Feasible),
            _ => None,
        }
    }

    /// Whether column values follow the status line.
    pub fn has_values(self) -> bool {
        !matches!(self, PrimalStatus::None)
    }
}

pub(crate) fn parse_model_status(token: &str, line: usize) -> Result<HighsModelStatus, SolverError> {
    HighsModelStatus::from_token(token).ok_or_else(|| {
        SolverError::malformed(
            Some(line),
            format!("unrecognized model status '{}'", token.trim()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [HighsModelStatus; 19] = [
        HighsModelStatus::NotSet,
        HighsModelStatus::LoadError,
        HighsModelStatus::ModelError,
        HighsModelStatus::PresolveError,
        HighsModelStatus::SolveError,
        HighsModelStatus::PostsolveError,
        HighsModelStatus::ModelEmpty,
        HighsModelStatus::Optimal,
        HighsModelStatus::Infeasible,
        HighsModelStatus::UnboundedOrInfeasible,
        HighsModelStatus::Unbounded,
        HighsModelStatus::ObjectiveBound,
        HighsModelStatus::ObjectiveTarget,
        HighsModelStatus::TimeLimit,
        HighsModelStatus::IterationLimit,
        HighsModelStatus::Unknown,
        HighsModelStatus::SolutionLimit,
        HighsModelStatus::Interrupt,
        HighsModelStatus::MemoryLimit,
    ];

    #[test]
    fn test_every_status_round_trips_through_its_token() {
        for status in ALL {
            assert_eq!(HighsModelStatus::from_token(status.token()), Some(status));
        }
    }

    #[test]
    fn test_every_token_maps_to_exactly_one_status() {
        for (token, _) in TOKENS {
            let matches = TOKENS
                .iter()
                .filter(|(other, _)| other.eq_ignore_ascii_case(token))
                .count();
            assert_eq!(matches, 1, "duplicate token {token}");
        }
    }

    #[test]
    fn test_legacy_and_case_insensitive_tokens() {
        assert_eq!(
            HighsModelStatus::from_token("Reached time limit"),
            Some(HighsModelStatus::TimeLimit)
        );
        assert_eq!(
            HighsModelStatus::from_token("  optimal "),
            Some(HighsModelStatus::Optimal)
        );
        assert_eq!(
            HighsModelStatus::from_token("Primal unbounded"),
            Some(HighsModelStatus::Unbounded)
        );
        assert_eq!(HighsModelStatus::from_token("Solved-ish"), None);
    }

    #[test]
    fn test_classify_terminal_outcomes() {
        use PrimalStatus as P;
        assert_eq!(
            HighsModelStatus::Optimal.classify(P::Feasible, false),
            SolveStatus::Optimal
        );
        assert_eq!(
            HighsModelStatus::ModelEmpty.classify(P::Feasible, false),
            SolveStatus::Optimal
        );
        assert_eq!(
            HighsModelStatus::Infeasible.classify(P::None, false),
            SolveStatus::Infeasible
        );
        assert_eq!(
            HighsModelStatus::Unbounded.classify(P::Feasible, false),
            SolveStatus::Unbounded
        );
        assert_eq!(
            HighsModelStatus::UnboundedOrInfeasible.classify(P::None, false),
            SolveStatus::InfeasibleOrUnbounded
        );
    }

    #[test]
    fn test_classify_limits_depend_on_primal_status() {
        for status in ALL.into_iter().filter(|status| status.is_limit()) {
            assert_eq!(
                status.classify(PrimalStatus::Feasible, false),
                SolveStatus::Feasible
            );
            assert_eq!(
                status.classify(PrimalStatus::None, false),
                SolveStatus::TimeLimitNoSolution
            );
            assert_eq!(
                status.classify(PrimalStatus::Infeasible, true),
                SolveStatus::TimeLimitNoSolution
            );
        }
    }

    #[test]
    fn test_classify_errors() {
        for status in [
            HighsModelStatus::NotSet,
            HighsModelStatus::LoadError,
            HighsModelStatus::ModelError,
            HighsModelStatus::PresolveError,
            HighsModelStatus::SolveError,
            HighsModelStatus::PostsolveError,
            HighsModelStatus::Unknown,
            HighsModelStatus::MemoryLimit,
        ] {
            assert_eq!(
                status.classify(PrimalStatus::Feasible, false),
                SolveStatus::Error
            );
        }
    }

    #[test]
    fn test_killed_process_never_reports_optimal() {
        assert_eq!(
            HighsModelStatus::Optimal.classify(PrimalStatus::Feasible, true),
            SolveStatus::Feasible
        );
    }

    #[test]
    fn test_primal_status_tokens() {
        assert_eq!(PrimalStatus::from_token("Feasible"), Some(PrimalStatus::Feasible));
        assert_eq!(PrimalStatus::from_token("None"), Some(PrimalStatus::None));
        assert_eq!(PrimalStatus::from_token("Maybe"), None);
        assert!(!PrimalStatus::None.has_values());
        assert!(PrimalStatus::Infeasible.has_values());
    }

    #[test]
    fn test_unrecognized_status_is_malformed() {
        let err = parse_model_status("Solved-ish", 2).unwrap_err();
        assert_eq!(err, SolverError::malformed(Some(2), "unrecognized model status 'Solved-ish'"));
    }
}
