//! File-based bridge from highsrun models to the standalone HiGHS executable.
//!
//! One solve call writes an LP problem file and an option file into a fresh
//! directory, runs `highs` on them, and reads the raw solution file back:
//!
//! - [`options`]: option registry and option-file translation
//! - [`mod@export`]: LP export and the [`VariableIndexMap`]
//! - [`process`]: running the executable under a deadline
//! - [`solution`]: solution-file parsing
//! - [`status`]: HiGHS status tokens and their mapping to solve statuses
//! - [`warm_start`]: start files built from variable hints
//! - [`solver`]: the [`Solver`] facade tying the stages together
//! - [`lp_reader`]: reader for exported LP files, used to check exports

pub mod export;
pub mod index_map;
pub mod lp_reader;
pub mod options;
pub mod process;
pub mod solution;
pub mod solver;
pub mod status;
pub mod warm_start;
mod workspace;

pub use export::{ExportedProblem, export};
pub use index_map::VariableIndexMap;
pub use options::{OptionDomain, OptionSpec, known_options, option_spec, translate};
pub use process::{Invocation, ProcessOutcome, invoke};
pub use solution::{ParseSettings, RawSolution, parse, parse_solution_text};
pub use solver::{SolvePhase, Solver};
pub use status::{HighsModelStatus, PrimalStatus};
