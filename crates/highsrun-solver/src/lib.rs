//! Backend-neutral solver abstractions for highsrun.
//!
//! # Overview
//!
//! - [`SolverOptions`]: named solver options handed to a backend per solve call
//! - [`SolverConfig`]: how a backend is launched (executable, limits, artifacts)
//! - [`SolveStatus`]: terminal classification of a solve attempt
//! - [`SolveResult`]: status, objective and per-variable values of one solve
//! - [`SolverError`]: everything that makes a solve call fail
//! - [`Solve`] / [`SolutionView`]: traits backends implement

mod config;
mod error;
mod options;
mod result;
mod status;
mod traits;

pub use config::SolverConfig;
pub use error::SolverError;
pub use options::{OptionValue, SolverOptions};
pub use result::SolveResult;
pub use status::SolveStatus;
pub use traits::{SolutionView, Solve};
