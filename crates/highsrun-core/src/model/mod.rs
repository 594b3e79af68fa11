//! Model module for building optimization models.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives
//! - [`storage`]: Accessors over the ordered storage

mod builder;
mod error;
mod storage;

use crate::types::{Objective, Variable};
use highsrun_expr::{ConstraintExpr, VariableId};

pub use error::ModelError;

/// An in-memory linear or mixed-integer model.
///
/// Variables and constraints are kept in declaration order; their ids are
/// their positions. The model never validates linearity, that is the job of
/// the solver bridge that exports it.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<ConstraintExpr>,
    pub(crate) objective: Objective,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if (id.inner() as usize) < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }
}
