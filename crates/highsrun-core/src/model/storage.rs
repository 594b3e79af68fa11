//! Storage access methods for the model.

use crate::types::Variable;
use highsrun_expr::{ConstraintExpr, ConstraintId, VariableId};

use super::Model;
use super::error::ModelError;

impl Model {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.inner() as usize)
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Result<&ConstraintExpr, ModelError> {
        self.constraints
            .get(id.inner() as usize)
            .ok_or(ModelError::InvalidConstraintId(id))
    }
}
