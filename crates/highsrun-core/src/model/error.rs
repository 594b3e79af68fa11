//! Model error types.

use highsrun_expr::{ConstraintId, VariableId};

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Invalid variable ID
    InvalidVariableId(VariableId),
    /// Invalid variable bounds
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Binary variables must keep bounds [0, 1]
    InvalidBinaryBounds { lower: f64, upper: f64 },
    /// Invalid constraint ID
    InvalidConstraintId(ConstraintId),
    /// Coefficient is NaN or infinite
    InvalidCoefficient { coefficient: f64 },
    /// Right-hand side is NaN or infinite
    InvalidRhs { rhs: f64 },
    /// No objective sense set
    NoObjective,
    /// Objective already set
    MultipleObjectives,
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidBinaryBounds { .. } => "VARIABLE_INVALID_BINARY_BOUNDS",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::InvalidRhs { .. } => "CONSTRAINT_INVALID_RHS",
            ModelError::NoObjective => "OBJECTIVE_MISSING",
            ModelError::MultipleObjectives => "OBJECTIVE_ALREADY_SET",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidVariableId(id) => write!(
                f,
                "[{}] Variable ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidVariableBounds { lower, upper } => write!(
                f,
                "[{}] Variable bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidBinaryBounds { lower, upper } => write!(
                f,
                "[{}] Binary variable bounds must be [0, 1] (got [{}, {}])",
                self.code(),
                lower,
                upper
            ),
            ModelError::InvalidConstraintId(id) => write!(
                f,
                "[{}] Constraint ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::InvalidCoefficient { coefficient } => write!(
                f,
                "[{}] Coefficient must be finite (got {})",
                self.code(),
                coefficient
            ),
            ModelError::InvalidRhs { rhs } => write!(
                f,
                "[{}] Constraint right-hand side must be finite (got {})",
                self.code(),
                rhs
            ),
            ModelError::NoObjective => {
                write!(f, "[{}] Model has no objective defined", self.code())
            }
            ModelError::MultipleObjectives => write!(
                f,
                "[{}] Model already has an objective; use set_objective to replace",
                self.code()
            ),
        }
    }
}

impl std::error::Error for ModelError {}
