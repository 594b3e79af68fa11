//! Read-only access to a model's variables, constraints and objective.

use crate::model::Model;
use crate::types::{Objective, Variable};
use highsrun_expr::{ConstraintExpr, ConstraintId, VariableId};

/// What a solver bridge needs to read from a model.
///
/// Iteration order is part of the contract: bridges assign file positions in
/// the order these iterators yield, so an unchanged model must yield the same
/// sequence every time.
pub trait ModelView {
    /// Declared variables in declaration order.
    fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)>;

    /// Constraints in declaration order.
    fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &ConstraintExpr)>;

    /// The model's single objective.
    fn objective(&self) -> &Objective;
}

impl ModelView for Model {
    fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, var)| (VariableId::new(index as u32), var))
    }

    fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &ConstraintExpr)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(index, con)| (ConstraintId::new(index as u32), con))
    }

    fn objective(&self) -> &Objective {
        &self.objective
    }
}
