//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Objective, Sense, Variable, VariableKind};
use highsrun_expr::{ConstraintExpr, ConstraintId, Expr, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        let bounds = variable.bounds;
        if !bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        if variable.kind == VariableKind::Binary && (bounds.lower != 0.0 || bounds.upper != 1.0) {
            return Err(ModelError::InvalidBinaryBounds {
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }

        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);

        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            var_id = id.inner(),
            kind = variable.kind.as_str(),
            lower = bounds.lower,
            upper = bounds.upper,
            "Added variable"
        );
        Ok(id)
    }

    /// Add a constraint to the model.
    ///
    /// Quadratic terms are stored as given; whether they are acceptable is up
    /// to the solver bridge that exports the model.
    pub fn add_constraint(&mut self, constraint: ConstraintExpr) -> Result<ConstraintId, ModelError> {
        self.validate_expr(constraint.expr())?;
        if !constraint.rhs().is_finite() {
            return Err(ModelError::InvalidRhs {
                rhs: constraint.rhs(),
            });
        }

        let id = ConstraintId::new(self.constraints.len() as u32);
        tracing::trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint_id = id.inner(),
            sense = constraint.sense().as_str(),
            rhs = constraint.rhs(),
            terms = constraint.expr().linear_terms().len(),
            "Added constraint"
        );
        self.constraints.push(constraint);
        Ok(id)
    }

    /// Set the objective function, replacing any previous one.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let sense = objective.sense.ok_or(ModelError::NoObjective)?;
        self.validate_expr(&objective.expr)?;

        self.objective = objective;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms = self.objective.expr.linear_terms().len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize an expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn minimize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_new_objective(Sense::Minimize, expr)
    }

    /// Maximize an expression.
    ///
    /// Returns an error if the model already has an objective.
    pub fn maximize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.set_new_objective(Sense::Maximize, expr)
    }

    fn set_new_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        if self.objective.sense.is_some() {
            return Err(ModelError::MultipleObjectives);
        }
        self.set_objective(Objective {
            sense: Some(sense),
            expr,
        })
    }

    fn validate_expr(&self, expr: &Expr) -> Result<(), ModelError> {
        for var_id in expr.variables() {
            self.ensure_variable_exists(var_id)?;
        }
        let coefficients = expr
            .linear_terms()
            .iter()
            .map(|(_, c)| *c)
            .chain(expr.quadratic_terms().iter().map(|(_, _, c)| *c))
            .chain(std::iter::once(expr.constant()));
        for coefficient in coefficients {
            if !coefficient.is_finite() {
                return Err(ModelError::InvalidCoefficient { coefficient });
            }
        }
        Ok(())
    }
}
