pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr, LinearExprError, from_pairs, linear_sum};
pub use ids::{ConstraintId, VariableId};
