//! Expression types for optimization modeling.
//!
//! - `core`: Expr: linear and quadratic terms + constant
//! - `constraint`: ConstraintExpr: expression with comparison sense and RHS
//! - `builders`: helpers that assemble expressions from parallel inputs
//! - `error`: Expression construction errors

pub mod builders;
pub mod constraint;
pub mod core;
pub mod error;

pub use builders::{from_pairs, linear_sum};
pub use constraint::{ComparisonSense, ConstraintExpr};
pub use core::Expr;
pub use error::LinearExprError;
