//! Constraint expressions: linear expression with comparison sense and RHS.

use crate::expr::core::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    /// Relational operator as written in LP files.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "=",
        }
    }

    /// Parse an LP relational operator. `=<`, `=>` and `<`/`>` are accepted as
    /// their non-strict forms, as LP readers do.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<=" | "=<" | "<" => Some(ComparisonSense::LessEqual),
            ">=" | "=>" | ">" => Some(ComparisonSense::GreaterEqual),
            "=" => Some(ComparisonSense::Equal),
            _ => None,
        }
    }

}

#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Right-hand side once the expression constant is moved across.
    pub fn effective_rhs(&self) -> f64 {
        self.rhs - self.expr.constant()
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::VariableId;

    #[test]
    fn symbols_parse_back() {
        for sense in [
            ComparisonSense::LessEqual,
            ComparisonSense::GreaterEqual,
            ComparisonSense::Equal,
        ] {
            assert_eq!(ComparisonSense::from_symbol(sense.symbol()), Some(sense));
        }
        assert_eq!(
            ComparisonSense::from_symbol("=<"),
            Some(ComparisonSense::LessEqual)
        );
        assert_eq!(ComparisonSense::from_symbol("<>"), None);
    }

    #[test]
    fn effective_rhs_moves_constant() {
        let expr = Expr::new(vec![(VariableId::new(0), 1.0)], 4.0);
        let constraint = ConstraintExpr::new(expr, ComparisonSense::LessEqual, 10.0);
        assert_eq!(constraint.effective_rhs(), 6.0);
    }
}
