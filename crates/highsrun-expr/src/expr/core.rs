//! Core expression type: terms by degree + constant.
//!
//! Linear and quadratic terms live in separate Vecs. Solver bridges in this
//! workspace only accept degree <= 1; quadratic terms exist so that a host
//! framework can hand over what it has and get a precise rejection instead of
//! a silently truncated model.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::expr::error::LinearExprError;
use crate::ids::VariableId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Expr {
    constant: f64,
    linear: Vec<(VariableId, f64)>,
    quadratic: Vec<(VariableId, VariableId, f64)>,
}

impl Expr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (all zeros).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Expression from linear terms and constant.
    pub fn new(linear: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self {
            constant,
            linear,
            ..Default::default()
        }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            linear: vec![(var_id, coeff)],
            ..Default::default()
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VariableId) -> Self {
        Self::term(var_id, 1.0)
    }

    /// Single quadratic term: coeff * a * b.
    pub fn quadratic_term(a: VariableId, b: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            quadratic: vec![(a, b, coeff)],
            ..Default::default()
        }
    }

    /// From raw linear terms, no constant.
    pub fn from_linear(linear: Vec<(VariableId, f64)>) -> Self {
        Self {
            linear,
            ..Default::default()
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.linear
    }

    pub fn quadratic_terms(&self) -> &[(VariableId, VariableId, f64)] {
        &self.quadratic
    }

    /// Consume and return (linear_terms, constant).
    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.linear, self.constant)
    }

    /// Max degree of any non-zero term (0 = constant only).
    pub fn degree(&self) -> usize {
        if self.quadratic.iter().any(|(_, _, c)| *c != 0.0) {
            2
        } else {
            usize::from(self.linear.iter().any(|(_, c)| *c != 0.0))
        }
    }

    /// Every variable referenced by a linear or quadratic term, in term order.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.linear.iter().map(|(v, _)| *v).chain(
            self.quadratic
                .iter()
                .flat_map(|(a, b, _)| [*a, *b].into_iter()),
        )
    }

    // ── Operations (degree-agnostic) ────────────────────────

    /// Scale all terms and constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            linear: self
                .linear
                .iter()
                .map(|(v, c)| (*v, *c * by))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
            quadratic: self
                .quadratic
                .iter()
                .map(|(a, b, c)| (*a, *b, *c * by))
                .filter(|(_, _, c)| *c != 0.0)
                .collect(),
        }
    }

    /// Add another expression (merges all degree terms + constants).
    pub fn add(&self, other: &Expr) -> Self {
        let mut linear = Vec::with_capacity(self.linear.len() + other.linear.len());
        linear.extend_from_slice(&self.linear);
        linear.extend_from_slice(&other.linear);

        let mut quadratic = Vec::with_capacity(self.quadratic.len() + other.quadratic.len());
        quadratic.extend_from_slice(&self.quadratic);
        quadratic.extend_from_slice(&other.quadratic);

        Self {
            constant: self.constant + other.constant,
            linear,
            quadratic,
        }
    }

    /// Multiply two expressions. Fails when the result would exceed degree 2.
    pub fn product(&self, other: &Expr) -> Result<Self, LinearExprError> {
        let (left, right) = (self.degree(), other.degree());
        if left + right > 2 {
            return Err(LinearExprError::DegreeOverflow { left, right });
        }

        let mut result = self.scale(other.constant).add(&Expr {
            constant: 0.0,
            linear: other
                .linear
                .iter()
                .map(|(v, c)| (*v, *c * self.constant))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
            quadratic: other
                .quadratic
                .iter()
                .map(|(a, b, c)| (*a, *b, *c * self.constant))
                .filter(|(_, _, c)| *c != 0.0)
                .collect(),
        });
        for (a, ca) in &self.linear {
            for (b, cb) in &other.linear {
                let coeff = ca * cb;
                if coeff != 0.0 {
                    result.quadratic.push((*a, *b, coeff));
                }
            }
        }
        Ok(result)
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            linear: self.linear.clone(),
            quadratic: self.quadratic.clone(),
        }
    }

    /// Copy with constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            linear: self.linear.clone(),
            quadratic: self.quadratic.clone(),
        }
    }

    /// Merged linear terms with duplicates combined and zeros dropped.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in &self.linear {
            if *coeff == 0.0 {
                continue;
            }
            *merged.entry(*var_id).or_insert(0.0) += *coeff;
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    /// Evaluate the expression at a point. Variables missing from `value_of`
    /// make the whole evaluation `None`.
    pub fn evaluate(&self, value_of: impl Fn(VariableId) -> Option<f64>) -> Option<f64> {
        let mut total = self.constant;
        for (var_id, coeff) in &self.linear {
            total += coeff * value_of(*var_id)?;
        }
        for (a, b, coeff) in &self.quadratic {
            total += coeff * value_of(*a)? * value_of(*b)?;
        }
        Some(total)
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.constant)
    }

    pub fn compare_expr(&self, other: &Expr, sense: ComparisonSense) -> ConstraintExpr {
        let combined = self.add(&other.scale(-1.0));
        ConstraintExpr::new(combined.without_constant(), sense, -combined.constant)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs.scale(-1.0))
    }
}

impl std::ops::Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::VariableId;
    use crate::expr::{ComparisonSense, ConstraintExpr, Expr, LinearExprError};

    fn x() -> VariableId {
        VariableId::new(1)
    }

    fn y() -> VariableId {
        VariableId::new(2)
    }

    #[test]
    fn from_constant() {
        let e = Expr::from_constant(5.0);
        assert_eq!(e.constant(), 5.0);
        assert!(e.linear_terms().is_empty());
        assert_eq!(e.degree(), 0);
    }

    #[test]
    fn add_constant() {
        let e = Expr::var(x()).add_constant(3.0);
        assert_eq!(e.constant(), 3.0);
        assert_eq!(e.linear_terms().len(), 1);
    }

    #[test]
    fn scale_with_constant() {
        let e = Expr::new(vec![(x(), 2.0)], 3.0);
        let scaled = e.scale(2.0);
        assert_eq!(scaled.constant(), 6.0);
        assert_eq!(scaled.linear_terms()[0].1, 4.0);
    }

    #[test]
    fn operators_compose() {
        let e = (Expr::var(x()) * 5.0 + Expr::var(y()) * 4.0) - Expr::from_constant(1.0);
        assert_eq!(e.constant(), -1.0);
        assert_eq!(e.normalized_terms(), vec![(x(), 5.0), (y(), 4.0)]);
        let negated = -e;
        assert_eq!(negated.constant(), 1.0);
    }

    #[test]
    fn le_scalar() {
        let e = Expr::new(vec![(x(), 1.0)], 3.0);
        let c = e.le_scalar(10.0);
        assert_eq!(c.sense(), ComparisonSense::LessEqual);
        assert_eq!(c.rhs(), 7.0); // 10.0 - 3.0
        assert_eq!(c.expr().constant(), 0.0);
    }

    #[test]
    fn ge_expr() {
        let lhs = Expr::new(vec![(x(), 1.0)], 3.0);
        let rhs = Expr::new(vec![(y(), 1.0)], 7.0);
        let c = lhs.ge_expr(&rhs);
        assert_eq!(c.sense(), ComparisonSense::GreaterEqual);
        assert_eq!(c.rhs(), 4.0); // 7.0 - 3.0
        assert_eq!(c.expr().linear_terms().len(), 2);
    }

    #[test]
    fn eq_scalar() {
        let e = Expr::from_linear(vec![(x(), 1.0)]);
        let c = e.eq_scalar(5.0);
        assert_eq!(c.sense(), ComparisonSense::Equal);
        assert_eq!(c.rhs(), 5.0);
    }

    #[test]
    fn degree_detection() {
        assert_eq!(Expr::from_constant(1.0).degree(), 0);
        assert_eq!(Expr::var(x()).degree(), 1);
        assert_eq!(Expr::quadratic_term(x(), y(), 2.0).degree(), 2);
        assert_eq!(Expr::from_linear(vec![(x(), 0.0)]).degree(), 0);
    }

    #[test]
    fn product_of_linear_terms_is_quadratic() {
        let a = Expr::new(vec![(x(), 2.0)], 1.0);
        let b = Expr::new(vec![(y(), 3.0)], 0.0);
        let p = a.product(&b).expect("degree 2 product");
        assert_eq!(p.degree(), 2);
        assert_eq!(p.quadratic_terms(), &[(x(), y(), 6.0)]);
        assert_eq!(p.normalized_terms(), vec![(y(), 3.0)]);
    }

    #[test]
    fn product_rejects_cubic() {
        let q = Expr::quadratic_term(x(), x(), 1.0);
        let err = q.product(&Expr::var(y())).unwrap_err();
        assert_eq!(err, LinearExprError::DegreeOverflow { left: 2, right: 1 });
    }

    #[test]
    fn variables_lists_linear_then_quadratic() {
        let e = Expr::var(x()).add(&Expr::quadratic_term(y(), x(), 1.0));
        assert_eq!(e.variables().collect::<Vec<_>>(), vec![x(), y(), x()]);
    }

    #[test]
    fn evaluate_at_point() {
        let e = Expr::new(vec![(x(), 2.0), (y(), -1.0)], 0.5);
        let value = e.evaluate(|v| if v == x() { Some(3.0) } else { Some(1.0) });
        assert_eq!(value, Some(5.5));
        assert_eq!(e.evaluate(|_| None), None);
    }

    #[test]
    fn without_constant() {
        let e = Expr::new(vec![(x(), 1.0)], 5.0);
        let stripped = e.without_constant();
        assert_eq!(stripped.constant(), 0.0);
        assert_eq!(stripped.linear_terms().len(), 1);
    }

    #[test]
    fn normalized_terms_merges_duplicates() {
        let expr = Expr::term(VariableId::new(1), 2.0)
            .add(&Expr::term(VariableId::new(1), -2.0))
            .add(&Expr::term(VariableId::new(2), 4.0));

        let normalized = expr
            .normalized_terms()
            .into_iter()
            .map(|(id, coeff)| (id.inner(), coeff))
            .collect::<Vec<_>>();
        assert_eq!(normalized, vec![(2, 4.0)]);
    }

    #[test]
    fn constraint_expr_exposes_parts() {
        let expr = Expr::term(VariableId::new(1), 1.0);
        let constraint = ConstraintExpr::new(expr.clone(), ComparisonSense::LessEqual, 10.0);

        assert_eq!(constraint.sense(), ComparisonSense::LessEqual);
        assert_eq!(constraint.rhs(), 10.0);
        assert_eq!(constraint.expr().linear_terms().len(), 1);

        let (inner, sense, rhs) = constraint.into_parts();
        assert_eq!(sense, ComparisonSense::LessEqual);
        assert_eq!(rhs, 10.0);
        assert_eq!(inner.linear_terms().len(), 1);
    }
}
