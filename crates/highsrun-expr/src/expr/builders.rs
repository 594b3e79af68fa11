//! Builder functions for constructing linear expressions.

use crate::expr::core::Expr;
use crate::expr::error::LinearExprError;
use crate::ids::VariableId;

/// Build an Expr by zipping variables with coefficients.
///
/// Zero coefficients are dropped.
pub fn from_pairs(variables: &[VariableId], coefficients: &[f64]) -> Result<Expr, LinearExprError> {
    if variables.len() != coefficients.len() {
        return Err(LinearExprError::MismatchedLengths {
            variables: variables.len(),
            coefficients: coefficients.len(),
        });
    }
    let terms = variables
        .iter()
        .zip(coefficients)
        .filter(|(_, c)| **c != 0.0)
        .map(|(v, c)| (*v, *c))
        .collect();
    Ok(Expr::from_linear(terms))
}

/// Sum several expressions, keeping every term and adding the constants.
///
/// Duplicate variable terms are NOT merged; use `normalized_terms()` on the
/// result when consolidation is needed.
pub fn linear_sum(exprs: Vec<Expr>) -> Expr {
    exprs
        .iter()
        .fold(Expr::new_empty(), |acc, expr| acc.add(expr))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_rejects_mismatched_lengths() {
        let result = from_pairs(&[VariableId::new(1), VariableId::new(2)], &[1.0]);
        assert_eq!(
            result.unwrap_err(),
            LinearExprError::MismatchedLengths {
                variables: 2,
                coefficients: 1
            }
        );
    }

    #[test]
    fn from_pairs_filters_zero_coefficients() {
        let expr = from_pairs(&[VariableId::new(1), VariableId::new(2)], &[0.0, 3.5])
            .expect("pairs should build");
        let terms = expr
            .linear_terms()
            .iter()
            .map(|(id, coeff)| (id.inner(), *coeff))
            .collect::<Vec<_>>();
        assert_eq!(terms, vec![(2, 3.5)]);
    }

    #[test]
    fn linear_sum_concatenates_terms_and_constants() {
        let left = Expr::new(vec![(VariableId::new(1), 1.0)], 2.0);
        let right = Expr::new(vec![(VariableId::new(2), 2.0)], 3.0);
        let summed = linear_sum(vec![left, right]);
        let terms = summed
            .linear_terms()
            .iter()
            .map(|(id, coeff)| (id.inner(), *coeff))
            .collect::<Vec<_>>();
        assert_eq!(terms, vec![(1, 1.0), (2, 2.0)]);
        assert_eq!(summed.constant(), 5.0);
    }
}
