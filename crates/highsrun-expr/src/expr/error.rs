//! Expression construction errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearExprError {
    /// Variables and coefficients slices differ in length.
    MismatchedLengths { variables: usize, coefficients: usize },
    /// A product would produce a term above degree two.
    DegreeOverflow { left: usize, right: usize },
}

impl LinearExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LinearExprError::MismatchedLengths { .. } => "EXPR_MISMATCHED_LENGTHS",
            LinearExprError::DegreeOverflow { .. } => "EXPR_DEGREE_OVERFLOW",
        }
    }
}

impl std::fmt::Display for LinearExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearExprError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] variables ({}) and coefficients ({}) must have the same length",
                self.code(),
                variables,
                coefficients
            ),
            LinearExprError::DegreeOverflow { left, right } => write!(
                f,
                "[{}] product of degree {} and degree {} expressions exceeds degree 2",
                self.code(),
                left,
                right
            ),
        }
    }
}

impl std::error::Error for LinearExprError {}
