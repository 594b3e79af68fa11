//! Solver error types.

use highsrun_core::ModelError;
use highsrun_expr::VariableId;

/// Error type for solve calls.
///
/// Model and option errors surface before any process is started. Process
/// and parse errors surface after the call's temporary files are cleaned up.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The model uses something the problem file cannot express.
    UnsupportedModelConstruct { reason: String },
    /// Option name not present in the backend's option registry.
    UnknownOption { name: String },
    /// Option value has the wrong type or is outside its domain.
    InvalidOptionValue {
        name: String,
        value: String,
        expected: String,
    },
    /// Warm-start hint or other reference to a variable the model does not declare.
    InvalidVariableId(VariableId),
    /// The solver executable could not be started.
    ExecutableNotFound { executable: String, reason: String },
    /// The solution file does not follow the expected layout.
    MalformedSolution { line: Option<usize>, reason: String },
    /// The solution file names a column the export did not produce.
    IndexReconciliation { column: String, known_columns: usize },
    /// Filesystem or process plumbing failure.
    Io { context: String, message: String },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::UnsupportedModelConstruct { .. } => "MODEL_UNSUPPORTED_CONSTRUCT",
            SolverError::UnknownOption { .. } => "OPTION_UNKNOWN",
            SolverError::InvalidOptionValue { .. } => "OPTION_INVALID_VALUE",
            SolverError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            SolverError::ExecutableNotFound { .. } => "EXECUTABLE_NOT_FOUND",
            SolverError::MalformedSolution { .. } => "SOLUTION_MALFORMED",
            SolverError::IndexReconciliation { .. } => "SOLUTION_INDEX_MISMATCH",
            SolverError::Io { .. } => "SOLVER_IO",
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        SolverError::UnsupportedModelConstruct {
            reason: reason.into(),
        }
    }

    pub fn malformed(line: Option<usize>, reason: impl Into<String>) -> Self {
        SolverError::MalformedSolution {
            line,
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, err: &std::io::Error) -> Self {
        SolverError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::UnsupportedModelConstruct { reason } => {
                write!(f, "[{}] Unsupported model construct: {}", self.code(), reason)
            }
            SolverError::UnknownOption { name } => {
                write!(f, "[{}] Unknown solver option '{}'", self.code(), name)
            }
            SolverError::InvalidOptionValue {
                name,
                value,
                expected,
            } => write!(
                f,
                "[{}] Invalid value '{}' for option '{}' (expected {})",
                self.code(),
                value,
                name,
                expected
            ),
            SolverError::InvalidVariableId(id) => {
                write!(f, "[{}] Variable ID {} does not exist", self.code(), id)
            }
            SolverError::ExecutableNotFound { executable, reason } => write!(
                f,
                "[{}] Cannot start solver executable '{}': {}",
                self.code(),
                executable,
                reason
            ),
            SolverError::MalformedSolution { line, reason } => match line {
                Some(line) => write!(
                    f,
                    "[{}] Malformed solution file at line {}: {}",
                    self.code(),
                    line,
                    reason
                ),
                None => write!(f, "[{}] Malformed solution file: {}", self.code(), reason),
            },
            SolverError::IndexReconciliation {
                column,
                known_columns,
            } => write!(
                f,
                "[{}] Solution column '{}' does not match any of the {} exported columns",
                self.code(),
                column,
                known_columns
            ),
            SolverError::Io { context, message } => {
                write!(f, "[{}] {}: {}", self.code(), context, message)
            }
        }
    }
}

impl std::error::Error for SolverError {}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidVariableId(id) => SolverError::InvalidVariableId(id),
            other => SolverError::unsupported(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unsupported() {
        let err = SolverError::unsupported("quadratic term in constraint c0");
        let msg = err.to_string();
        assert!(msg.starts_with("[MODEL_UNSUPPORTED_CONSTRUCT]"));
        assert!(msg.contains("quadratic"));
    }

    #[test]
    fn test_error_display_option_errors() {
        let err = SolverError::UnknownOption {
            name: "bogus".to_string(),
        };
        assert!(err.to_string().contains("bogus"));

        let err = SolverError::InvalidOptionValue {
            name: "time_limit".to_string(),
            value: "-1.0".to_string(),
            expected: "float in [0, inf]".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("OPTION_INVALID_VALUE"));
        assert!(msg.contains("time_limit"));
        assert!(msg.contains("-1.0"));
    }

    #[test]
    fn test_error_display_malformed_with_and_without_line() {
        let with_line = SolverError::malformed(Some(4), "bad number");
        assert!(with_line.to_string().contains("line 4"));
        let without = SolverError::malformed(None, "empty file");
        assert!(!without.to_string().contains("line"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SolverError::ExecutableNotFound {
                executable: "highs".to_string(),
                reason: "not found".to_string()
            }
            .code(),
            "EXECUTABLE_NOT_FOUND"
        );
        assert_eq!(
            SolverError::IndexReconciliation {
                column: "x9".to_string(),
                known_columns: 2
            }
            .code(),
            "SOLUTION_INDEX_MISMATCH"
        );
        assert_eq!(
            SolverError::io("write", &std::io::Error::other("disk full")).code(),
            "SOLVER_IO"
        );
    }

    #[test]
    fn test_model_error_conversion() {
        let err: SolverError = ModelError::InvalidVariableId(VariableId::new(3)).into();
        assert_eq!(err, SolverError::InvalidVariableId(VariableId::new(3)));

        let err: SolverError = ModelError::NoObjective.into();
        assert_eq!(err.code(), "MODEL_UNSUPPORTED_CONSTRUCT");
    }
}
