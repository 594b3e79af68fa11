use highsrun_expr::Expr;

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableKind {
    #[default]
    Continuous,
    Integer,
    Binary,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Continuous => "continuous",
            VariableKind::Integer => "integer",
            VariableKind::Binary => "binary",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, VariableKind::Integer | VariableKind::Binary)
    }
}

/// Bounds for a variable. Infinite values mean "no bound on that side".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `[0, +inf)`
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// `(-inf, +inf)`
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn at_least(lower: f64) -> Self {
        Self::new(lower, f64::INFINITY)
    }

    pub fn at_most(upper: f64) -> Self {
        Self::new(f64::NEG_INFINITY, upper)
    }

    pub fn has_lower(&self) -> bool {
        self.lower != f64::NEG_INFINITY
    }

    pub fn has_upper(&self) -> bool {
        self.upper != f64::INFINITY
    }

    pub fn is_valid(&self) -> bool {
        !self.lower.is_nan()
            && !self.upper.is_nan()
            && self.lower <= self.upper
            && self.lower != f64::INFINITY
            && self.upper != f64::NEG_INFINITY
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

/// A decision variable with a domain and bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub kind: VariableKind,
    pub bounds: Bounds,
}

impl Variable {
    /// Create a binary variable with bounds [0, 1].
    pub fn binary() -> Self {
        Self {
            kind: VariableKind::Binary,
            bounds: Bounds::new(0.0, 1.0),
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(bounds: Bounds) -> Self {
        Self {
            kind: VariableKind::Continuous,
            bounds,
        }
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(bounds: Bounds) -> Self {
        Self {
            kind: VariableKind::Integer,
            bounds,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.kind.is_integer()
    }
}

/// Objective function with a sense and an expression.
///
/// The expression constant is an offset that solvers never see; bridges add it
/// back to the reported objective value.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub sense: Option<Sense>,
    pub expr: Expr,
}

impl Objective {
    /// Create a new empty objective
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimize(expr: Expr) -> Self {
        Self {
            sense: Some(Sense::Minimize),
            expr,
        }
    }

    pub fn maximize(expr: Expr) -> Self {
        Self {
            sense: Some(Sense::Maximize),
            expr,
        }
    }
}
