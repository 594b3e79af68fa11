//! HiGHS option registry and option-file translation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use highsrun_solver::{OptionValue, SolverError, SolverOptions};
use tracing::debug;

const OFF_CHOOSE_ON: &[&str] = &["off", "choose", "on"];
const SOLVERS: &[&str] = &["simplex", "choose", "ipm", "pdlp"];
const HIGHS_INT_MAX: i64 = i32::MAX as i64;

/// Accepted values for one option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionDomain {
    Bool,
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Choice(&'static [&'static str]),
    Text,
}

impl OptionDomain {
    /// Human-readable domain used in error messages.
    pub fn describe(&self) -> String {
        match self {
            OptionDomain::Bool => "bool".to_string(),
            OptionDomain::Int { min, max } => format!("integer in [{min}, {max}]"),
            OptionDomain::Float { min, max } => format!("number in [{min}, {max}]"),
            OptionDomain::Choice(choices) => format!("one of {}", choices.join(", ")),
            OptionDomain::Text => "single-line string".to_string(),
        }
    }

    /// Render `value` in option-file syntax, or `None` when it is outside the domain.
    fn render(&self, value: &OptionValue) -> Option<String> {
        match (self, value) {
            (OptionDomain::Bool, OptionValue::Bool(flag)) => Some(flag.to_string()),
            (OptionDomain::Int { min, max }, OptionValue::Int(number)) => {
                (min..=max).contains(&number).then(|| number.to_string())
            }
            (OptionDomain::Float { min, max }, OptionValue::Int(_) | OptionValue::Float(_)) => {
                let number = value.as_f64()?;
                (!number.is_nan() && *min <= number && number <= *max)
                    .then(|| format!("{number:?}"))
            }
            (OptionDomain::Choice(choices), OptionValue::Text(text)) => {
                choices.contains(&text.as_str()).then(|| text.clone())
            }
            (OptionDomain::Text, OptionValue::Text(text)) => {
                (!text.contains(['\n', '\r'])).then(|| text.clone())
            }
            _ => None,
        }
    }
}

/// One entry of the option registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub domain: OptionDomain,
    pub description: &'static str,
}

impl OptionSpec {
    /// Validate and render a value for this option.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptionValue` for a wrong type or an out-of-domain value.
    pub fn render(&self, value: &OptionValue) -> Result<String, SolverError> {
        self.domain
            .render(value)
            .ok_or_else(|| SolverError::InvalidOptionValue {
                name: self.name.to_string(),
                value: format!("{value} ({})", value.kind_name()),
                expected: self.domain.describe(),
            })
    }
}

fn spec(name: &'static str, domain: OptionDomain, description: &'static str) -> OptionSpec {
    OptionSpec {
        name,
        domain,
        description,
    }
}

fn float(min: f64, max: f64) -> OptionDomain {
    OptionDomain::Float { min, max }
}

fn int(min: i64, max: i64) -> OptionDomain {
    OptionDomain::Int { min, max }
}

// `write_solution_style` is deliberately absent: the parser only reads the raw style.
static REGISTRY: LazyLock<BTreeMap<&'static str, OptionSpec>> = LazyLock::new(|| {
    [
        spec("time_limit", float(0.0, f64::INFINITY), "Time limit (seconds)"),
        spec("presolve", OptionDomain::Choice(OFF_CHOOSE_ON), "Presolve option"),
        spec("solver", OptionDomain::Choice(SOLVERS), "Solver option"),
        spec("parallel", OptionDomain::Choice(OFF_CHOOSE_ON), "Parallel option"),
        spec("run_crossover", OptionDomain::Choice(OFF_CHOOSE_ON), "Run IPM crossover"),
        spec("threads", int(0, HIGHS_INT_MAX), "Number of threads (0 = automatic)"),
        spec("random_seed", int(0, HIGHS_INT_MAX), "Random seed"),
        spec("simplex_strategy", int(0, 4), "Simplex strategy"),
        spec("simplex_iteration_limit", int(0, HIGHS_INT_MAX), "Simplex iteration limit"),
        spec("ipm_iteration_limit", int(0, HIGHS_INT_MAX), "IPM iteration limit"),
        spec("mip_max_nodes", int(0, HIGHS_INT_MAX), "MIP branch-and-bound node limit"),
        spec("mip_max_leaves", int(0, HIGHS_INT_MAX), "MIP leaf node limit"),
        spec("mip_max_improving_sols", int(1, HIGHS_INT_MAX), "MIP improving solution limit"),
        spec("mip_rel_gap", float(0.0, f64::INFINITY), "MIP relative gap tolerance"),
        spec("mip_abs_gap", float(0.0, f64::INFINITY), "MIP absolute gap tolerance"),
        spec("mip_heuristic_effort", float(0.0, 1.0), "MIP heuristic effort"),
        spec("mip_detect_symmetry", OptionDomain::Bool, "MIP symmetry detection"),
        spec("mip_feasibility_tolerance", float(1e-10, f64::INFINITY), "MIP feasibility tolerance"),
        spec("primal_feasibility_tolerance", float(1e-10, f64::INFINITY), "Primal feasibility tolerance"),
        spec("dual_feasibility_tolerance", float(1e-10, f64::INFINITY), "Dual feasibility tolerance"),
        spec("ipm_optimality_tolerance", float(1e-12, f64::INFINITY), "IPM optimality tolerance"),
        spec("objective_bound", float(f64::NEG_INFINITY, f64::INFINITY), "Objective bound for termination"),
        spec("objective_target", float(f64::NEG_INFINITY, f64::INFINITY), "Objective target for termination"),
        spec("infinite_bound", float(1e15, f64::INFINITY), "Bound magnitude treated as infinite"),
        spec("infinite_cost", float(1e15, f64::INFINITY), "Cost magnitude treated as infinite"),
        spec("output_flag", OptionDomain::Bool, "Enables or disables solver output"),
        spec("log_to_console", OptionDomain::Bool, "Enables or disables console logging"),
        spec("log_file", OptionDomain::Text, "Log file path"),
    ]
    .into_iter()
    .map(|entry| (entry.name, entry))
    .collect()
});

/// Look up an option by name.
pub fn option_spec(name: &str) -> Option<&'static OptionSpec> {
    REGISTRY.get(name)
}

/// All known options in name order.
pub fn known_options() -> impl Iterator<Item = &'static OptionSpec> {
    REGISTRY.values()
}

/// Translate caller options into HiGHS option-file content.
///
/// Produces one `name = value` line per option in name order. Nothing is
/// written to disk here.
///
/// # Errors
///
/// Returns `UnknownOption` or `InvalidOptionValue` for the first offending entry.
pub fn translate(options: &SolverOptions) -> Result<String, SolverError> {
    let mut content = String::new();
    for (name, value) in options.iter() {
        let spec = option_spec(name).ok_or_else(|| SolverError::UnknownOption {
            name: name.to_string(),
        })?;
        let rendered = spec.render(value)?;
        content.push_str(name);
        content.push_str(" = ");
        content.push_str(&rendered);
        content.push('\n');
    }

    debug!(
        component = "options",
        operation = "translate",
        status = "success",
        num_options = options.len(),
        "Translated solver options"
    );

    Ok(content)
}
