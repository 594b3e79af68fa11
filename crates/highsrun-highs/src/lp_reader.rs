//! Minimal reader for the LP subset written by [`crate::export`].
//!
//! Used to check exported files independently of the solver. It understands
//! objective, constraint, bound and integrality sections with linear terms
//! only, which is everything the exporter emits.

use std::collections::{BTreeMap, BTreeSet};

use highsrun_core::Sense;
use highsrun_expr::ComparisonSense;

/// Errors produced while reading an LP file.
#[derive(Debug, Clone, PartialEq)]
pub enum LpReadError {
    MissingObjective,
    UnexpectedToken { section: &'static str, token: String },
    UnexpectedEnd { section: &'static str },
}

impl LpReadError {
    pub fn code(&self) -> &'static str {
        match self {
            LpReadError::MissingObjective => "LP_MISSING_OBJECTIVE",
            LpReadError::UnexpectedToken { .. } => "LP_UNEXPECTED_TOKEN",
            LpReadError::UnexpectedEnd { .. } => "LP_UNEXPECTED_END",
        }
    }
}

impl std::fmt::Display for LpReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LpReadError::MissingObjective => {
                write!(f, "[{}] No Minimize/Maximize section", self.code())
            }
            LpReadError::UnexpectedToken { section, token } => write!(
                f,
                "[{}] Unexpected token '{}' in {} section",
                self.code(),
                token,
                section
            ),
            LpReadError::UnexpectedEnd { section } => {
                write!(f, "[{}] {} section ends mid-statement", self.code(), section)
            }
        }
    }
}

impl std::error::Error for LpReadError {}

/// One constraint row.
#[derive(Debug, Clone, PartialEq)]
pub struct LpRow {
    pub name: String,
    pub terms: Vec<(String, f64)>,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

/// Parsed LP problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    pub sense: Sense,
    pub objective: Vec<(String, f64)>,
    pub rows: Vec<LpRow>,
    bounds: BTreeMap<String, (f64, f64)>,
    general: BTreeSet<String>,
    binary: BTreeSet<String>,
    columns: Vec<String>,
}

impl LpProblem {
    /// Column names in order of first appearance.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Bounds of a column, applying LP defaults for columns without a bound line.
    pub fn bounds_of(&self, column: &str) -> (f64, f64) {
        if let Some(bounds) = self.bounds.get(column) {
            *bounds
        } else if self.binary.contains(column) {
            (0.0, 1.0)
        } else {
            (0.0, f64::INFINITY)
        }
    }

    pub fn is_general(&self, column: &str) -> bool {
        self.general.contains(column)
    }

    pub fn is_binary(&self, column: &str) -> bool {
        self.binary.contains(column)
    }

    /// Objective coefficient of a column, zero when it is absent.
    pub fn objective_coefficient(&self, column: &str) -> f64 {
        self.objective
            .iter()
            .filter(|(name, _)| name == column)
            .map(|(_, coeff)| coeff)
            .sum()
    }

    pub fn row(&self, name: &str) -> Option<&LpRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    fn see(&mut self, column: &str) {
        if !self.columns.iter().any(|seen| seen == column) {
            self.columns.push(column.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Objective(Sense),
    Constraints,
    Bounds,
    General,
    Binary,
    End,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line.to_ascii_lowercase().as_str() {
            "minimize" | "minimum" | "min" => Some(Section::Objective(Sense::Minimize)),
            "maximize" | "maximum" | "max" => Some(Section::Objective(Sense::Maximize)),
            "subject to" | "such that" | "st" | "s.t." => Some(Section::Constraints),
            "bounds" | "bound" => Some(Section::Bounds),
            "general" | "generals" | "gen" => Some(Section::General),
            "binary" | "binaries" | "bin" => Some(Section::Binary),
            "end" => Some(Section::End),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Section::Objective(_) => "objective",
            Section::Constraints => "constraints",
            Section::Bounds => "bounds",
            Section::General => "general",
            Section::Binary => "binary",
            Section::End => "end",
        }
    }
}

fn parse_number(token: &str) -> Option<f64> {
    match token.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        _ => token.parse::<f64>().ok().filter(|value| value.is_finite()),
    }
}

fn is_name(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && parse_number(token).is_none()
}

/// Parse linear terms until `stop` returns true for a token (or tokens run out).
///
/// Returns the terms and the number of tokens consumed.
fn parse_terms(
    tokens: &[&str],
    section: Section,
    stop: impl Fn(&str) -> bool,
) -> Result<(Vec<(String, f64)>, usize), LpReadError> {
    let mut terms = Vec::new();
    let mut sign = 1.0;
    let mut coefficient: Option<f64> = None;
    let mut consumed = 0;

    for &token in tokens {
        if stop(token) {
            break;
        }
        consumed += 1;
        match token {
            "+" => {}
            "-" => sign = -sign,
            _ if is_name(token) => {
                terms.push((token.to_string(), sign * coefficient.take().unwrap_or(1.0)));
                sign = 1.0;
            }
            _ => match parse_number(token) {
                Some(value) if coefficient.is_none() => coefficient = Some(value),
                _ => {
                    return Err(LpReadError::UnexpectedToken {
                        section: section.name(),
                        token: token.to_string(),
                    });
                }
            },
        }
    }

    if coefficient.is_some() {
        return Err(LpReadError::UnexpectedEnd {
            section: section.name(),
        });
    }
    Ok((terms, consumed))
}

fn strip_label<'a, 'b>(tokens: &'a [&'b str]) -> (Option<String>, &'a [&'b str]) {
    match tokens.first() {
        Some(first) if first.ends_with(':') => {
            (Some(first.trim_end_matches(':').to_string()), &tokens[1..])
        }
        _ => (None, tokens),
    }
}

fn parse_constraints(tokens: &[&str], problem: &mut LpProblem) -> Result<(), LpReadError> {
    let section = Section::Constraints;
    let mut rest = tokens;
    while !rest.is_empty() {
        let (label, body) = strip_label(rest);
        let (terms, consumed) =
            parse_terms(body, section, |token| ComparisonSense::from_symbol(token).is_some())?;
        let after_terms = &body[consumed..];
        let (Some(sense_token), Some(rhs_token)) = (after_terms.first(), after_terms.get(1)) else {
            return Err(LpReadError::UnexpectedEnd {
                section: section.name(),
            });
        };
        let sense = ComparisonSense::from_symbol(sense_token).ok_or_else(|| {
            LpReadError::UnexpectedToken {
                section: section.name(),
                token: sense_token.to_string(),
            }
        })?;
        let (rhs, used) = match (*rhs_token, after_terms.get(2).copied().and_then(parse_number)) {
            ("-", Some(value)) => (-value, 3),
            ("+", Some(value)) => (value, 3),
            (token, _) => (
                parse_number(token).ok_or_else(|| LpReadError::UnexpectedToken {
                    section: section.name(),
                    token: token.to_string(),
                })?,
                2,
            ),
        };
        for (name, _) in &terms {
            problem.see(name);
        }
        let name = label.unwrap_or_else(|| format!("r{}", problem.rows.len()));
        problem.rows.push(LpRow {
            name,
            terms,
            sense,
            rhs,
        });
        rest = &after_terms[used..];
    }
    Ok(())
}

fn parse_bound_line(tokens: &[&str], problem: &mut LpProblem) -> Result<(), LpReadError> {
    let unexpected = |token: &str| LpReadError::UnexpectedToken {
        section: Section::Bounds.name(),
        token: token.to_string(),
    };
    let number = |token: &str| parse_number(token).ok_or_else(|| unexpected(token));

    let (name, bounds) = match tokens {
        [name, free] if free.eq_ignore_ascii_case("free") => {
            (*name, (f64::NEG_INFINITY, f64::INFINITY))
        }
        [lower, "<=", name, "<=", upper] => (*name, (number(*lower)?, number(*upper)?)),
        [name, op, value] => {
            let value = number(*value)?;
            let current = problem.bounds_of(name);
            let bounds = match *op {
                ">=" | "=>" => (value, current.1),
                "<=" | "=<" => (current.0, value),
                "=" => (value, value),
                other => return Err(unexpected(other)),
            };
            (*name, bounds)
        }
        [first, ..] => return Err(unexpected(*first)),
        [] => return Ok(()),
    };
    if !is_name(name) {
        return Err(unexpected(name));
    }
    problem.see(name);
    problem.bounds.insert(name.to_string(), bounds);
    Ok(())
}

/// Read LP text.
///
/// # Errors
///
/// Returns an error for tokens outside the supported subset.
pub fn read_lp(text: &str) -> Result<LpProblem, LpReadError> {
    let mut problem = LpProblem {
        sense: Sense::Minimize,
        objective: Vec::new(),
        rows: Vec::new(),
        bounds: BTreeMap::new(),
        general: BTreeSet::new(),
        binary: BTreeSet::new(),
        columns: Vec::new(),
    };

    let mut sections: Vec<(Section, Vec<&str>)> = Vec::new();
    for raw_line in text.lines() {
        let line = raw_line.split('\\').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Some(section) = Section::from_header(line) {
            sections.push((section, Vec::new()));
            continue;
        }
        let Some((section, tokens)) = sections.last_mut() else {
            return Err(LpReadError::MissingObjective);
        };
        if *section == Section::Bounds {
            // Bound statements are line-oriented; keep a separator between lines.
            tokens.push("\n");
        }
        tokens.extend(line.split_whitespace());
    }

    let mut saw_objective = false;
    for (section, tokens) in &sections {
        match *section {
            Section::Objective(sense) => {
                saw_objective = true;
                problem.sense = sense;
                let (_, body) = strip_label(tokens);
                let (terms, consumed) = parse_terms(body, *section, |_| false)?;
                debug_assert_eq!(consumed, body.len());
                for (name, _) in &terms {
                    problem.see(name);
                }
                problem.objective = terms;
            }
            Section::Constraints => parse_constraints(tokens, &mut problem)?,
            Section::Bounds => {
                for line in tokens.split(|token| *token == "\n") {
                    parse_bound_line(line, &mut problem)?;
                }
            }
            Section::General | Section::Binary => {
                for name in tokens {
                    if !is_name(name) {
                        return Err(LpReadError::UnexpectedToken {
                            section: section.name(),
                            token: name.to_string(),
                        });
                    }
                    problem.see(name);
                    if *section == Section::General {
                        problem.general.insert(name.to_string());
                    } else {
                        problem.binary.insert(name.to_string());
                    }
                }
            }
            Section::End => break,
        }
    }

    if !saw_objective {
        return Err(LpReadError::MissingObjective);
    }
    Ok(problem)
}
