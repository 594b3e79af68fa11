//! Caller-facing solver options.
//!
//! Options are plain name/value pairs. Which names exist, and which values
//! they accept, is decided by the backend that translates them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    /// Short type name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::Text(_) => "string",
        }
    }

    /// Numeric view; integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Int(value) => Some(*value as f64),
            OptionValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Int(value) => write!(f, "{value}"),
            OptionValue::Float(value) => write!(f, "{value:?}"),
            OptionValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// Named options for one solve call, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolverOptions {
    entries: BTreeMap<String, OptionValue>,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object such as `{"time_limit": 10, "presolve": "on"}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set an option, replacing any previous value for the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Set an option only when the caller has not already chosen a value.
    pub fn with_default(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        if !self.entries.contains_key(name) {
            self.entries.insert(name.to_string(), value.into());
        }
        self
    }

    pub fn with_time_limit(self, seconds: f64) -> Self {
        self.with("time_limit", seconds)
    }

    pub fn with_mip_rel_gap(self, gap: f64) -> Self {
        self.with("mip_rel_gap", gap)
    }

    pub fn with_mip_heuristic_effort(self, effort: f64) -> Self {
        self.with("mip_heuristic_effort", effort)
    }

    pub fn with_symmetry_detection(self, enabled: bool) -> Self {
        self.with("mip_detect_symmetry", enabled)
    }

    pub fn with_presolve(self, enabled: bool) -> Self {
        self.with("presolve", if enabled { "on" } else { "off" })
    }

    pub fn with_threads(self, threads: u32) -> Self {
        self.with("threads", threads)
    }

    pub fn with_random_seed(self, seed: i64) -> Self {
        self.with("random_seed", seed)
    }

    pub fn with_output_flag(self, enabled: bool) -> Self {
        self.with("output_flag", enabled)
    }

    pub fn with_log_to_console(self, enabled: bool) -> Self {
        self.with("log_to_console", enabled)
    }

    pub fn with_log_file(self, path: impl AsRef<Path>) -> Self {
        self.with("log_file", path.as_ref().display().to_string())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Numeric `time_limit` if the caller set one.
    pub fn time_limit(&self) -> Option<f64> {
        self.get("time_limit").and_then(OptionValue::as_f64)
    }

    /// Iterate options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
