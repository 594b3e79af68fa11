//! Launch configuration for executable-backed solvers.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

pub const DEFAULT_EXECUTABLE: &str = "highs";
pub const DEFAULT_KILL_GRACE_SECONDS: f64 = 5.0;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

const ENV_EXECUTABLE: &str = "HIGHSRUN_EXECUTABLE";
const ENV_TIME_LIMIT: &str = "HIGHSRUN_TIME_LIMIT";
const ENV_KEEP_ARTIFACTS: &str = "HIGHSRUN_KEEP_ARTIFACTS";
const ENV_WORK_DIR: &str = "HIGHSRUN_WORK_DIR";

/// How the solver executable is launched and supervised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Executable name (looked up on `PATH`) or path.
    pub executable: PathBuf,
    /// Arguments placed before the generated ones.
    pub executable_args: Vec<String>,
    /// Time limit handed to the solver when the options do not set one.
    pub time_limit: Option<f64>,
    /// Extra wall-clock seconds granted past the time limit before the process is killed.
    pub kill_grace: f64,
    /// How often the running process is checked for completion.
    pub poll_interval_ms: u64,
    /// Retain the per-call directory instead of deleting it.
    pub keep_artifacts: bool,
    /// Parent directory for per-call directories (system temp dir when unset).
    pub work_dir: Option<PathBuf>,
    /// Round reported values to this many decimal digits.
    pub rounding_digits: Option<u32>,
    /// Keep about this many significant digits of each variable value, applied after rounding.
    pub truncate_precision: Option<u32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            executable_args: Vec::new(),
            time_limit: None,
            kill_grace: DEFAULT_KILL_GRACE_SECONDS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            keep_artifacts: false,
            work_dir: None,
            rounding_digits: None,
            truncate_precision: None,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `HIGHSRUN_*` environment variables.
    pub fn from_env() -> Result<Self, SolverError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SolverConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SolverError> {
        let mut config = Self::default();

        if let Some(executable) = lookup(ENV_EXECUTABLE).filter(|value| !value.trim().is_empty()) {
            config.executable = PathBuf::from(executable.trim());
        }

        if let Some(raw) = lookup(ENV_TIME_LIMIT) {
            let seconds = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or_else(|| SolverError::InvalidOptionValue {
                    name: ENV_TIME_LIMIT.to_string(),
                    value: raw.clone(),
                    expected: "non-negative number of seconds".to_string(),
                })?;
            config.time_limit = Some(seconds);
        }

        if let Some(raw) = lookup(ENV_KEEP_ARTIFACTS) {
            config.keep_artifacts = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "" | "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(SolverError::InvalidOptionValue {
                        name: ENV_KEEP_ARTIFACTS.to_string(),
                        value: raw,
                        expected: "boolean (1/0, true/false)".to_string(),
                    });
                }
            };
        }

        if let Some(dir) = lookup(ENV_WORK_DIR).filter(|value| !value.trim().is_empty()) {
            config.work_dir = Some(PathBuf::from(dir.trim()));
        }

        Ok(config)
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_executable_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executable_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_kill_grace(mut self, seconds: f64) -> Self {
        self.kill_grace = seconds;
        self
    }

    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    pub fn with_keep_artifacts(mut self, keep: bool) -> Self {
        self.keep_artifacts = keep;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_rounding_digits(mut self, digits: u32) -> Self {
        self.rounding_digits = Some(digits);
        self
    }

    pub fn with_truncate_precision(mut self, precision: u32) -> Self {
        self.truncate_precision = Some(precision);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Wall-clock budget for the process: the solver's own limit plus the kill grace.
    ///
    /// `None` when no finite limit is in effect; the process then runs to completion.
    pub fn kill_deadline(&self, solver_time_limit: Option<f64>) -> Option<Duration> {
        let limit = solver_time_limit.filter(|seconds| seconds.is_finite() && *seconds >= 0.0)?;
        let grace = if self.kill_grace.is_finite() {
            self.kill_grace.max(0.0)
        } else {
            DEFAULT_KILL_GRACE_SECONDS
        };
        Duration::try_from_secs_f64(limit + grace).ok()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.executable, PathBuf::from("highs"));
        assert!(config.executable_args.is_empty());
        assert_eq!(config.time_limit, None);
        assert_eq!(config.kill_grace, 5.0);
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert!(!config.keep_artifacts);
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::new()
            .with_executable("/opt/highs/bin/highs")
            .with_executable_args(["--random_seed", "3"])
            .with_time_limit(30.0)
            .with_kill_grace(1.5)
            .with_keep_artifacts(true)
            .with_rounding_digits(4)
            .with_truncate_precision(6);
        assert_eq!(config.executable, PathBuf::from("/opt/highs/bin/highs"));
        assert_eq!(config.executable_args, vec!["--random_seed", "3"]);
        assert_eq!(config.time_limit, Some(30.0));
        assert_eq!(config.kill_grace, 1.5);
        assert!(config.keep_artifacts);
        assert_eq!(config.rounding_digits, Some(4));
        assert_eq!(config.truncate_precision, Some(6));
    }

    #[test]
    fn test_kill_deadline_adds_grace() {
        let config = SolverConfig::new().with_kill_grace(2.0);
        assert_eq!(config.kill_deadline(Some(3.0)), Some(Duration::from_secs(5)));
        assert_eq!(config.kill_deadline(None), None);
        assert_eq!(config.kill_deadline(Some(f64::INFINITY)), None);
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let config = SolverConfig::from_lookup(lookup_from(&[
            ("HIGHSRUN_EXECUTABLE", "/usr/local/bin/highs"),
            ("HIGHSRUN_TIME_LIMIT", "12.5"),
            ("HIGHSRUN_KEEP_ARTIFACTS", "true"),
            ("HIGHSRUN_WORK_DIR", "/tmp/highsrun"),
        ]))
        .unwrap();
        assert_eq!(config.executable, PathBuf::from("/usr/local/bin/highs"));
        assert_eq!(config.time_limit, Some(12.5));
        assert!(config.keep_artifacts);
        assert_eq!(config.work_dir, Some(PathBuf::from("/tmp/highsrun")));
    }

    #[test]
    fn test_from_lookup_empty_environment_is_default() {
        let config = SolverConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = SolverConfig::from_lookup(lookup_from(&[("HIGHSRUN_TIME_LIMIT", "-4")]))
            .unwrap_err();
        assert_eq!(err.code(), "OPTION_INVALID_VALUE");

        let err = SolverConfig::from_lookup(lookup_from(&[("HIGHSRUN_KEEP_ARTIFACTS", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("HIGHSRUN_KEEP_ARTIFACTS"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"executable": "highs-1.7", "time_limit": 60.0}"#).unwrap();
        assert_eq!(config.executable, PathBuf::from("highs-1.7"));
        assert_eq!(config.time_limit, Some(60.0));
        assert_eq!(config.kill_grace, DEFAULT_KILL_GRACE_SECONDS);
    }
}
