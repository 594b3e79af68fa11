//! Resident memory sampling of a solver child process.
//!
//! [`MemoryProbe`] keeps one `sysinfo::System` alive and refreshes only the
//! watched process on each sample.

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Errors produced by memory instrumentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "failed to locate process {}", pid)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

/// Repeated sampling of one process, remembering the peak.
pub struct MemoryProbe {
    pid: u32,
    system: System,
    peak_rss_bytes: u64,
}

impl MemoryProbe {
    pub fn for_pid(pid: u32) -> Self {
        MemoryProbe {
            pid,
            system: System::new(),
            peak_rss_bytes: 0,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Sample the current RSS and fold it into the peak.
    ///
    /// # Errors
    ///
    /// Returns an error if the process is gone.
    pub fn sample(&mut self) -> Result<u64, MemoryError> {
        let sys_pid = Pid::from_u32(self.pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let rss = self
            .system
            .process(sys_pid)
            .map(|process| process.memory())
            .ok_or(MemoryError::ProcessNotFound { pid: self.pid })?;
        self.peak_rss_bytes = self.peak_rss_bytes.max(rss);
        Ok(rss)
    }

    /// Largest RSS seen so far, `None` before any successful sample.
    pub fn peak_rss_bytes(&self) -> Option<u64> {
        (self.peak_rss_bytes > 0).then_some(self.peak_rss_bytes)
    }
}

impl std::fmt::Debug for MemoryProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProbe")
            .field("pid", &self.pid)
            .field("peak_rss_bytes", &self.peak_rss_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::{MemoryError, MemoryProbe};

    #[test]
    fn test_tracks_peak_of_a_live_process() {
        let mut probe = MemoryProbe::for_pid(std::process::id());
        assert_eq!(probe.peak_rss_bytes(), None);

        let first = probe.sample().unwrap_or_else(|err| panic!("{}", err));
        let second = probe.sample().unwrap_or_else(|err| panic!("{}", err));

        let peak = probe.peak_rss_bytes().unwrap_or_default();
        assert!(first > 0);
        assert!(peak >= first);
        assert!(peak >= second);
    }

    #[test]
    fn test_missing_process_is_an_error() {
        let pid = u32::MAX - 7;
        let mut probe = MemoryProbe::for_pid(pid);
        assert_eq!(probe.sample(), Err(MemoryError::ProcessNotFound { pid }));
        assert_eq!(probe.peak_rss_bytes(), None);
        assert_eq!(probe.pid(), pid);
    }
}
