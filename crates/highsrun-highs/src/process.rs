//! Solver process invocation.
//!
//! A call moves through `Running` to either `Exited` or `Killed`. The child
//! handle is owned by a guard that kills and reaps it on every exit path, so
//! an early return never leaves a solver running. On unix the child leads its
//! own process group and the whole group is killed, which also takes down a
//! solver started by a wrapper script. The child runs inside the call's
//! directory, so files it writes relative to its cwd (`HiGHS.log`) are
//! removed with it. Output streams go to files in that directory and are read
//! back once the process is gone, which keeps the poll loop free of pipe
//! back-pressure.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use highsrun_solver::SolverError;
use highsrun_tools::MemoryProbe;
use tracing::{debug, warn};

const STDOUT_FILE: &str = "stdout.log";
const STDERR_FILE: &str = "stderr.log";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything needed to run the solver once.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub executable: PathBuf,
    /// Arguments placed before the generated file arguments.
    pub leading_args: Vec<String>,
    pub problem_file: PathBuf,
    pub option_file: PathBuf,
    pub solution_file: PathBuf,
    /// Solution file read as a starting point.
    pub start_file: Option<PathBuf>,
    pub stdout_file: PathBuf,
    pub stderr_file: PathBuf,
    /// Working directory of the child.
    pub working_dir: PathBuf,
    /// Wall-clock budget; the process is killed once it is spent.
    pub deadline: Option<Duration>,
    pub poll_interval: Duration,
}

impl Invocation {
    /// Invocation running in `capture_dir`, with stream captures placed there.
    pub fn new(
        executable: impl Into<PathBuf>,
        problem_file: impl Into<PathBuf>,
        option_file: impl Into<PathBuf>,
        solution_file: impl Into<PathBuf>,
        capture_dir: &Path,
    ) -> Self {
        Self {
            executable: executable.into(),
            leading_args: Vec::new(),
            problem_file: problem_file.into(),
            option_file: option_file.into(),
            solution_file: solution_file.into(),
            start_file: None,
            stdout_file: capture_dir.join(STDOUT_FILE),
            stderr_file: capture_dir.join(STDERR_FILE),
            working_dir: capture_dir.to_path_buf(),
            deadline: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn with_start_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.start_file = Some(path.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Full argument vector after the executable.
    pub fn arguments(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.leading_args.iter().map(OsString::from).collect();
        args.push("--options_file".into());
        args.push(self.option_file.clone().into_os_string());
        args.push("--solution_file".into());
        args.push(self.solution_file.clone().into_os_string());
        if let Some(start) = &self.start_file {
            args.push("--read_solution_file".into());
            args.push(start.clone().into_os_string());
        }
        args.push("--model_file".into());
        args.push(self.problem_file.clone().into_os_string());
        args
    }
}

/// What happened to the process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The deadline passed and the process was killed.
    pub timed_out: bool,
    pub elapsed: Duration,
    /// Largest resident memory observed while polling.
    pub peak_rss_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessState {
    Running,
    Exited(ExitStatus),
    Killed(Option<ExitStatus>),
}

/// Sole owner of the child handle.
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };
        let status = child.try_wait()?;
        if status.is_some() {
            self.child = None;
        }
        Ok(status)
    }

    fn kill(&mut self) -> io::Result<Option<ExitStatus>> {
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };
        kill_process_group(&child);
        if let Err(err) = child.kill() {
            // Exited between the last poll and the kill; reap it below.
            if err.kind() != io::ErrorKind::InvalidInput {
                let _ = child.wait();
                return Err(err);
            }
        }
        child.wait().map(Some)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            kill_process_group(&child);
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Kill every process in the group the child leads.
///
/// Must run before the child is reaped; until then its pid cannot be reused,
/// so the group id still names our processes.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill(2) takes no pointers; a negative pid addresses a process group.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        debug!(
            component = "process",
            operation = "kill_group",
            status = "error",
            pgid,
            error = %io::Error::last_os_error(),
            "Could not signal solver process group"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

/// Relative paths with a directory part are resolved against our cwd, since
/// the child starts in another directory. Bare names stay on `PATH` lookup.
fn resolve_executable(executable: &Path) -> PathBuf {
    if executable.is_relative() && executable.components().count() > 1 {
        std::path::absolute(executable).unwrap_or_else(|_| executable.to_path_buf())
    } else {
        executable.to_path_buf()
    }
}

struct Supervisor {
    guard: ChildGuard,
    probe: MemoryProbe,
    started: Instant,
    deadline: Option<Duration>,
    poll_interval: Duration,
}

impl Supervisor {
    fn step(&mut self) -> Result<ProcessState, SolverError> {
        if let Some(status) = self
            .guard
            .try_wait()
            .map_err(|err| SolverError::io("waiting for solver process", &err))?
        {
            return Ok(ProcessState::Exited(status));
        }

        let elapsed = self.started.elapsed();
        if let Some(deadline) = self.deadline.filter(|deadline| elapsed >= *deadline) {
            warn!(
                component = "process",
                operation = "kill",
                status = "timeout",
                pid = self.probe.pid(),
                deadline_ms = deadline.as_millis() as u64,
                "Solver exceeded its wall-clock deadline; killing it"
            );
            let status = self
                .guard
                .kill()
                .map_err(|err| SolverError::io("killing solver process", &err))?;
            return Ok(ProcessState::Killed(status));
        }

        let _ = self.probe.sample();
        let pause = match self.deadline {
            Some(deadline) => self.poll_interval.min(deadline.saturating_sub(elapsed)),
            None => self.poll_interval,
        };
        thread::sleep(pause);
        Ok(ProcessState::Running)
    }
}

fn open_capture(path: &Path) -> Result<File, SolverError> {
    File::create(path).map_err(|err| SolverError::io(format!("creating {}", path.display()), &err))
}

fn read_capture(path: &Path) -> String {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Run the solver and wait for it, killing it at the deadline.
///
/// Non-zero exits and timeouts are reported in the outcome, not as errors;
/// deciding what they mean is left to the solution parser.
///
/// # Errors
///
/// Returns `ExecutableNotFound` when the executable cannot be started and
/// `Io` for failures creating capture files or waiting on the process.
pub fn invoke(invocation: &Invocation) -> Result<ProcessOutcome, SolverError> {
    let stdout = open_capture(&invocation.stdout_file)?;
    let stderr = open_capture(&invocation.stderr_file)?;

    let mut command = Command::new(resolve_executable(&invocation.executable));
    command
        .args(invocation.arguments())
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let started = Instant::now();
    let child = command.spawn().map_err(|err| match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            SolverError::ExecutableNotFound {
                executable: invocation.executable.display().to_string(),
                reason: err.to_string(),
            }
        }
        _ => SolverError::io(
            format!("starting {}", invocation.executable.display()),
            &err,
        ),
    })?;
    let pid = child.id();

    debug!(
        component = "process",
        operation = "spawn",
        status = "success",
        pid,
        executable = %invocation.executable.display(),
        deadline_ms = invocation.deadline.map(|d| d.as_millis() as u64),
        "Started solver process"
    );

    let mut supervisor = Supervisor {
        guard: ChildGuard { child: Some(child) },
        probe: MemoryProbe::for_pid(pid),
        started,
        deadline: invocation.deadline,
        poll_interval: invocation.poll_interval,
    };

    let terminal = loop {
        match supervisor.step()? {
            ProcessState::Running => continue,
            terminal => break terminal,
        }
    };
    let elapsed = started.elapsed();

    let (exit_status, timed_out) = match terminal {
        ProcessState::Exited(status) => (Some(status), false),
        ProcessState::Killed(status) => (status, true),
        ProcessState::Running => (None, false),
    };
    let exit_code = exit_status.and_then(|status| status.code());
    let peak_rss_bytes = supervisor.probe.peak_rss_bytes();

    debug!(
        component = "process",
        operation = "wait",
        status = if timed_out { "timeout" } else { "success" },
        pid,
        exit_code,
        elapsed_ms = elapsed.as_millis() as u64,
        peak_rss_bytes,
        "Solver process finished"
    );

    Ok(ProcessOutcome {
        exit_code,
        stdout: read_capture(&invocation.stdout_file),
        stderr: read_capture(&invocation.stderr_file),
        timed_out,
        elapsed,
        peak_rss_bytes,
    })
}
