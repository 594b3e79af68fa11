//! Per-call working directory.

use std::fs;
use std::path::{Path, PathBuf};

use highsrun_solver::SolverError;
use tempfile::TempDir;
use tracing::{debug, warn};

const DIR_PREFIX: &str = "highsrun-";

/// Unique directory holding one solve call's files.
///
/// Removed on drop unless [`CallWorkspace::retain`] is called, so every exit
/// path of a solve cleans up after itself.
#[derive(Debug)]
pub struct CallWorkspace {
    dir: TempDir,
}

impl CallWorkspace {
    /// Create a fresh directory under `parent`, or under the system temp dir.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created.
    pub fn create(parent: Option<&Path>) -> Result<Self, SolverError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        let dir = match parent {
            Some(parent) => {
                // The solver runs inside the new directory, so every path
                // handed to it must not depend on our cwd.
                let parent = std::path::absolute(parent).map_err(|err| {
                    SolverError::io(format!("resolving {}", parent.display()), &err)
                })?;
                fs::create_dir_all(&parent).map_err(|err| {
                    SolverError::io(format!("creating {}", parent.display()), &err)
                })?;
                builder.tempdir_in(&parent)
            }
            None => builder.tempdir(),
        }
        .map_err(|err| SolverError::io("creating solve directory", &err))?;

        debug!(
            component = "workspace",
            operation = "create",
            status = "success",
            path = %dir.path().display(),
            "Created solve directory"
        );
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn problem_path(&self) -> PathBuf {
        self.path().join("model.lp")
    }

    pub fn options_path(&self) -> PathBuf {
        self.path().join("options.txt")
    }

    pub fn solution_path(&self) -> PathBuf {
        self.path().join("solution.sol")
    }

    pub fn start_path(&self) -> PathBuf {
        self.path().join("start.sol")
    }

    /// Write `content` to `path` inside this directory.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn write(&self, path: &Path, content: &str) -> Result<(), SolverError> {
        fs::write(path, content)
            .map_err(|err| SolverError::io(format!("writing {}", path.display()), &err))
    }

    /// Keep the directory on disk and return its path.
    pub fn retain(self) -> PathBuf {
        let path = self.dir.keep();
        debug!(
            component = "workspace",
            operation = "retain",
            status = "success",
            path = %path.display(),
            "Kept solve artifacts"
        );
        path
    }

    /// Remove the directory now, logging instead of failing if that is not possible.
    pub fn remove(self) {
        let path = self.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(
                component = "workspace",
                operation = "remove",
                status = "success",
                path = %path.display(),
                "Removed solve directory"
            ),
            Err(err) => warn!(
                component = "workspace",
                operation = "remove",
                status = "error",
                path = %path.display(),
                error = %err,
                "Failed to remove solve directory"
            ),
        }
    }
}
