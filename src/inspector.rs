//! Installed-version detection
//!
//! pyATS reports its version through `pyats.aetest.__version__`. The
//! inspector asks the configured Python interpreter for it: an import failure
//! means nothing is installed, a printed version means it is.

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use crate::error::{InstallerError, Result};
use crate::process_guard::CommandProcessGroup;
use crate::types::{InstallationState, Variant, VersionSpec};

/// Program passed to the interpreter; prints the version or fails to import
const VERSION_PROBE: &str = "import pyats.aetest; print(pyats.aetest.__version__)";

/// Detects what is currently installed
pub trait EnvironmentInspector {
    fn inspect(&self) -> Result<InstallationState>;
}

impl<I: EnvironmentInspector + ?Sized> EnvironmentInspector for &I {
    fn inspect(&self) -> Result<InstallationState> {
        (**self).inspect()
    }
}

/// Inspector backed by a Python interpreter on `PATH`
#[derive(Debug, Clone)]
pub struct PythonInspector {
    python: String,
    layout_boundary: VersionSpec,
}

impl PythonInspector {
    /// `layout_boundary` is the first release with the current genie layout
    pub fn new(python: impl Into<String>, layout_boundary: VersionSpec) -> Self {
        Self {
            python: python.into(),
            layout_boundary,
        }
    }
}

impl EnvironmentInspector for PythonInspector {
    fn inspect(&self) -> Result<InstallationState> {
        tracing::debug!(python = %self.python, "probing installed pyats version");

        let output = Command::new(&self.python)
            .args(["-c", VERSION_PROBE])
            .stdin(Stdio::null())
            .in_new_process_group()
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => InstallerError::inspection(format!(
                    "Python interpreter '{}' not found",
                    self.python
                )),
                _ => InstallerError::inspection(format!(
                    "Failed to run '{}': {}",
                    self.python, e
                )),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                stderr = stderr.trim(),
                "pyats import failed, treating as not installed"
            );
            return Ok(InstallationState::NotInstalled);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let state = parse_probe_output(&stdout, &self.layout_boundary)?;
        tracing::info!(?state, "detected installation");
        Ok(state)
    }
}

/// Turn the probe's stdout into an installation state.
///
/// The last non-empty line holds the version; anything printed earlier
/// (import-time warnings) is ignored.
pub fn parse_probe_output(stdout: &str, layout_boundary: &VersionSpec) -> Result<InstallationState> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .ok_or_else(|| InstallerError::inspection("pyats reported an empty version"))?;

    let version: VersionSpec = line.parse().map_err(|_| {
        InstallerError::invalid_version(format!("installed pyats reports version '{}'", line))
    })?;

    Ok(InstallationState::Installed {
        version,
        variant: Variant::for_version(&version, layout_boundary),
    })
}
