//! Error handling module for the pyATS installer
//!
//! Provides centralized error handling with proper error types using thiserror.
//! "Not installed" and "user declined" are outcomes, not errors, and live in
//! `installer::InstallOutcome` instead.

use thiserror::Error;

/// Main error type for the installer
#[derive(Error, Debug)]
pub enum InstallerError {
    /// A requested or detected version string is not a valid version
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// The package manager exited unsuccessfully
    #[error("Command failed (exit code {}): {command}", describe_exit(.exit_code))]
    SubprocessFailure {
        command: String,
        exit_code: Option<i32>,
    },

    /// Version catalog errors (loading, validation)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The environment could not be inspected (interpreter missing, etc.)
    #[error("Inspection error: {0}")]
    Inspection(String),

    /// IO errors (spawning processes, reading stdin, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed catalog JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, InstallerError>;

impl InstallerError {
    /// Create an invalid version error
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        Self::InvalidVersion(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create an inspection error
    pub fn inspection(msg: impl Into<String>) -> Self {
        Self::Inspection(msg.into())
    }

    /// Process exit code to report for this error.
    ///
    /// Package-manager failures propagate the child's own code when it has one.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SubprocessFailure {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
