//! pyATS Installer Library
//!
//! Plans and runs pip commands that install, upgrade, downgrade or remove
//! the pyATS package family.

pub mod catalog;
pub mod cli;
pub mod command;
pub mod error;
pub mod executor;
pub mod inspector;
pub mod installer;
pub mod logic;
pub mod process_guard;
pub mod prompt;
pub mod types;

// Re-export main types for convenience
pub use catalog::{Catalog, PackageSet, TransitionRule};
pub use command::PackageCommand;
pub use error::{InstallerError, Result};
pub use executor::{CommandExecutor, DryRunExecutor, ExecutionOutput, ShellExecutor};
pub use inspector::{EnvironmentInspector, PythonInspector};
pub use installer::{InstallOutcome, Installer};
pub use logic::{InstallRequest, Plan, Transition, VersionTransitionPlanner};
pub use prompt::{Confirmation, FixedConfirmation, StdinConfirmation};
pub use types::{Extra, InstallationState, Variant, VersionSpec};
