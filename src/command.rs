//! Package-manager command lines.
//!
//! The planner emits `PackageCommand`s; rendering them into a shell command
//! line is the only place that knows the package manager's flag syntax.

use std::fmt;

use crate::catalog::PackageSet;

/// One package-manager invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageCommand {
    /// `install <requirement> [--upgrade]`
    Install { requirement: String, upgrade: bool },
    /// `uninstall <packages...> -y`
    Uninstall { packages: PackageSet },
}

impl PackageCommand {
    /// Render as a command line for `pip` (e.g. `pip3`)
    pub fn render(&self, pip: &str) -> String {
        match self {
            Self::Install {
                requirement,
                upgrade: true,
            } => format!("{} install {} --upgrade", pip, requirement),
            Self::Install {
                requirement,
                upgrade: false,
            } => format!("{} install {}", pip, requirement),
            Self::Uninstall { packages } => {
                let names: Vec<&str> = packages.iter().map(String::as_str).collect();
                format!("{} uninstall {} -y", pip, names.join(" "))
            }
        }
    }

    pub fn is_uninstall(&self) -> bool {
        matches!(self, Self::Uninstall { .. })
    }
}

impl fmt::Display for PackageCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("pip3"))
    }
}
