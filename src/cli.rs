use clap::Parser;
use std::path::PathBuf;

use crate::logic::InstallRequest;
use crate::types::Extra;

/// pyATS installer - install, upgrade, downgrade or remove pyATS through pip
#[derive(Parser, Debug)]
#[command(name = "pyats-installer")]
#[command(about = "Install, upgrade, downgrade or uninstall pyATS and its libraries")]
pub struct Cli {
    /// Type of installation: full, library, robot or template.
    ///
    /// Leave empty to install just the core framework.
    #[arg(value_name = "EXTRA")]
    pub extra: Option<Extra>,

    /// Version to install (defaults to the latest known release)
    #[arg(long)]
    pub version: Option<String>,

    /// Uninstall pyATS and its libraries
    #[arg(long)]
    pub uninstall: bool,

    /// Print the package-manager commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Package-manager command
    #[arg(long, default_value = "pip3")]
    pub pip: String,

    /// Python interpreter used to detect the installed version
    #[arg(long, default_value = "python3")]
    pub python: String,

    /// JSON version catalog replacing the built-in one
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The planner-facing part of the arguments
    pub fn request(&self) -> InstallRequest {
        InstallRequest {
            extra: self.extra,
            version: self.version.clone(),
            uninstall: self.uninstall,
        }
    }
}
