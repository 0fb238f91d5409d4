//! Version Transition Planner
//!
//! Decides which package-manager commands move the machine from its current
//! installation state to the requested one.
//!
//! # Design
//!
//! - **Pure logic**: No I/O, no prompting, no process spawning. The planner
//!   returns a `Plan`; `Installer` confirms and executes it.
//! - **Ordered output**: When a plan has two commands the uninstall always
//!   comes first and must finish before the install starts, since both may
//!   touch the same distributions.
//!
//! # Decision Table
//!
//! | Installed | Request               | Plan |
//! |-----------|-----------------------|------|
//! | no        | `--uninstall`         | nothing |
//! | no        | version               | install (pinned unless latest) |
//! | yes       | `--uninstall`         | confirm, uninstall full set |
//! | yes       | older version         | uninstall full set, pinned install |
//! | yes       | same version          | single upgrade |
//! | yes       | newer, no rule crossed| single upgrade |
//! | yes       | newer, rules crossed  | uninstall crossed rules, install |

use strum::Display;

use crate::catalog::Catalog;
use crate::command::PackageCommand;
use crate::error::Result;
use crate::types::{Extra, InstallationState, VersionSpec};

/// What the user asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRequest {
    pub extra: Option<Extra>,
    /// Raw version string; `None` means the catalog's latest release
    pub version: Option<String>,
    pub uninstall: bool,
}

/// Kind of move a plan performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Transition {
    /// Uninstall requested but nothing is installed
    #[strum(serialize = "nothing to uninstall")]
    NothingToUninstall,
    #[strum(serialize = "install")]
    Install,
    #[strum(serialize = "upgrade")]
    Upgrade,
    /// Upgrade that removes renamed or retired distributions first
    #[strum(serialize = "upgrade across release boundary")]
    BoundaryUpgrade,
    #[strum(serialize = "downgrade")]
    Downgrade,
    #[strum(serialize = "uninstall")]
    Uninstall,
}

/// Ordered list of commands plus the decision that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub transition: Transition,
    /// Version being installed (or the installed version, for uninstall)
    pub target: Option<VersionSpec>,
    pub commands: Vec<PackageCommand>,
}

impl Plan {
    fn nothing() -> Self {
        Self {
            transition: Transition::NothingToUninstall,
            target: None,
            commands: Vec::new(),
        }
    }

    /// Whether the user has to confirm before the commands run
    pub fn requires_confirmation(&self) -> bool {
        self.transition == Transition::Uninstall
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Picks the command sequence for a request against the current state
pub struct VersionTransitionPlanner<'a> {
    catalog: &'a Catalog,
}

impl<'a> VersionTransitionPlanner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Resolve the requested version, defaulting to the latest release.
    ///
    /// Returns `InvalidVersion` for strings that are not versions.
    pub fn target_version(&self, request: &InstallRequest) -> Result<VersionSpec> {
        match request.version.as_deref() {
            Some(raw) => raw.parse(),
            None => Ok(self.catalog.latest),
        }
    }

    /// Build the plan for `request` given what is installed
    pub fn plan(&self, request: &InstallRequest, state: &InstallationState) -> Result<Plan> {
        let (installed, variant) = match *state {
            InstallationState::NotInstalled if request.uninstall => {
                tracing::debug!("uninstall requested but nothing is installed");
                return Ok(Plan::nothing());
            }
            InstallationState::NotInstalled => {
                let target = self.target_version(request)?;
                return Ok(Plan {
                    transition: Transition::Install,
                    target: Some(target),
                    commands: vec![self.install(request.extra, &target, false)],
                });
            }
            InstallationState::Installed { version, variant } => (version, variant),
        };

        if request.uninstall {
            return Ok(Plan {
                transition: Transition::Uninstall,
                target: Some(installed),
                commands: vec![PackageCommand::Uninstall {
                    packages: self.catalog.full_removal_set(variant),
                }],
            });
        }

        let target = self.target_version(request)?;
        tracing::debug!(%installed, %target, %variant, "planning transition");

        if target < installed {
            return Ok(Plan {
                transition: Transition::Downgrade,
                target: Some(target),
                commands: vec![
                    PackageCommand::Uninstall {
                        packages: self.catalog.full_removal_set(variant),
                    },
                    self.pinned_install(request.extra, &target),
                ],
            });
        }

        let crossed = if target == installed {
            None
        } else {
            self.catalog.crossed_removals(&installed, &target, variant)
        };

        let plan = match crossed {
            None => Plan {
                transition: Transition::Upgrade,
                target: Some(target),
                commands: vec![self.install(request.extra, &target, true)],
            },
            Some(packages) => Plan {
                transition: Transition::BoundaryUpgrade,
                target: Some(target),
                commands: vec![
                    PackageCommand::Uninstall { packages },
                    self.install(request.extra, &target, true),
                ],
            },
        };
        Ok(plan)
    }

    /// Install command: unpinned for the latest release, pinned otherwise.
    ///
    /// `upgrade` adds `--upgrade` to the unpinned form so an existing
    /// install is moved forward.
    fn install(&self, extra: Option<Extra>, target: &VersionSpec, upgrade: bool) -> PackageCommand {
        if *target == self.catalog.latest {
            PackageCommand::Install {
                requirement: self.catalog.requirement(extra, None),
                upgrade,
            }
        } else {
            self.pinned_install(extra, target)
        }
    }

    fn pinned_install(&self, extra: Option<Extra>, target: &VersionSpec) -> PackageCommand {
        PackageCommand::Install {
            requirement: self.catalog.requirement(extra, Some(target)),
            upgrade: false,
        }
    }
}
