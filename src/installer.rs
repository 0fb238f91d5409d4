//! Installer module
//!
//! Runs one invocation end to end: inspect the environment, plan the
//! transition, confirm when the plan is destructive, then execute the
//! commands one after another.

use std::io::Write;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::executor::{CommandExecutor, ExecutionOutput};
use crate::inspector::EnvironmentInspector;
use crate::logic::{InstallRequest, Plan, Transition, VersionTransitionPlanner};
use crate::prompt::Confirmation;

/// How an invocation ended (when it did not fail)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Uninstall requested but nothing was installed
    NotInstalled,
    /// The user answered "no" to the confirmation
    Declined,
    /// Every command ran successfully
    Completed {
        transition: Transition,
        outputs: Vec<ExecutionOutput>,
    },
}

/// Installer instance
pub struct Installer<I, C, E, W> {
    catalog: Catalog,
    pip: String,
    inspector: I,
    confirmation: C,
    executor: E,
    out: W,
}

impl<I, C, E, W> Installer<I, C, E, W>
where
    I: EnvironmentInspector,
    C: Confirmation,
    E: CommandExecutor,
    W: Write,
{
    /// Create a new installer instance
    pub fn new(
        catalog: Catalog,
        pip: impl Into<String>,
        inspector: I,
        confirmation: C,
        executor: E,
        out: W,
    ) -> Self {
        Self {
            catalog,
            pip: pip.into(),
            inspector,
            confirmation,
            executor,
            out,
        }
    }

    /// Inspect, plan, confirm and execute
    pub fn run(&mut self, request: &InstallRequest) -> Result<InstallOutcome> {
        let state = self.inspector.inspect()?;
        let plan = VersionTransitionPlanner::new(&self.catalog).plan(request, &state)?;
        tracing::debug!(transition = %plan.transition, commands = plan.commands.len(), "plan ready");

        if plan.transition == Transition::NothingToUninstall {
            writeln!(self.out, "{} is not installed.", self.display_name())?;
            return Ok(InstallOutcome::NotInstalled);
        }

        if plan.requires_confirmation() {
            let question = format!(
                "Are you sure you want to uninstall {} and its libraries?",
                self.display_name()
            );
            if !self.confirmation.confirm(&question)? {
                tracing::info!("uninstall declined");
                return Ok(InstallOutcome::Declined);
            }
        }

        self.announce(&plan)?;
        let outputs = self.execute(&plan)?;

        Ok(InstallOutcome::Completed {
            transition: plan.transition,
            outputs,
        })
    }

    /// Consume the installer and return its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    fn display_name(&self) -> String {
        self.catalog.package.clone()
    }

    fn announce(&mut self, plan: &Plan) -> Result<()> {
        let name = self.display_name();
        let target = plan.target.map(|v| v.to_string()).unwrap_or_default();
        match plan.transition {
            Transition::Upgrade | Transition::BoundaryUpgrade => {
                writeln!(self.out, "Upgrading {} to version {}", name, target)?
            }
            Transition::Downgrade => {
                writeln!(self.out, "Downgrading {} to version {}", name, target)?
            }
            Transition::Install => writeln!(self.out, "Installing {} version {}", name, target)?,
            Transition::Uninstall => {
                writeln!(self.out, "Uninstalling {} version {}", name, target)?
            }
            Transition::NothingToUninstall => {}
        }
        Ok(())
    }

    /// Run commands strictly in order; the first failure stops the run
    fn execute(&mut self, plan: &Plan) -> Result<Vec<ExecutionOutput>> {
        let mut outputs = Vec::with_capacity(plan.commands.len());
        for command in &plan.commands {
            let line = command.render(&self.pip);
            if !self.executor.echoes_commands() {
                writeln!(self.out, "{}", line)?;
                self.out.flush()?;
            }

            let output = self.executor.execute(&line)?;
            output.ensure_success()?;
            outputs.push(output);
        }
        Ok(outputs)
    }
}
