//! Package-manager command execution
//!
//! All package-manager commands go through a `CommandExecutor`. The shell
//! implementation is the only place in the crate that spawns `sh -c`.
//!
//! # Process handling
//!
//! - Spawns the shell in a new process group via `.in_new_process_group()`
//! - Registers the child PID with `ChildRegistry::global()` while it runs
//! - Relays stdout line by line as it arrives; stderr is inherited

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use crate::error::{InstallerError, Result};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};

/// Runs one command line to completion
pub trait CommandExecutor {
    fn execute(&mut self, command_line: &str) -> Result<ExecutionOutput>;

    /// Whether the executor prints each command line itself
    fn echoes_commands(&self) -> bool {
        false
    }
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &mut E {
    fn execute(&mut self, command_line: &str) -> Result<ExecutionOutput> {
        (**self).execute(command_line)
    }

    fn echoes_commands(&self) -> bool {
        (**self).echoes_commands()
    }
}

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub command: String,
    /// Exit code (None if terminated by signal)
    pub exit_code: Option<i32>,
    pub success: bool,
    /// The command was only printed, not run
    pub dry_run: bool,
}

impl ExecutionOutput {
    /// Turn an unsuccessful run into `SubprocessFailure`
    pub fn ensure_success(&self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(InstallerError::SubprocessFailure {
                command: self.command.clone(),
                exit_code: self.exit_code,
            })
        }
    }
}

/// Executes command lines through `sh -c`, relaying stdout to `out`
pub struct ShellExecutor<W: Write> {
    shell: String,
    out: W,
}

impl ShellExecutor<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ShellExecutor<W> {
    pub fn new(out: W) -> Self {
        Self {
            shell: "sh".to_string(),
            out,
        }
    }

    /// Consume the executor and return the relay target
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Copy the child's stdout through as raw bytes, one line at a time.
    ///
    /// The pipe is drained to EOF even when writing to `out` fails, so the
    /// child never sees a closed pipe partway through a package operation.
    fn relay(&mut self, stdout: impl std::io::Read) -> Result<()> {
        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();
        let mut write_error = None;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if write_error.is_none() {
                if let Err(e) = self.out.write_all(&line).and_then(|_| self.out.flush()) {
                    tracing::warn!(error = %e, "could not relay command output");
                    write_error = Some(e);
                }
            }
        }

        match write_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl<W: Write> CommandExecutor for ShellExecutor<W> {
    fn execute(&mut self, command_line: &str) -> Result<ExecutionOutput> {
        tracing::info!(command = command_line, "running package manager");

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .in_new_process_group()
            .spawn()?;
        let pid = child.id();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }

        let relayed = match child.stdout.take() {
            Some(stdout) => self.relay(stdout),
            None => Ok(()),
        };

        // Always reap the child, even if relaying failed
        let status = child.wait();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }

        let status = status?;
        relayed?;

        let output = ExecutionOutput {
            command: command_line.to_string(),
            exit_code: status.code(),
            success: status.success(),
            dry_run: false,
        };
        if output.success {
            tracing::info!(command = command_line, "command succeeded");
        } else {
            tracing::error!(command = command_line, exit_code = ?output.exit_code, "command failed");
        }
        Ok(output)
    }
}

/// Prints each command instead of running it (`--dry-run`)
pub struct DryRunExecutor<W: Write> {
    out: W,
}

impl<W: Write> DryRunExecutor<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandExecutor for DryRunExecutor<W> {
    fn execute(&mut self, command_line: &str) -> Result<ExecutionOutput> {
        tracing::info!(command = command_line, "dry run, skipping");
        writeln!(self.out, "[DRY RUN] Skipped: {}", command_line)?;
        Ok(ExecutionOutput {
            command: command_line.to_string(),
            exit_code: Some(0),
            success: true,
            dry_run: true,
        })
    }

    fn echoes_commands(&self) -> bool {
        true
    }
}
