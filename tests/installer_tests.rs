//! Tests for Installer orchestration
//!
//! These tests verify:
//! - Inspector → Planner → Confirmation → Executor flow
//! - Strict sequencing and stop-on-failure of two-step transitions
//! - Not-installed and declined outcomes run no commands
//! - End-to-end execution through a real shell

use pyats_installer::{
    Catalog, CommandExecutor, Confirmation, EnvironmentInspector, ExecutionOutput, Extra,
    FixedConfirmation, InstallOutcome, InstallRequest, InstallationState, Installer,
    InstallerError, ShellExecutor, Transition, Variant, VersionSpec,
};

// =============================================================================
// Test Doubles
// =============================================================================

struct StaticInspector(InstallationState);

impl EnvironmentInspector for StaticInspector {
    fn inspect(&self) -> pyats_installer::Result<InstallationState> {
        Ok(self.0)
    }
}

/// Records every command and fails the ones containing `fail_on`
#[derive(Default)]
struct RecordingExecutor {
    commands: Vec<String>,
    fail_on: Option<&'static str>,
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&mut self, command_line: &str) -> pyats_installer::Result<ExecutionOutput> {
        self.commands.push(command_line.to_string());
        let failed = self.fail_on.is_some_and(|needle| command_line.contains(needle));
        Ok(ExecutionOutput {
            command: command_line.to_string(),
            exit_code: Some(if failed { 1 } else { 0 }),
            success: !failed,
            dry_run: false,
        })
    }
}

/// Counts questions and answers from a script
struct ScriptedConfirmation {
    answers: Vec<bool>,
    asked: usize,
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&mut self, _question: &str) -> pyats_installer::Result<bool> {
        let answer = self.answers.get(self.asked).copied().unwrap_or(false);
        self.asked += 1;
        Ok(answer)
    }
}

fn installed(version: &str) -> InstallationState {
    let version: VersionSpec = version.parse().unwrap();
    InstallationState::Installed {
        version,
        variant: Variant::for_version(&version, &VersionSpec::new(20, 1)),
    }
}

fn uninstall() -> InstallRequest {
    InstallRequest {
        uninstall: true,
        ..Default::default()
    }
}

// =============================================================================
// Outcomes
// =============================================================================

#[test]
fn test_uninstall_not_installed_executes_nothing() {
    let mut installer = Installer::new(
        Catalog::builtin(),
        "pip3",
        StaticInspector(InstallationState::NotInstalled),
        ScriptedConfirmation {
            answers: vec![true],
            asked: 0,
        },
        RecordingExecutor::default(),
        Vec::new(),
    );

    let outcome = installer.run(&uninstall()).unwrap();
    assert_eq!(outcome, InstallOutcome::NotInstalled);
}

#[test]
fn test_uninstall_declined_executes_nothing() {
    let mut executor = RecordingExecutor::default();
    let mut confirmation = ScriptedConfirmation {
        answers: vec![false],
        asked: 0,
    };

    {
        let mut installer = Installer::new(
            Catalog::builtin(),
            "pip3",
            StaticInspector(installed("20.1")),
            &mut confirmation,
            &mut executor,
            Vec::new(),
        );
        assert_eq!(installer.run(&uninstall()).unwrap(), InstallOutcome::Declined);
    }

    assert_eq!(confirmation.asked, 1);
    assert!(executor.commands.is_empty());
}

#[test]
fn test_uninstall_confirmed_runs_single_uninstall() {
    let mut executor = RecordingExecutor::default();

    {
        let mut installer = Installer::new(
            Catalog::builtin(),
            "pip3",
            StaticInspector(installed("19.11")),
            FixedConfirmation(true),
            &mut executor,
            Vec::new(),
        );
        let outcome = installer.run(&uninstall()).unwrap();
        assert!(matches!(
            outcome,
            InstallOutcome::Completed {
                transition: Transition::Uninstall,
                ..
            }
        ));
    }

    assert_eq!(executor.commands.len(), 1);
    assert!(executor.commands[0].starts_with("pip3 uninstall "));
    assert!(executor.commands[0].ends_with(" -y"));
    assert!(executor.commands[0].contains("genie.abstract"));
}

#[test]
fn test_install_never_asks_for_confirmation() {
    let mut confirmation = ScriptedConfirmation {
        answers: vec![],
        asked: 0,
    };
    {
        let mut installer = Installer::new(
            Catalog::builtin(),
            "pip3",
            StaticInspector(installed("20.1")),
            &mut confirmation,
            RecordingExecutor::default(),
            Vec::new(),
        );
        installer
            .run(&InstallRequest {
                version: Some("19.7".to_string()),
                ..Default::default()
            })
            .unwrap();
    }
    assert_eq!(confirmation.asked, 0);
}

// =============================================================================
// Sequencing
// =============================================================================

#[test]
fn test_downgrade_runs_uninstall_before_install() {
    let mut executor = RecordingExecutor::default();
    {
        let mut installer = Installer::new(
            Catalog::builtin(),
            "pip3",
            StaticInspector(installed("20.1")),
            FixedConfirmation(false),
            &mut executor,
            Vec::new(),
        );
        installer
            .run(&InstallRequest {
                extra: Some(Extra::Full),
                version: Some("19.7".to_string()),
                uninstall: false,
            })
            .unwrap();
    }

    assert_eq!(executor.commands.len(), 2);
    assert!(executor.commands[0].starts_with("pip3 uninstall "));
    assert_eq!(executor.commands[1], "pip3 install pyats[full]==19.7");
}

#[test]
fn test_failed_uninstall_stops_before_install() {
    let mut executor = RecordingExecutor {
        commands: Vec::new(),
        fail_on: Some("uninstall"),
    };
    let result = {
        let mut installer = Installer::new(
            Catalog::builtin(),
            "pip3",
            StaticInspector(installed("19.7")),
            FixedConfirmation(false),
            &mut executor,
            Vec::new(),
        );
        installer.run(&InstallRequest::default())
    };

    assert!(matches!(
        result,
        Err(InstallerError::SubprocessFailure {
            exit_code: Some(1),
            ..
        })
    ));
    assert_eq!(executor.commands.len(), 1, "install must not start");
}

#[test]
fn test_custom_pip_command_is_used() {
    let mut executor = RecordingExecutor::default();
    {
        let mut installer = Installer::new(
            Catalog::builtin(),
            "python3 -m pip",
            StaticInspector(InstallationState::NotInstalled),
            FixedConfirmation(false),
            &mut executor,
            Vec::new(),
        );
        installer.run(&InstallRequest::default()).unwrap();
    }
    assert_eq!(executor.commands, vec!["python3 -m pip install pyats"]);
}

// =============================================================================
// Real Shell
// =============================================================================

#[test]
fn test_end_to_end_with_shell_executor() {
    // `echo` stands in for pip so the relayed output is the command itself
    let mut installer = Installer::new(
        Catalog::builtin(),
        "echo",
        StaticInspector(installed("19.7")),
        FixedConfirmation(false),
        ShellExecutor::new(Vec::new()),
        Vec::new(),
    );

    let outcome = installer
        .run(&InstallRequest {
            extra: Some(Extra::Full),
            ..Default::default()
        })
        .unwrap();
    let InstallOutcome::Completed { outputs, .. } = outcome else {
        panic!("expected completion");
    };
    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().all(|o| o.success && !o.dry_run));

    let printed = String::from_utf8(installer.into_output()).unwrap();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines[0], "Upgrading pyats to version 20.1");
    assert!(lines[1].starts_with("echo uninstall "));
    assert_eq!(lines[2], "echo install pyats[full] --upgrade");
}

#[test]
fn test_shell_failure_propagates_exit_code() {
    let mut installer = Installer::new(
        Catalog::builtin(),
        "exit 7;",
        StaticInspector(InstallationState::NotInstalled),
        FixedConfirmation(false),
        ShellExecutor::new(std::io::sink()),
        std::io::sink(),
    );

    let err = installer.run(&InstallRequest::default()).unwrap_err();
    assert_eq!(err.exit_code(), 7);
}
