use anyhow::{Context, Result};
use std::fmt;
use std::process::Command;

use crate::config::DispatchConfig;

/// A request for one of the external installer commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubOperation {
    Install {
        source: String,
        theme: bool,
        activate: bool,
    },
    Uninstall {
        name: String,
    },
    Activate {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Install,
    Uninstall,
    Activate,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationKind::Install => "install",
            OperationKind::Uninstall => "uninstall",
            OperationKind::Activate => "theme activation",
        };
        f.write_str(label)
    }
}

impl SubOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            SubOperation::Install { .. } => OperationKind::Install,
            SubOperation::Uninstall { .. } => OperationKind::Uninstall,
            SubOperation::Activate { .. } => OperationKind::Activate,
        }
    }
}

/// Runs a sub-operation to completion and returns its status code.
/// Zero means success, anything else is a failure.
pub trait Dispatcher {
    fn dispatch(&mut self, operation: &SubOperation) -> Result<i32>;
}

/// Dispatches sub-operations as child processes of a configured console program.
pub struct CommandDispatcher {
    config: DispatchConfig,
}

impl CommandDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn args_for(&self, operation: &SubOperation) -> Vec<String> {
        match operation {
            SubOperation::Install {
                source,
                theme,
                activate,
            } => {
                let mut args = self.config.install.clone();
                args.push("-s".to_string());
                args.push(source.clone());
                if *theme {
                    args.push("--theme".to_string());
                }
                if *activate {
                    args.push("-a".to_string());
                }
                args
            }
            SubOperation::Uninstall { name } => {
                let mut args = self.config.uninstall.clone();
                args.extend(["-p".to_string(), name.clone()]);
                args
            }
            SubOperation::Activate { name } => {
                let mut args = self.config.activate.clone();
                args.extend(["-t".to_string(), name.clone()]);
                args
            }
        }
    }
}

impl Dispatcher for CommandDispatcher {
    fn dispatch(&mut self, operation: &SubOperation) -> Result<i32> {
        let args = self.args_for(operation);
        tracing::debug!(program = %self.config.program, ?args, "spawning sub-operation");

        let status = Command::new(&self.config.program)
            .args(&args)
            .status()
            .with_context(|| format!("running {} for {}", self.config.program, operation.kind()))?;

        // Killed by a signal: no code to report.
        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(DispatchConfig::default())
    }

    #[test]
    fn install_args_carry_theme_and_activate_flags() {
        let op = SubOperation::Install {
            source: "https://example.com/NiceTheme.zip".to_string(),
            theme: true,
            activate: true,
        };
        assert_eq!(
            dispatcher().args_for(&op),
            vec![
                "Installer.plugins",
                "install",
                "-s",
                "https://example.com/NiceTheme.zip",
                "--theme",
                "-a"
            ]
        );
    }

    #[test]
    fn install_without_activation_omits_flag() {
        let op = SubOperation::Install {
            source: "/tmp/my theme".to_string(),
            theme: true,
            activate: false,
        };
        let args = dispatcher().args_for(&op);
        assert_eq!(args[3], "/tmp/my theme");
        assert!(!args.contains(&"-a".to_string()));
    }

    #[test]
    fn uninstall_and_activate_args() {
        let d = dispatcher();
        assert_eq!(
            d.args_for(&SubOperation::Uninstall {
                name: "NiceTheme".to_string()
            }),
            vec!["Installer.plugins", "uninstall", "-p", "NiceTheme"]
        );
        assert_eq!(
            d.args_for(&SubOperation::Activate {
                name: "NiceTheme".to_string()
            }),
            vec!["Installer.themes", "change", "-t", "NiceTheme"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn dispatch_reports_child_exit_code() {
        let config = DispatchConfig {
            program: "sh".to_string(),
            install: vec!["-c".to_string(), "exit 0".to_string(), "sh".to_string()],
            uninstall: vec!["-c".to_string(), "exit 3".to_string(), "sh".to_string()],
            activate: vec!["-c".to_string(), "exit 0".to_string(), "sh".to_string()],
        };
        let mut d = CommandDispatcher::new(config);

        let install = SubOperation::Install {
            source: "x".to_string(),
            theme: true,
            activate: true,
        };
        assert_eq!(d.dispatch(&install).unwrap(), 0);

        let uninstall = SubOperation::Uninstall {
            name: "NiceTheme".to_string(),
        };
        assert_eq!(d.dispatch(&uninstall).unwrap(), 3);
    }

    #[test]
    fn dispatch_fails_when_program_is_missing() {
        let config = DispatchConfig {
            program: "/nonexistent/themes-installer".to_string(),
            ..DispatchConfig::default()
        };
        let mut d = CommandDispatcher::new(config);
        let op = SubOperation::Activate {
            name: "NiceTheme".to_string(),
        };
        assert!(d.dispatch(&op).is_err());
    }
}
