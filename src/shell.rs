use std::process::Command as ProcessCommand;

use log::debug;

use crate::commands::command::Command;
use crate::runnable::{ExitStatus, Invocation, RunError, Runnable};

/// Runs a configured command through `sh -c`
///
/// Output goes straight to the inherited stdout/stderr, so chain members print in the order
/// they run. Arguments from the invocation are available to the script as `$1`, `$2`, ...
#[derive(Debug, Clone)]
pub struct ShellCommand {
    command: Command,
}

impl ShellCommand {
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self { command }
    }

    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }
}

impl Runnable for ShellCommand {
    fn name(&self) -> &str {
        &self.command.name
    }

    fn class_id(&self) -> &str {
        &self.command.class
    }

    fn description(&self) -> Option<&str> {
        self.command.description.as_deref()
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<ExitStatus, RunError> {
        debug!(
            "Running '{}' in {} with {} argument(s)",
            self.command.cmd,
            self.command.cwd.display(),
            invocation.args.len()
        );
        let mut process = ProcessCommand::new("sh");
        process
            .arg("-c")
            .arg(&self.command.cmd)
            .arg(&self.command.name)
            .args(invocation.args)
            .envs(&self.command.env);
        if !self.command.cwd.as_os_str().is_empty() {
            process.current_dir(&self.command.cwd);
        }

        let status = process.status().map_err(|e| RunError::Spawn {
            command: self.command.name.clone(),
            source: e,
        })?;
        // Killed by a signal
        Ok(status.code().map_or(ExitStatus::FAILURE, ExitStatus))
    }
}
