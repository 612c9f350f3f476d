//! The capability shared by every invocable command
//!
//! Shell-backed commands, chain executors and test doubles all implement [`Runnable`], so a
//! chain executor can stand in for the command it wraps without the dispatcher noticing.

use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;

/// Opaque identifier naming a runnable component, unique within a command table
pub type CommandId = String;

/// Opaque identifier of the implementation type backing a [`CommandId`]
pub type ClassId = String;

/// Status code returned by a command run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    pub const FAILURE: ExitStatus = ExitStatus(1);

    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    #[must_use]
    pub fn code(self) -> i32 {
        self.0
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match u8::try_from(status.0) {
            Ok(code) => ExitCode::from(code),
            Err(_) => ExitCode::FAILURE,
        }
    }
}

/// Faults raised while running a command, as opposed to a non-success [`ExitStatus`]
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to start command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command '{0}' could not be resolved")]
    Unresolved(CommandId),
    #[error("command '{command}' panicked: {message}")]
    Panicked { command: String, message: String },
}

/// Resolves command ids to their runnable implementations.
pub trait CommandLookup: Send + Sync {
    fn resolve(&self, id: &str) -> Option<Arc<dyn Runnable>>;

    fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }
}

/// Context handed to a single command run
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub args: &'a [String],
    pub commands: &'a dyn CommandLookup,
}

impl<'a> Invocation<'a> {
    #[must_use]
    pub fn new(args: &'a [String], commands: &'a dyn CommandLookup) -> Self {
        Self { args, commands }
    }

    /// Context with no forwarded arguments, used for every run inside a chain.
    #[must_use]
    pub fn empty(commands: &'a dyn CommandLookup) -> Self {
        Self {
            args: &[],
            commands,
        }
    }
}

/// A command that can be invoked by name
pub trait Runnable: Send + Sync {
    /// Human-readable invocation name, e.g. `foo:hello`
    fn name(&self) -> &str;

    /// Implementation type identifier used by the invocation guard
    fn class_id(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Run the command body.
    ///
    /// # Errors
    ///
    /// Returns `RunError` when the command faults before producing a status.
    fn run(&self, invocation: &Invocation<'_>) -> Result<ExitStatus, RunError>;
}
