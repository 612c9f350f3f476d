use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::chain::registry::ChainRegistry;
use crate::runnable::{CommandId, CommandLookup, ExitStatus, Invocation, RunError, Runnable};

/// Wraps a parent command so that invoking it also runs its chain members
///
/// The parent runs first with an empty invocation. Members only run after a successful
/// parent, one at a time and in registration order. A member that faults is logged and
/// turns the aggregate status into a failure, but never stops the remaining members.
/// A member that merely returns a failure status leaves the aggregate untouched.
pub struct ChainExecutor {
    parent_id: CommandId,
    inner: Arc<dyn Runnable>,
    registry: Arc<ChainRegistry>,
}

impl ChainExecutor {
    #[must_use]
    pub fn new(
        parent_id: impl Into<CommandId>,
        inner: Arc<dyn Runnable>,
        registry: Arc<ChainRegistry>,
    ) -> Self {
        Self {
            parent_id: parent_id.into(),
            inner,
            registry,
        }
    }

    #[must_use]
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    /// Run the parent and, if it succeeds, every member resolved through `commands`.
    ///
    /// # Errors
    ///
    /// Returns `RunError` only when the parent itself faults; member faults are absorbed.
    pub fn run_chain(&self, commands: &dyn CommandLookup) -> Result<ExitStatus, RunError> {
        let parent_name = self.inner.name();
        let members = self.registry.members_of(&self.parent_id);

        info!("{parent_name} is a parent command of a command chain that has registered member commands");
        for member_id in members {
            info!("{member_id} registered as a member of {parent_name} command chain");
        }

        info!("Executing {parent_name} command itself first:");
        let status = self.inner.run(&Invocation::empty(commands))?;
        if !status.is_success() {
            warn!(
                "Execution of {parent_name} chain skipped because the parent command failed with status code {}.",
                status.code()
            );
            return Ok(status);
        }

        if members.is_empty() {
            info!("Command {parent_name} has no chain members to execute");
            return Ok(status);
        }

        info!("Executing {parent_name} chain members:");
        let mut aggregate = status;
        for member_id in members {
            match run_member(member_id, parent_name, commands) {
                Ok(member_status) if member_status.is_success() => {
                    debug!("Chain member '{member_id}' completed");
                }
                Ok(member_status) => {
                    debug!(
                        "Chain member '{member_id}' returned status code {}",
                        member_status.code()
                    );
                }
                Err(e) => {
                    error!("Exception thrown while running chain member \"{member_id}\": {e}");
                    aggregate = ExitStatus::FAILURE;
                }
            }
        }

        info!("Execution of {parent_name} chain completed.");
        Ok(aggregate)
    }
}

fn run_member(
    member_id: &str,
    parent_name: &str,
    commands: &dyn CommandLookup,
) -> Result<ExitStatus, RunError> {
    let member = commands
        .resolve(member_id)
        .ok_or_else(|| RunError::Unresolved(member_id.to_string()))?;
    info!("Running {} as part of {parent_name} chain", member.name());
    let invocation = Invocation::empty(commands);
    panic::catch_unwind(AssertUnwindSafe(|| member.run(&invocation))).unwrap_or_else(|payload| {
        Err(RunError::Panicked {
            command: member.name().to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Runnable for ChainExecutor {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn class_id(&self) -> &str {
        self.inner.class_id()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<ExitStatus, RunError> {
        self.run_chain(invocation.commands)
    }
}
