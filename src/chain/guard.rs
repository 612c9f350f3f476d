use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::chain::registry::ChainRegistry;
use crate::runnable::CommandLookup;

/// Raised when a chain member is invoked on its own
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Error: {member} command is a member of {parent} command chain and cannot be executed on its own."
)]
pub struct GuardViolation {
    pub member: String,
    /// Display name of the parent, empty when the parent cannot be resolved
    pub parent: String,
}

/// Outcome of the pre-invocation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Abort(GuardViolation),
}

/// Blocks direct invocation of registered chain members
#[derive(Debug, Clone)]
pub struct InvocationGuard {
    registry: Arc<ChainRegistry>,
}

impl InvocationGuard {
    #[must_use]
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Check an invocation before its body runs. Commands whose class is not registered are
    /// always allowed.
    #[must_use]
    pub fn before_invoke(
        &self,
        class_id: &str,
        display_name: &str,
        commands: &dyn CommandLookup,
    ) -> Verdict {
        let Some(id) = self.registry.resolve_by_class(class_id) else {
            return Verdict::Allow;
        };
        if !self.registry.is_member(id) {
            return Verdict::Allow;
        }

        let parent = self
            .registry
            .parent_of(id)
            .and_then(|parent_id| commands.resolve(parent_id))
            .map(|parent| parent.name().to_string())
            .unwrap_or_default();
        debug!("Blocking direct invocation of chain member '{id}'");

        Verdict::Abort(GuardViolation {
            member: display_name.to_string(),
            parent,
        })
    }
}
