//! Command table and dispatch
//!
//! The [`Application`] owns every runnable command, wraps chain parents in a
//! [`ChainExecutor`] and runs the [`InvocationGuard`] before any command body.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::chain::{
    ChainExecutor, ChainRegistry, Edge, GraphBuilder, GuardViolation, InvocationGuard, Verdict,
};
use crate::commands::group::CommandGroup;
use crate::runnable::{CommandId, CommandLookup, ExitStatus, Invocation, RunError, Runnable};
use crate::shell::ShellCommand;

/// Errors returned when dispatching a command by name
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Command \"{0}\" is not defined.")]
    NotFound(String),
    #[error(transparent)]
    Blocked(#[from] GuardViolation),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Runnable commands keyed by id, with a name index for invocation
#[derive(Default)]
pub struct CommandTable {
    by_id: HashMap<CommandId, Arc<dyn Runnable>>,
    by_name: HashMap<String, CommandId>,
    order: Vec<CommandId>,
}

impl CommandTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table of shell-backed commands from a configured tree.
    #[must_use]
    pub fn from_group(root: &CommandGroup) -> Self {
        let mut table = Self::new();
        for command in root.all_commands() {
            table.insert(command.id.clone(), Arc::new(ShellCommand::new(command.clone())));
        }
        table
    }

    /// Register a runnable under `id`, replacing any previous entry with that id.
    pub fn insert(&mut self, id: impl Into<CommandId>, runnable: Arc<dyn Runnable>) {
        let id = id.into();
        self.by_name.insert(runnable.name().to_string(), id.clone());
        if self.by_id.insert(id.clone(), runnable).is_none() {
            self.order.push(id);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Runnable>> {
        self.by_id.get(id)
    }

    /// Find a command by invocation name, falling back to its id.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<(&str, &Arc<dyn Runnable>)> {
        let id = self.by_name.get(name).map_or(name, String::as_str);
        self.by_id
            .get_key_value(id)
            .map(|(id, runnable)| (id.as_str(), runnable))
    }

    /// Command ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn decorate(&mut self, parents: &[CommandId], registry: &Arc<ChainRegistry>) {
        for parent_id in parents {
            let Some(inner) = self.by_id.get(parent_id).cloned() else {
                debug!("Chain parent '{parent_id}' is not a known command, leaving it undecorated");
                continue;
            };
            let executor = ChainExecutor::new(parent_id.clone(), inner, Arc::clone(registry));
            self.by_id.insert(parent_id.clone(), Arc::new(executor));
        }
    }
}

impl CommandLookup for CommandTable {
    fn resolve(&self, id: &str) -> Option<Arc<dyn Runnable>> {
        self.by_id.get(id).cloned()
    }

    fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }
}

/// Commands plus their chain wiring, ready for dispatch
pub struct Application {
    commands: CommandTable,
    registry: Arc<ChainRegistry>,
    parents: Vec<CommandId>,
    guard: InvocationGuard,
}

impl Application {
    /// Build the chain registry from `edges` and wrap every resolvable parent.
    #[must_use]
    pub fn new<I>(mut commands: CommandTable, edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let graph = GraphBuilder::new(&commands).build(edges);
        let registry = Arc::new(graph.registry);
        commands.decorate(&graph.parents, &registry);
        info!(
            "Loaded {} commands with {} chain parent(s)",
            commands.len(),
            graph.parents.len()
        );
        Self {
            commands,
            guard: InvocationGuard::new(Arc::clone(&registry)),
            registry,
            parents: graph.parents,
        }
    }

    #[must_use]
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    #[must_use]
    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Distinct chain parents in first-declared order
    #[must_use]
    pub fn parents(&self) -> &[CommandId] {
        &self.parents
    }

    /// Display name for a command id, if it resolves
    #[must_use]
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.commands.get(id).map(|runnable| runnable.name())
    }

    /// Invoke a command by name.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NotFound` for unknown names, `DispatchError::Blocked` when a
    /// chain member is invoked directly, and `DispatchError::Run` if the command faults.
    pub fn run(&self, name: &str, args: &[String]) -> Result<ExitStatus, DispatchError> {
        let (id, runnable) = self
            .commands
            .find(name)
            .ok_or_else(|| DispatchError::NotFound(name.to_string()))?;

        if let Verdict::Abort(violation) =
            self.guard
                .before_invoke(runnable.class_id(), runnable.name(), &self.commands)
        {
            return Err(violation.into());
        }

        debug!("Dispatching '{}' ({id})", runnable.name());
        let status = runnable.run(&Invocation::new(args, &self.commands))?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::{Behavior, Catalog, Scripted};
    use crate::commands::command::Command;

    fn table(catalog: &Catalog, ids: &[&str]) -> CommandTable {
        let mut table = CommandTable::new();
        for id in ids {
            let scripted: Arc<Scripted> = catalog.scripted(id);
            table.insert(*id, scripted);
        }
        table
    }

    fn app(catalog: &Catalog, ids: &[&str], edges: Vec<Edge>) -> Application {
        Application::new(table(catalog, ids), edges)
    }

    #[test]
    fn test_parent_runs_chain() {
        let catalog = Catalog::of(&["p", "m1", "m2"]);
        let app = app(
            &catalog,
            &["p", "m1", "m2"],
            vec![Edge::new("m1", "p"), Edge::new("m2", "p")],
        );

        let status = app.run("p:name", &[]).unwrap();

        assert_eq!(status, ExitStatus::SUCCESS);
        assert_eq!(catalog.journal(), ["p:name[]", "m1:name[]", "m2:name[]"]);
        assert_eq!(app.registry().members_of("p"), ["m1", "m2"]);
    }

    #[test]
    fn test_member_invocation_is_blocked() {
        let catalog = Catalog::of(&["p", "m1"]);
        let app = app(
            &catalog,
            &["p", "m1"],
            vec![Edge::new("m1", "p").with_class("M1")],
        );

        let err = app.run("m1:name", &[]).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error: m1:name command is a member of p:name command chain and cannot be executed on its own."
        );
        assert!(matches!(err, DispatchError::Blocked(_)));
        assert!(catalog.journal().is_empty());
    }

    #[test]
    fn test_failed_parent_returns_its_status() {
        let mut catalog = Catalog::of(&["m1"]);
        catalog.add("p", Behavior::Exit(ExitStatus(2)));
        let app = app(&catalog, &["p", "m1"], vec![Edge::new("m1", "p")]);

        assert_eq!(app.run("p", &[]).unwrap(), ExitStatus(2));
        assert_eq!(catalog.scripted("m1").calls(), 0);
    }

    #[test]
    fn test_plain_command_receives_arguments() {
        let catalog = Catalog::of(&["solo"]);
        let app = app(&catalog, &["solo"], vec![]);
        let args = vec!["--verbose".to_string()];

        assert_eq!(app.run("solo:name", &args).unwrap(), ExitStatus::SUCCESS);
        assert_eq!(catalog.journal(), ["solo:name[\"--verbose\"]"]);
    }

    #[test]
    fn test_unknown_command() {
        let catalog = Catalog::default();
        let app = app(&catalog, &[], vec![]);
        assert!(matches!(
            app.run("nope", &[]),
            Err(DispatchError::NotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_top_level_fault_is_reported() {
        let mut catalog = Catalog::default();
        catalog.add("broken", Behavior::Fault);
        let app = app(&catalog, &["broken"], vec![]);
        assert!(matches!(app.run("broken", &[]), Err(DispatchError::Run(_))));
    }

    #[test]
    fn test_unknown_parent_is_not_decorated() {
        let catalog = Catalog::of(&["m1"]);
        let app = app(&catalog, &["m1"], vec![Edge::new("m1", "ghost").with_class("M1")]);

        assert_eq!(app.parents(), ["ghost"]);
        assert_eq!(app.display_name("ghost"), None);
        let err = app.run("m1:name", &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: m1:name command is a member of  command chain and cannot be executed on its own."
        );
    }

    #[test]
    fn test_nested_chains_run_depth_first() {
        let catalog = Catalog::of(&["a", "b", "c", "d"]);
        let app = app(
            &catalog,
            &["a", "b", "c", "d"],
            vec![Edge::new("b", "a"), Edge::new("c", "b"), Edge::new("d", "a")],
        );

        assert_eq!(app.run("a", &[]).unwrap(), ExitStatus::SUCCESS);
        assert_eq!(
            catalog.journal(),
            ["a:name[]", "b:name[]", "c:name[]", "d:name[]"]
        );
    }

    #[test]
    fn test_table_from_group_uses_shell_commands() {
        let root = CommandGroup {
            commands: vec![Command {
                id: "foo.hello".to_string(),
                name: "foo:hello".to_string(),
                class: "FooHello".to_string(),
                cmd: "true".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let table = CommandTable::from_group(&root);
        let (id, runnable) = table.find("foo:hello").unwrap();
        assert_eq!(id, "foo.hello");
        assert_eq!(runnable.class_id(), "FooHello");
        assert!(table.find("foo.hello").is_some());
        assert_eq!(table.ids().collect::<Vec<_>>(), ["foo.hello"]);
    }
}
