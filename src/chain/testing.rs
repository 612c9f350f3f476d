//! In-memory runnables for exercising chains without spawning processes

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::runnable::{CommandLookup, ExitStatus, Invocation, RunError, Runnable};

#[derive(Clone, Copy)]
pub(crate) enum Behavior {
    Exit(ExitStatus),
    Fault,
    Panic,
}

/// Runnable that records each call into a shared journal
pub(crate) struct Scripted {
    pub name: String,
    pub class: String,
    pub behavior: Behavior,
    pub calls: AtomicUsize,
    journal: Arc<Mutex<Vec<String>>>,
}

impl Scripted {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Runnable for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn class_id(&self) -> &str {
        &self.class
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<ExitStatus, RunError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .push(format!("{}{:?}", self.name, invocation.args));
        match self.behavior {
            Behavior::Exit(status) => Ok(status),
            Behavior::Fault => Err(RunError::Unresolved(format!("{}-dependency", self.name))),
            Behavior::Panic => panic!("{} exploded", self.name),
        }
    }
}

/// Id-keyed catalog of scripted commands sharing one journal
#[derive(Default)]
pub(crate) struct Catalog {
    commands: HashMap<String, Arc<dyn Runnable>>,
    scripted: HashMap<String, Arc<Scripted>>,
    lookups: AtomicUsize,
    journal: Arc<Mutex<Vec<String>>>,
}

impl Catalog {
    pub fn of(ids: &[&str]) -> Self {
        let mut catalog = Self::default();
        for id in ids {
            catalog.add(id, Behavior::Exit(ExitStatus::SUCCESS));
        }
        catalog
    }

    /// Add a command whose display name is `id` with a `:name` suffix and class is uppercased.
    pub fn add(&mut self, id: &str, behavior: Behavior) -> Arc<Scripted> {
        let scripted = Arc::new(Scripted {
            name: format!("{id}:name"),
            class: id.to_uppercase(),
            behavior,
            calls: AtomicUsize::new(0),
            journal: Arc::clone(&self.journal),
        });
        self.scripted.insert(id.to_string(), Arc::clone(&scripted));
        self.commands.insert(id.to_string(), scripted.clone());
        scripted
    }

    pub fn replace(&mut self, id: &str, runnable: Arc<dyn Runnable>) {
        self.commands.insert(id.to_string(), runnable);
    }

    pub fn scripted(&self, id: &str) -> Arc<Scripted> {
        Arc::clone(&self.scripted[id])
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn reset_lookups(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().clone()
    }
}

impl CommandLookup for Catalog {
    fn resolve(&self, id: &str) -> Option<Arc<dyn Runnable>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.commands.get(id).cloned()
    }
}
