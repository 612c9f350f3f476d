use crate::commands::command::Command;
use crate::commands::group::CommandGroup;
use crate::config_file::ConfigError;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

#[must_use]
pub fn inherit_path(parent: &Path, child: PathBuf) -> PathBuf {
    if child.as_os_str().is_empty() {
        parent.to_path_buf()
    } else if child.is_relative() {
        parent.join(child)
    } else {
        child
    }
}

#[derive(Default, Clone)]
pub struct Inheritance {
    cwd: PathBuf,
    entry_path: Vec<String>,
    env: HashMap<String, String>,
}

impl Inheritance {
    fn check_cwd(&self) -> Result<(), io::Error> {
        if !self.cwd.as_os_str().is_empty() {
            self.cwd.canonicalize()?;
        }
        Ok(())
    }

    fn merge(&self, name: &str, cwd: &Path, env: &HashMap<String, String>) -> Inheritance {
        let mut entry_path = self.entry_path.clone();
        entry_path.push(name.to_string());
        let mut merged_env = self.env.clone();
        merged_env.extend(env.clone());
        Inheritance {
            cwd: inherit_path(&self.cwd, cwd.to_path_buf()),
            entry_path,
            env: merged_env,
        }
    }
}

impl From<PathBuf> for Inheritance {
    fn from(cwd: PathBuf) -> Self {
        Inheritance {
            cwd,
            ..Default::default()
        }
    }
}

/// A trait for types that inherit settings from their enclosing group
pub trait Inheritable: Sized {
    /// Calculate the inheritance state for this item.
    fn calculate_inheritance(&self, inheritance: &Inheritance) -> Inheritance;

    /// Apply previously calculated inheritance to this item.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if applying inheritance to a child fails.
    fn apply_inheritance(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError>;

    /// Calculate and apply inheritance in one step.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DirectoryNotFound` if a referenced directory does not exist.
    fn inherit(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError> {
        let inherited = self.calculate_inheritance(inheritance);
        inherited
            .check_cwd()
            .map_err(|e| ConfigError::DirectoryNotFound {
                path: inherited.cwd.clone(),
                entry: inherited.entry_path.join("."),
                source: e,
            })?;
        self.apply_inheritance(&inherited)
    }
}

impl Inheritable for Command {
    fn calculate_inheritance(&self, inheritance: &Inheritance) -> Inheritance {
        inheritance.merge(&self.name, &self.cwd, &self.env)
    }

    fn apply_inheritance(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError> {
        self.cwd.clone_from(&inheritance.cwd);
        self.env.clone_from(&inheritance.env);
        Ok(())
    }
}

impl Inheritable for CommandGroup {
    fn calculate_inheritance(&self, inheritance: &Inheritance) -> Inheritance {
        inheritance.merge(&self.name, &self.cwd, &self.env)
    }

    fn apply_inheritance(&mut self, inheritance: &Inheritance) -> Result<(), ConfigError> {
        self.cwd.clone_from(&inheritance.cwd);
        self.env.clone_from(&inheritance.env);
        for command in &mut self.commands {
            command.inherit(inheritance)?;
        }
        for child in &mut self.children {
            child.inherit(inheritance)?;
        }
        Ok(())
    }
}
