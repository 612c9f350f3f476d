//! Core implementation of cmdchain
//!
//! cmdchain runs configured shell commands by name. A command can declare itself a member of
//! another command's chain: invoking the parent then runs every member in declaration order,
//! and invoking a member on its own is refused.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::application::{Application, CommandTable};
use crate::chain::Edge;
use crate::commands::group::CommandGroup;
use crate::commands::inherit::{Inheritable, Inheritance};
use crate::config_file::{Config, ConfigError};

pub mod application;
pub mod chain;
pub mod commands;
pub mod config_file;
pub mod listing;
pub mod logger;
pub mod runnable;
pub mod shell;

/// Console naming rule: colon-separated segments, no whitespace
static COMMAND_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^:\s]+(:[^:\s]+)*$").expect("command name pattern is valid")
});

/// A loaded and validated configuration
#[derive(Debug)]
pub struct LoadedConfig {
    pub root: CommandGroup,
    /// Explicit entries from the top-level `chains` list, in file order
    pub chains: Vec<Edge>,
    pub cwd: PathBuf,
    pub config_path: PathBuf,
}

impl LoadedConfig {
    /// All declared chain edges: per-command declarations in tree order, then the explicit
    /// list. Every edge carries the member command's own class, so the guard finds it.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let commands = self.root.all_commands();
        let classes: HashMap<&str, &str> = commands
            .iter()
            .map(|c| (c.id.as_str(), c.class.as_str()))
            .collect();

        let declared = commands.iter().flat_map(|command| {
            command.chain.iter().map(move |member_of| Edge {
                member: command.id.clone(),
                parent: member_of.parent.clone(),
                class: Some(command.class.clone()),
            })
        });
        let explicit = self.chains.iter().map(|edge| Edge {
            class: classes.get(edge.member.as_str()).map(|c| (*c).to_string()),
            ..edge.clone()
        });

        declared.chain(explicit).collect()
    }

    /// Build the dispatchable application for this configuration.
    #[must_use]
    pub fn application(&self) -> Application {
        Application::new(CommandTable::from_group(&self.root), self.edges())
    }
}

/// Load configuration from a file (or auto-detect).
///
/// # Errors
///
/// Returns `ConfigError` if the config file is not found, cannot be parsed,
/// contains invalid values, or references non-existent directories.
pub fn load_config(config_file: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match config_file {
        Some(file) => {
            let config_path = PathBuf::from(file);
            if !config_path.exists() {
                return Err(ConfigError::ConfigNotFound(config_path));
            }
            config_path
        }
        None => Config::find_config()?,
    };
    let cwd = config_path
        .parent()
        .ok_or_else(|| ConfigError::ConfigNotFound(config_path.clone()))?
        .to_path_buf();
    debug!(
        "Loading config file: {} (cwd: {})",
        config_path.display(),
        cwd.display()
    );
    let parsed = Config::from_file(&config_path)?;
    validate_version(&parsed.cmdchain_version);
    let mut root: CommandGroup = parsed.root.into();
    validate_tree(&root)?;
    root.inherit(&Inheritance::from(cwd.clone()))?;
    let chains = parsed
        .chains
        .unwrap_or_default()
        .into_iter()
        .map(Edge::from)
        .collect();
    Ok(LoadedConfig {
        root,
        chains,
        cwd,
        config_path,
    })
}

/// Warn if the config's `cmdchain_version` doesn't match the binary version
fn validate_version(config_version: &str) {
    let binary_version = env!("CARGO_PKG_VERSION");
    if config_version != binary_version {
        warn!(
            "Config cmdchain_version '{config_version}' differs from binary version '{binary_version}'"
        );
    }
}

/// Validate the config tree for duplicate IDs, names and classes, bad names, and empty commands
fn validate_tree(root: &CommandGroup) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    check_duplicates(root, &mut seen_ids)?;
    check_names(root)?;
    check_classes(root)?;
    check_empty_commands(root)?;
    check_empty_groups(root);
    Ok(())
}

fn check_duplicates(group: &CommandGroup, seen: &mut HashSet<String>) -> Result<(), ConfigError> {
    if !seen.insert(group.id.clone()) {
        return Err(ConfigError::DuplicateId(group.id.clone()));
    }
    for cmd in &group.commands {
        if !seen.insert(cmd.id.clone()) {
            return Err(ConfigError::DuplicateId(cmd.id.clone()));
        }
    }
    for child in &group.children {
        check_duplicates(child, seen)?;
    }
    Ok(())
}

/// Names must be well-formed and unique, and must not hide another command's id
fn check_names(root: &CommandGroup) -> Result<(), ConfigError> {
    let commands = root.all_commands();
    let ids: HashSet<&str> = commands.iter().map(|c| c.id.as_str()).collect();
    let mut seen = HashSet::new();
    for cmd in &commands {
        if !COMMAND_NAME.is_match(&cmd.name) {
            return Err(ConfigError::InvalidName(cmd.name.clone()));
        }
        if !seen.insert(cmd.name.as_str()) {
            return Err(ConfigError::DuplicateName(cmd.name.clone()));
        }
        if cmd.name != cmd.id && ids.contains(cmd.name.as_str()) {
            return Err(ConfigError::NameShadowsId(cmd.name.clone()));
        }
    }
    Ok(())
}

/// The guard identifies commands by class, so two commands cannot share one
fn check_classes(root: &CommandGroup) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for cmd in root.all_commands() {
        if !seen.insert(cmd.class.as_str()) {
            return Err(ConfigError::DuplicateClass(cmd.class.clone()));
        }
    }
    Ok(())
}

fn check_empty_commands(group: &CommandGroup) -> Result<(), ConfigError> {
    for cmd in group.all_commands() {
        if cmd.cmd.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Command '{}' has an empty cmd string",
                cmd.name
            )));
        }
    }
    Ok(())
}

fn check_empty_groups(group: &CommandGroup) {
    for child in &group.children {
        if child.commands.is_empty() && child.children.is_empty() {
            warn!("Group '{}' has no commands and no children", child.name);
        }
        check_empty_groups(child);
    }
}
