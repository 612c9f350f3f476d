//! Configuration file handling for cmdchain

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::chain::Edge;
use crate::commands::command::{Command, MemberOf};
use crate::commands::group::CommandGroup;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file found in current directory or its parents: {0}")]
    ConfigNotFound(PathBuf),
    #[error("Unable to find directory: {path:?} (entry: {entry:?})")]
    DirectoryNotFound {
        entry: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unknown working directory: {0}")]
    UnknownWorkingDirectory(String),
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Duplicate ID in config: {0}")]
    DuplicateId(String),
    #[error("Duplicate command name in config: {0}")]
    DuplicateName(String),
    #[error("Command name `{0}` is already the id of another command")]
    NameShadowsId(String),
    #[error("Duplicate command class in config: {0}")]
    DuplicateClass(String),
    #[error("Invalid command name `{0}`: names are colon-separated segments without whitespace")]
    InvalidName(String),
    #[error("Invalid config: {0}")]
    Validation(String),
}

/// A "member of" declaration attached to a command
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ConfigMemberOf {
    pub parent: Option<String>,
}

impl From<ConfigMemberOf> for MemberOf {
    fn from(config: ConfigMemberOf) -> Self {
        MemberOf {
            parent: config.parent,
        }
    }
}

/// Configuration for a single command
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigCommand {
    pub id: Option<String>,
    pub name: String,
    pub class: Option<String>,
    pub description: Option<String>,
    pub cwd: Option<PathBuf>,
    pub cmd: String,
    pub env: Option<HashMap<String, String>>,
    pub chain: Option<Vec<ConfigMemberOf>>,
}

impl From<ConfigCommand> for Command {
    fn from(config: ConfigCommand) -> Self {
        let id = config.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        Command {
            class: config.class.unwrap_or_else(|| id.clone()),
            id,
            name: config.name,
            description: config.description,
            cmd: config.cmd,
            cwd: config.cwd.unwrap_or_default(),
            env: config.env.unwrap_or_default(),
            chain: config
                .chain
                .unwrap_or_default()
                .into_iter()
                .map(MemberOf::from)
                .collect(),
        }
    }
}

/// Configuration for a group of commands
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigCommandGroup {
    pub id: Option<String>,
    pub name: String,
    pub cwd: Option<PathBuf>,
    pub commands: Option<Vec<ConfigCommand>>,
    pub children: Option<Vec<ConfigCommandGroup>>,
    pub env: Option<HashMap<String, String>>,
}

impl From<ConfigCommandGroup> for CommandGroup {
    fn from(config: ConfigCommandGroup) -> Self {
        CommandGroup {
            id: config.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: config.name,
            cwd: config.cwd.unwrap_or_default(),
            commands: config
                .commands
                .unwrap_or_default()
                .into_iter()
                .map(Command::from)
                .collect(),
            children: config
                .children
                .unwrap_or_default()
                .into_iter()
                .map(CommandGroup::from)
                .collect(),
            env: config.env.unwrap_or_default(),
        }
    }
}

/// An explicit chain declaration in the top-level `chains` list
///
/// The class is never given here: it always comes from the member command itself.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConfigChainEdge {
    pub member: String,
    pub parent: Option<String>,
}

impl From<ConfigChainEdge> for Edge {
    fn from(config: ConfigChainEdge) -> Self {
        Edge {
            member: config.member,
            parent: config.parent,
            class: None,
        }
    }
}

/// Root configuration structure for cmdchain
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub cmdchain_version: String,
    pub chains: Option<Vec<ConfigChainEdge>>,
    #[serde(flatten)]
    pub root: ConfigCommandGroup,
}

/// List of supported configuration file names
const FILENAMES: [&str; 3] = [".cmdchain.json", ".cmdchain.yaml", ".cmdchain.yml"];

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file cannot be read, or
    /// `ConfigError::Yaml`/`ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(file)
            .map_err(|_| ConfigError::ConfigNotFound(file.to_path_buf()))?;
        let config: Config = if file.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        Ok(config)
    }

    /// Searches for a configuration file in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownWorkingDirectory` if the cwd cannot be determined,
    /// or `ConfigError::ConfigNotFound` if no config file is found.
    pub fn find_config() -> Result<PathBuf, ConfigError> {
        let config_path = std::env::current_dir()
            .map_err(|e| ConfigError::UnknownWorkingDirectory(e.to_string()))?;
        let mut path = config_path.clone();
        debug!("Searching for config file in {}", config_path.display());
        loop {
            for file in &FILENAMES {
                let config_path = path.join(file);
                if config_path.exists() {
                    info!("Found config file: {}", config_path.display());
                    return Ok(config_path);
                }
            }
            if !path.pop() {
                return Err(ConfigError::ConfigNotFound(config_path));
            }
        }
    }
}
