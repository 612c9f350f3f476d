use std::collections::HashMap;
use std::path::PathBuf;

/// Declaration that a command belongs to another command's chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberOf {
    /// Id of the parent command. Declarations without one are ignored.
    pub parent: Option<String>,
}

/// A single shell-backed command
#[derive(Debug, Clone, Default)]
pub struct Command {
    pub id: String,
    /// Invocation name, e.g. `foo:hello`
    pub name: String,
    /// Implementation class, used to recognise the command at invocation time
    pub class: String,
    pub description: Option<String>,
    pub cmd: String,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
    pub chain: Vec<MemberOf>,
}
