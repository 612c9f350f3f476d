use std::collections::HashMap;

use crate::runnable::{ClassId, CommandId};

/// Parent/member lookup tables, populated once by [`GraphBuilder`](super::GraphBuilder)
///
/// Members keep their raw declaration order and count. A member declared under several
/// parents only remembers the last one processed, and the same applies to class mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRegistry {
    members_of: HashMap<CommandId, Vec<CommandId>>,
    parent_of: HashMap<CommandId, CommandId>,
    class_to_id: HashMap<ClassId, CommandId>,
}

impl ChainRegistry {
    pub(crate) fn add_member(&mut self, parent: &str, member: &str) {
        self.members_of
            .entry(parent.to_string())
            .or_default()
            .push(member.to_string());
        self.parent_of
            .insert(member.to_string(), parent.to_string());
    }

    pub(crate) fn add_class_mapping(&mut self, class: &str, member: &str) {
        self.class_to_id
            .insert(class.to_string(), member.to_string());
    }

    /// Members registered under `parent`, in declaration order
    #[must_use]
    pub fn members_of(&self, parent: &str) -> &[CommandId] {
        self.members_of
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parent_of(&self, member: &str) -> Option<&str> {
        self.parent_of.get(member).map(String::as_str)
    }

    #[must_use]
    pub fn is_member(&self, id: &str) -> bool {
        self.parent_of.contains_key(id)
    }

    /// Command id registered for an implementation class
    #[must_use]
    pub fn resolve_by_class(&self, class: &str) -> Option<&str> {
        self.class_to_id.get(class).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members_of.is_empty()
    }
}
