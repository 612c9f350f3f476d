use std::collections::HashSet;

use crate::chain::registry::ChainRegistry;
use crate::runnable::{ClassId, CommandId, CommandLookup};

/// A declared "member of" relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub member: CommandId,
    pub parent: Option<CommandId>,
    pub class: Option<ClassId>,
}

impl Edge {
    pub fn new(member: impl Into<CommandId>, parent: impl Into<CommandId>) -> Self {
        Self {
            member: member.into(),
            parent: Some(parent.into()),
            class: None,
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<ClassId>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// Output of a build: the registry plus every distinct parent, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ChainGraph {
    pub registry: ChainRegistry,
    pub parents: Vec<CommandId>,
}

/// Assembles a [`ChainRegistry`] from declared edges
pub struct GraphBuilder<'a> {
    commands: &'a dyn CommandLookup,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub fn new(commands: &'a dyn CommandLookup) -> Self {
        Self { commands }
    }

    /// Build the registry. Edges without a parent, or whose member does not resolve, are
    /// skipped without error.
    #[must_use]
    pub fn build<I>(&self, edges: I) -> ChainGraph
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut graph = ChainGraph::default();
        let mut seen_parents = HashSet::new();

        for edge in edges {
            let Some(parent) = edge.parent else {
                continue;
            };
            if !self.commands.contains(&edge.member) {
                continue;
            }

            graph.registry.add_member(&parent, &edge.member);
            if let Some(class) = &edge.class {
                graph.registry.add_class_mapping(class, &edge.member);
            }
            if seen_parents.insert(parent.clone()) {
                graph.parents.push(parent);
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::Catalog;

    #[test]
    fn test_members_keep_declaration_order() {
        let catalog = Catalog::of(&["p", "m1", "m2"]);
        let graph = GraphBuilder::new(&catalog).build([Edge::new("m1", "p"), Edge::new("m2", "p")]);
        assert_eq!(graph.registry.members_of("p"), ["m1", "m2"]);
        assert_eq!(graph.parents, ["p"]);
    }

    #[test]
    fn test_duplicate_declarations_are_kept() {
        let catalog = Catalog::of(&["p", "m"]);
        let graph = GraphBuilder::new(&catalog).build([Edge::new("m", "p"), Edge::new("m", "p")]);
        assert_eq!(graph.registry.members_of("p"), ["m", "m"]);
        assert_eq!(graph.parents, ["p"]);
    }

    #[test]
    fn test_last_declared_parent_wins() {
        let catalog = Catalog::of(&["p1", "p2", "m"]);
        let graph = GraphBuilder::new(&catalog).build([Edge::new("m", "p1"), Edge::new("m", "p2")]);
        assert_eq!(graph.registry.parent_of("m"), Some("p2"));
        // Both parents still list the member
        assert_eq!(graph.registry.members_of("p1"), ["m"]);
        assert_eq!(graph.registry.members_of("p2"), ["m"]);
        assert_eq!(graph.parents, ["p1", "p2"]);
    }

    #[test]
    fn test_missing_parent_is_skipped() {
        let catalog = Catalog::of(&["m"]);
        let edge = Edge {
            member: "m".to_string(),
            parent: None,
            class: Some("M".to_string()),
        };
        let graph = GraphBuilder::new(&catalog).build([edge]);
        assert!(!graph.registry.is_member("m"));
        assert_eq!(graph.registry.resolve_by_class("M"), None);
        assert!(graph.parents.is_empty());
    }

    #[test]
    fn test_unresolved_member_is_skipped() {
        let catalog = Catalog::of(&["p"]);
        let graph = GraphBuilder::new(&catalog).build([Edge::new("ghost", "p").with_class("Ghost")]);
        assert!(graph.registry.is_empty());
        assert!(!graph.registry.is_member("ghost"));
        assert_eq!(graph.registry.resolve_by_class("Ghost"), None);
        assert!(graph.parents.is_empty());
    }

    #[test]
    fn test_unresolved_parent_is_still_recorded() {
        // Only the member has to exist; the decoration step skips parents it cannot find.
        let catalog = Catalog::of(&["m"]);
        let graph = GraphBuilder::new(&catalog).build([Edge::new("m", "missing")]);
        assert_eq!(graph.registry.parent_of("m"), Some("missing"));
        assert_eq!(graph.parents, ["missing"]);
    }

    #[test]
    fn test_class_mapping_is_recorded() {
        let catalog = Catalog::of(&["p", "m"]);
        let graph = GraphBuilder::new(&catalog).build([Edge::new("m", "p").with_class("MemberClass")]);
        assert_eq!(graph.registry.resolve_by_class("MemberClass"), Some("m"));
    }

    #[test]
    fn test_is_member_matches_valid_edges() {
        let catalog = Catalog::of(&["a", "b", "c", "d"]);
        let edges = vec![
            Edge::new("b", "a"),
            Edge::new("c", "b"),
            Edge {
                member: "d".to_string(),
                parent: None,
                class: None,
            },
        ];
        let graph = GraphBuilder::new(&catalog).build(edges);
        assert!(!graph.registry.is_member("a"));
        assert!(graph.registry.is_member("b"));
        assert!(graph.registry.is_member("c"));
        assert!(!graph.registry.is_member("d"));
        assert_eq!(graph.parents, ["a", "b"]);
    }
}
