//! Visited-node scopes for call-graph traversal
//!
//! Each branch of a branch node gets a child scope. Call visits are looked
//! up through the whole ancestor chain (cycle detection), immediate visits
//! only in the current scope (an immediate folded in one branch is folded
//! again in its sibling).

use std::collections::HashSet;

use blueprint_graph::NodeId;

#[derive(Debug, Default)]
pub struct VisitedScope<'p> {
    parent: Option<&'p VisitedScope<'p>>,
    nodes: HashSet<NodeId>,
    immediates: HashSet<NodeId>,
}

impl<'p> VisitedScope<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope for one branch below this one
    pub fn child(&self) -> VisitedScope<'_> {
        VisitedScope {
            parent: Some(self),
            nodes: HashSet::new(),
            immediates: HashSet::new(),
        }
    }

    pub fn is_visited(&self, node_id: &str) -> bool {
        self.nodes.contains(node_id) || self.parent.is_some_and(|p| p.is_visited(node_id))
    }

    pub fn mark(&mut self, node_id: &str) {
        self.nodes.insert(node_id.to_string());
    }

    pub fn is_immediate_visited(&self, node_id: &str) -> bool {
        self.immediates.contains(node_id)
    }

    pub fn mark_immediate(&mut self, node_id: &str) {
        self.immediates.insert(node_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_visits_are_seen() {
        let mut root = VisitedScope::new();
        root.mark("a");
        let child = root.child();
        assert!(child.is_visited("a"));
        assert!(!child.is_visited("b"));
    }

    #[test]
    fn test_sibling_scopes_are_independent() {
        let root = VisitedScope::new();
        let mut left = root.child();
        left.mark("shared");
        let right = root.child();
        assert!(left.is_visited("shared"));
        assert!(!right.is_visited("shared"));
    }

    #[test]
    fn test_immediates_are_scope_local() {
        let mut root = VisitedScope::new();
        root.mark_immediate("add");
        let child = root.child();
        assert!(root.is_immediate_visited("add"));
        assert!(!child.is_immediate_visited("add"));
    }
}
