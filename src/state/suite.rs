// Suite arena
//
// Suites live in one arena and refer to each other by index. A suite is
// inserted under an existing parent, and re-parenting is refused when the
// new parent lies below the suite, so following parent handles upward
// terminates at the root.

use crate::state::TestId;
use std::collections::HashMap;

/// Index of a suite in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(usize);

impl SuiteId {
    /// The run-level suite
    pub const ROOT: SuiteId = SuiteId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the suite tree.
///
/// Child containers stay `None` until something is attached to them.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteNode {
    pub title: String,
    pub parent: Option<SuiteId>,
    pub suites: Option<Vec<SuiteId>>,
    pub tests: Option<Vec<TestId>>,
    pub duration_ms: f64,
    pub failures: usize,
}

impl SuiteNode {
    fn new(title: impl Into<String>, parent: Option<SuiteId>) -> Self {
        Self {
            title: title.into(),
            parent,
            suites: None,
            tests: None,
            duration_ms: 0.0,
            failures: 0,
        }
    }

    pub fn child_suites(&self) -> &[SuiteId] {
        self.suites.as_deref().unwrap_or_default()
    }

    pub fn child_tests(&self) -> &[TestId] {
        self.tests.as_deref().unwrap_or_default()
    }

    /// Drop all containment and zero the aggregates
    pub fn reset(&mut self) {
        self.suites = None;
        self.tests = None;
        self.duration_ms = 0.0;
        self.failures = 0;
    }
}

/// Owner of every suite seen during a run, keyed by the engine's suite id
#[derive(Debug, Clone)]
pub struct SuiteArena {
    nodes: Vec<SuiteNode>,
    by_key: HashMap<String, SuiteId>,
}

impl SuiteArena {
    pub fn new(root_title: impl Into<String>) -> Self {
        Self {
            nodes: vec![SuiteNode::new(root_title, None)],
            by_key: HashMap::new(),
        }
    }

    pub fn root(&self) -> &SuiteNode {
        &self.nodes[SuiteId::ROOT.0]
    }

    pub fn root_mut(&mut self) -> &mut SuiteNode {
        &mut self.nodes[SuiteId::ROOT.0]
    }

    pub fn get(&self, id: SuiteId) -> &SuiteNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: SuiteId) -> &mut SuiteNode {
        &mut self.nodes[id.0]
    }

    pub fn lookup(&self, key: &str) -> Option<SuiteId> {
        self.by_key.get(key).copied()
    }

    /// Number of suites, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Register a suite under `parent`, or return the existing id for `key`.
    ///
    /// An existing suite keeps its original parent; only its title is
    /// refreshed. This keeps every parent handle pointing at an older node.
    pub fn insert(&mut self, key: &str, title: &str, parent: SuiteId) -> SuiteId {
        if let Some(id) = self.lookup(key) {
            self.nodes[id.0].title = title.to_string();
            return id;
        }

        let id = SuiteId(self.nodes.len());
        self.nodes.push(SuiteNode::new(title, Some(parent)));
        self.by_key.insert(key.to_string(), id);
        id
    }

    /// Whether `ancestor` is `id` itself or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: SuiteId, id: SuiteId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).parent;
        }
        false
    }

    /// Move `id` under `parent`.
    ///
    /// Returns `false` and leaves the tree untouched when `parent` is `id`
    /// or one of its descendants.
    pub fn reparent(&mut self, id: SuiteId, parent: SuiteId) -> bool {
        if id.is_root() || self.is_ancestor(id, parent) {
            return false;
        }
        self.nodes[id.0].parent = Some(parent);
        true
    }

    /// Titles from the outermost suite down to `id`, root excluded
    pub fn title_path(&self, id: SuiteId) -> Vec<&str> {
        let mut titles = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor.filter(|c| !c.is_root()) {
            let node = self.get(current);
            titles.push(node.title.as_str());
            cursor = node.parent;
        }
        titles.reverse();
        titles
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SuiteNode> {
        self.nodes.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_keyed() {
        let mut arena = SuiteArena::new("Test Run");
        let outer = arena.insert("s1", "Outer", SuiteId::ROOT);
        let again = arena.insert("s1", "Outer (renamed)", SuiteId::ROOT);

        assert_eq!(outer, again);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(outer).title, "Outer (renamed)");
    }

    #[test]
    fn test_insert_keeps_original_parent() {
        let mut arena = SuiteArena::new("Test Run");
        let outer = arena.insert("s1", "Outer", SuiteId::ROOT);
        let inner = arena.insert("s2", "Inner", outer);
        arena.insert("s1", "Outer", inner);

        assert_eq!(arena.get(outer).parent, Some(SuiteId::ROOT));
    }

    #[test]
    fn test_title_path_skips_root() {
        let mut arena = SuiteArena::new("Test Run");
        let outer = arena.insert("s1", "Outer", SuiteId::ROOT);
        let inner = arena.insert("s2", "Inner", outer);

        assert_eq!(arena.title_path(inner), vec!["Outer", "Inner"]);
        assert!(arena.title_path(SuiteId::ROOT).is_empty());
    }

    #[test]
    fn test_reparent_refuses_loops() {
        let mut arena = SuiteArena::new("Test Run");
        let outer = arena.insert("s1", "Outer", SuiteId::ROOT);
        let inner = arena.insert("s2", "Inner", outer);
        let other = arena.insert("s3", "Other", SuiteId::ROOT);

        assert!(!arena.reparent(outer, inner));
        assert!(!arena.reparent(outer, outer));
        assert_eq!(arena.get(outer).parent, Some(SuiteId::ROOT));

        assert!(arena.reparent(other, inner));
        assert_eq!(arena.title_path(other), vec!["Outer", "Inner", "Other"]);
        assert!(arena.is_ancestor(outer, other));
        assert!(!arena.is_ancestor(other, outer));
    }

    #[test]
    fn test_containers_start_unmaterialized() {
        let mut arena = SuiteArena::new("Test Run");
        let outer = arena.insert("s1", "Outer", SuiteId::ROOT);
        let node = arena.get(outer);

        assert!(node.suites.is_none());
        assert!(node.tests.is_none());
        assert!(node.child_suites().is_empty());
        assert!(node.child_tests().is_empty());
    }
}
