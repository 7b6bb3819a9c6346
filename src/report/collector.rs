// Event collector - flat, arrival-ordered record of a run

use crate::events::{SuiteEvent, TestEvent};
use crate::report::hierarchy;
use crate::state::{ErrorDetail, RunStats, SuiteArena, SuiteId, TestId, TestRecord, TestState};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Accumulates every suite and test seen during one run.
///
/// Both lists are append-only. The suite arena also records the containment
/// observed live; [`EventCollector::reconstruct`] throws that away and
/// rebuilds the tree from completed tests only.
#[derive(Debug)]
pub struct EventCollector {
    arena: SuiteArena,
    suites: Vec<SuiteId>,
    tests: Vec<TestRecord>,
    stats: RunStats,
    depth: usize,
    /// Suites created from a test's parent key before their `suite_begin`
    placeholders: HashSet<SuiteId>,
}

impl EventCollector {
    pub fn new(root_title: impl Into<String>) -> Self {
        Self {
            arena: SuiteArena::new(root_title),
            suites: Vec::new(),
            tests: Vec::new(),
            stats: RunStats::default(),
            depth: 0,
            placeholders: HashSet::new(),
        }
    }

    pub fn begin_run(&mut self, at: DateTime<Utc>) {
        self.stats.start = Some(at);
    }

    pub fn end_run(&mut self, at: DateTime<Utc>) {
        self.stats.end = Some(at);
    }

    /// Record a suite and link it under its parent.
    ///
    /// A placeholder created earlier for the same id adopts the declared
    /// parent.
    pub fn begin_suite(&mut self, suite: &SuiteEvent) -> SuiteId {
        let declared = self.resolve_parent(suite.parent.as_deref());
        let id = self.arena.insert(&suite.id, &suite.title, declared);
        if self.placeholders.remove(&id) {
            self.adopt(id, declared);
        }

        let parent = self.arena.get(id).parent.unwrap_or(SuiteId::ROOT);
        let siblings = self
            .arena
            .get_mut(parent)
            .suites
            .get_or_insert_with(Vec::new);
        if !siblings.contains(&id) {
            siblings.push(id);
        }

        self.suites.push(id);
        self.depth += 1;
        id
    }

    /// Close the innermost suite and return the remaining depth
    pub fn end_suite(&mut self) -> usize {
        self.depth = self.depth.saturating_sub(1);
        self.depth
    }

    /// Record a finished test of any state
    pub fn observe_test(
        &mut self,
        test: &TestEvent,
        state: TestState,
        error: Option<ErrorDetail>,
    ) -> TestId {
        let parent = test
            .parent
            .as_deref()
            .map(|key| self.resolve_parent(Some(key)));

        let full_title = test
            .full_title
            .clone()
            .unwrap_or_else(|| self.full_title(parent, &test.title));

        let id = TestId(self.tests.len());
        self.tests.push(TestRecord {
            title: test.title.clone(),
            full_title,
            state,
            duration_ms: test.duration.unwrap_or(f64::NAN),
            error,
            parent,
        });

        let container = parent.unwrap_or(SuiteId::ROOT);
        self.arena
            .get_mut(container)
            .tests
            .get_or_insert_with(Vec::new)
            .push(id);

        self.stats.record(state);
        id
    }

    /// Rebuild the suite tree from the completed tests
    pub fn reconstruct(&mut self) {
        hierarchy::reconstruct(&mut self.arena, &self.tests);
    }

    pub fn arena(&self) -> &SuiteArena {
        &self.arena
    }

    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    pub fn suites(&self) -> &[SuiteId] {
        &self.suites
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestRecord> {
        self.tests.iter().filter(|t| t.is_failed())
    }

    /// Parent key to arena id; unknown keys become top-level placeholders
    fn resolve_parent(&mut self, key: Option<&str>) -> SuiteId {
        let Some(key) = key else {
            return SuiteId::ROOT;
        };

        match self.arena.lookup(key) {
            Some(id) => id,
            None => {
                warn!("Unknown suite '{}' referenced before suite_begin", key);
                let id = self.arena.insert(key, key, SuiteId::ROOT);
                self.placeholders.insert(id);
                id
            }
        }
    }

    /// Move a placeholder under the parent its `suite_begin` declared
    fn adopt(&mut self, id: SuiteId, parent: SuiteId) {
        let previous = self.arena.get(id).parent;
        if previous == Some(parent) {
            return;
        }

        if !self.arena.reparent(id, parent) {
            warn!(
                "Suite '{}' cannot move under one of its own descendants",
                self.arena.get(id).title
            );
            return;
        }

        if let Some(previous) = previous
            && let Some(siblings) = self.arena.get_mut(previous).suites.as_mut()
        {
            siblings.retain(|child| *child != id);
        }
        debug!("Placeholder suite '{}' adopted its declared parent", self.arena.get(id).title);
    }

    fn full_title(&self, parent: Option<SuiteId>, title: &str) -> String {
        let mut parts: Vec<&str> = parent
            .map(|id| self.arena.title_path(id))
            .unwrap_or_default();
        parts.push(title);
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
