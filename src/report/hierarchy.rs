// Suite tree reconstruction
//
// The live run may leave suites without child containers (suites that ran
// in isolated workers are never linked into the root). Before writing the
// report the tree is rebuilt from the flat test list alone, so only suites
// with at least one completed test appear in it.

use crate::state::{SuiteArena, SuiteId, TestId, TestRecord};
use std::collections::HashSet;
use tracing::debug;

/// Rebuild the suite tree under the root from `tests`.
///
/// Every suite on a test's parent chain receives the test, its duration and
/// its failure. Aggregates are per level: a suite's totals never include
/// its child suites' totals, only the tests that walked through it.
///
/// The root keeps the whole flat list as its own tests, in addition to the
/// tests nested under its suites.
pub fn reconstruct(arena: &mut SuiteArena, tests: &[TestRecord]) {
    for node in arena.iter_mut() {
        node.reset();
    }

    let root = arena.root_mut();
    root.suites = Some(Vec::new());
    root.tests = Some((0..tests.len()).map(TestId).collect());

    let mut linked: HashSet<(SuiteId, SuiteId)> = HashSet::new();

    for (index, test) in tests.iter().enumerate() {
        let test_id = TestId(index);
        let mut cursor = test.parent;

        while let Some(parent_id) = cursor.filter(|id| !id.is_root()) {
            let parent = arena.get_mut(parent_id);
            parent.tests.get_or_insert_with(Vec::new).push(test_id);
            parent.duration_ms += test.duration_ms;
            if test.is_failed() {
                parent.failures += 1;
            }

            let grandparent = parent.parent;
            if let Some(grandparent_id) = grandparent
                && linked.insert((grandparent_id, parent_id))
            {
                arena
                    .get_mut(grandparent_id)
                    .suites
                    .get_or_insert_with(Vec::new)
                    .push(parent_id);
            }

            cursor = grandparent;
        }
    }

    debug!(
        "Reconstructed {} suite link(s) from {} test(s)",
        linked.len(),
        tests.len()
    );
}
