use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};
use tracing::{debug, warn};

use crate::core::edit::{Edit, EditScript, Reconciliation};
use crate::core::item::Diffable;
use crate::core::matching::{match_keys, DuplicatePolicy, Matching};
use crate::error::ReconcileError;

/// Strategy used to decide which matched rows count as moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DiffAlgorithm {
    /// Heckel-style pass: a row is moved when its old position, shifted by
    /// the deletions before it and the insertions before its new position,
    /// does not land on its new position
    #[default]
    Heckel,
    /// Myers diff over the key sequences: rows on the longest common
    /// subsequence stay put, every other matched row is moved
    Myers,
}

impl std::fmt::Display for DiffAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffAlgorithm::Heckel => f.write_str("heckel"),
            DiffAlgorithm::Myers => f.write_str("myers"),
        }
    }
}

/// Computes edit scripts between two sequences of [`Diffable`] items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciler {
    algorithm: DiffAlgorithm,
    duplicates: DuplicatePolicy,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn algorithm(&self) -> DiffAlgorithm {
        self.algorithm
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Reconcile `old` against `new`.
    ///
    /// Returns [`Reconciliation::Reload`] when either side is empty. Otherwise
    /// the script lists deletions by ascending old index, followed by
    /// insertions, moves and replacements in new-index order. A row that both
    /// moved and changed yields a move followed by a replacement.
    pub fn reconcile<T: Diffable>(
        &self,
        old: &[T],
        new: &[T],
    ) -> Result<Reconciliation, ReconcileError> {
        if old.is_empty() || new.is_empty() {
            debug!(
                old_len = old.len(),
                new_len = new.len(),
                "empty side, falling back to full reload"
            );
            return Ok(Reconciliation::Reload);
        }

        let matching = match_keys(old, new, self.duplicates)?;
        if matching.duplicates > 0 {
            warn!(
                duplicates = matching.duplicates,
                "duplicate keys matched by first occurrence"
            );
        }

        let moved = match self.algorithm {
            DiffAlgorithm::Heckel => heckel_moves(&matching),
            DiffAlgorithm::Myers => myers_moves(&matching),
        };

        let mut edits = Vec::new();

        for (i, target) in matching.old_to_new.iter().enumerate() {
            if target.is_none() {
                edits.push(Edit::Delete { index: i });
            }
        }

        for (j, source) in matching.new_to_old.iter().enumerate() {
            match *source {
                None => edits.push(Edit::Insert { index: j }),
                Some(i) => {
                    if moved[j] {
                        edits.push(Edit::Move { from: i, to: j });
                    }
                    if !old[i].content_eq(&new[j]) {
                        edits.push(Edit::Replace { index: j });
                    }
                }
            }
        }

        let script = EditScript::new(edits);
        debug!(
            algorithm = %self.algorithm,
            old_len = old.len(),
            new_len = new.len(),
            inserted = script.insertions(),
            deleted = script.deletions(),
            moved = script.moves(),
            replaced = script.replacements(),
            "reconciled"
        );

        Ok(Reconciliation::Incremental(script))
    }
}

/// Reconcile with the default algorithm, rejecting duplicate keys.
pub fn reconcile<T: Diffable>(old: &[T], new: &[T]) -> Result<Reconciliation, ReconcileError> {
    Reconciler::default().reconcile(old, new)
}

/// Per new index, whether the matched row counts as moved.
fn heckel_moves(matching: &Matching) -> Vec<bool> {
    // Deletions strictly before each old index
    let mut deletes_before = Vec::with_capacity(matching.old_to_new.len());
    let mut deleted = 0usize;
    for target in &matching.old_to_new {
        deletes_before.push(deleted);
        if target.is_none() {
            deleted += 1;
        }
    }

    let mut moved = vec![false; matching.new_to_old.len()];
    let mut inserted = 0usize;
    for (j, source) in matching.new_to_old.iter().enumerate() {
        match *source {
            None => inserted += 1,
            Some(i) => moved[j] = i - deletes_before[i] + inserted != j,
        }
    }
    moved
}

/// Per new index, whether the matched row falls outside the common subsequence.
fn myers_moves(matching: &Matching) -> Vec<bool> {
    let new_len = matching.new_to_old.len();
    let old_len = matching.old_to_new.len();

    // Matched rows share their new index as token; unmatched rows get tokens
    // no other row can carry, so only matched pairs can line up.
    let old_tokens: Vec<usize> = matching
        .old_to_new
        .iter()
        .enumerate()
        .map(|(i, target)| target.unwrap_or(new_len + i))
        .collect();
    let new_tokens: Vec<usize> = matching
        .new_to_old
        .iter()
        .enumerate()
        .map(|(j, source)| match source {
            Some(_) => j,
            None => new_len + old_len + j,
        })
        .collect();

    let mut moved: Vec<bool> = matching.new_to_old.iter().map(Option::is_some).collect();
    for op in capture_diff_slices(Algorithm::Myers, &old_tokens, &new_tokens) {
        let (tag, _old_range, new_range) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            for j in new_range {
                moved[j] = false;
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        id: u32,
        v: &'static str,
    }

    impl Diffable for Item {
        type Key = u32;

        fn diff_key(&self) -> u32 {
            self.id
        }

        fn content_eq(&self, other: &Self) -> bool {
            self.v == other.v
        }
    }

    fn item(id: u32, v: &'static str) -> Item {
        Item { id, v }
    }

    fn script(r: Reconciliation) -> Vec<Edit> {
        match r {
            Reconciliation::Incremental(s) => s.edits().to_vec(),
            Reconciliation::Reload => panic!("expected an incremental diff"),
        }
    }

    #[test]
    fn test_swap_and_append() {
        let old = vec![item(1, "a"), item(2, "b")];
        let new = vec![item(2, "b"), item(1, "a"), item(3, "c")];

        let edits = script(reconcile(&old, &new).unwrap());

        assert_eq!(
            edits,
            vec![
                Edit::Move { from: 1, to: 0 },
                Edit::Move { from: 0, to: 1 },
                Edit::Insert { index: 2 },
            ]
        );
    }

    #[test]
    fn test_empty_old_falls_back() {
        let new = vec![item(1, "a")];
        assert_eq!(reconcile(&[], &new).unwrap(), Reconciliation::Reload);
    }

    #[test]
    fn test_empty_new_falls_back() {
        let old = vec![item(1, "a")];
        assert_eq!(reconcile(&old, &[]).unwrap(), Reconciliation::Reload);
    }

    #[test]
    fn test_both_empty_falls_back() {
        let empty: Vec<Item> = Vec::new();
        assert_eq!(reconcile(&empty, &empty).unwrap(), Reconciliation::Reload);
    }

    #[test]
    fn test_identical_is_empty() {
        let items = vec![item(1, "a"), item(2, "b"), item(3, "c")];
        let edits = script(reconcile(&items, &items).unwrap());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_content_change_is_replacement() {
        let old = vec![item(1, "a"), item(2, "b")];
        let new = vec![item(1, "a"), item(2, "B")];

        let edits = script(reconcile(&old, &new).unwrap());
        assert_eq!(edits, vec![Edit::Replace { index: 1 }]);
    }

    #[test]
    fn test_moved_and_changed() {
        let old = vec![item(1, "a"), item(2, "b")];
        let new = vec![item(2, "B"), item(1, "a")];

        let edits = script(reconcile(&old, &new).unwrap());
        assert_eq!(
            edits,
            vec![
                Edit::Move { from: 1, to: 0 },
                Edit::Replace { index: 0 },
                Edit::Move { from: 0, to: 1 },
            ]
        );
    }

    #[test]
    fn test_front_insert_does_not_move() {
        let old = vec![item(1, "a"), item(2, "b")];
        let new = vec![item(0, "z"), item(1, "a"), item(2, "b")];

        let edits = script(reconcile(&old, &new).unwrap());
        assert_eq!(edits, vec![Edit::Insert { index: 0 }]);
    }

    #[test]
    fn test_delete_does_not_move() {
        let old = vec![item(1, "a"), item(2, "b"), item(3, "c")];
        let new = vec![item(1, "a"), item(3, "c")];

        let edits = script(reconcile(&old, &new).unwrap());
        assert_eq!(edits, vec![Edit::Delete { index: 1 }]);
    }

    #[test]
    fn test_myers_moves_only_displaced_row() {
        let old = vec![item(1, "a"), item(2, "b"), item(3, "c"), item(4, "d")];
        let new = vec![item(4, "d"), item(1, "a"), item(2, "b"), item(3, "c")];

        let heckel = script(reconcile(&old, &new).unwrap());
        assert_eq!(heckel.len(), 4);

        let myers = script(
            Reconciler::new()
                .with_algorithm(DiffAlgorithm::Myers)
                .reconcile(&old, &new)
                .unwrap(),
        );
        assert_eq!(myers, vec![Edit::Move { from: 3, to: 0 }]);
    }

    #[test]
    fn test_duplicates_rejected_by_default() {
        let old = vec![item(1, "a"), item(1, "b")];
        let new = vec![item(1, "a")];

        let err = reconcile(&old, &new).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidInput { index: 1, .. }));
    }

    #[test]
    fn test_duplicates_first_match() {
        let old = vec![item(1, "a"), item(1, "b")];
        let new = vec![item(1, "a")];

        let edits = script(
            Reconciler::new()
                .with_duplicate_policy(DuplicatePolicy::FirstMatch)
                .reconcile(&old, &new)
                .unwrap(),
        );
        assert_eq!(edits, vec![Edit::Delete { index: 1 }]);
    }

    #[test]
    fn test_deterministic() {
        let old: Vec<Item> = (0..50).map(|i| item(i, "x")).collect();
        let new: Vec<Item> = (0..50).rev().step_by(2).map(|i| item(i, "y")).collect();

        let first = reconcile(&old, &new).unwrap();
        for _ in 0..10 {
            assert_eq!(reconcile(&old, &new).unwrap(), first);
        }
    }

    #[test]
    fn test_replay_matches_new_order() {
        let old = vec![item(1, "a"), item(2, "b"), item(3, "c"), item(4, "d")];
        let new = vec![item(5, "e"), item(3, "C"), item(1, "a"), item(6, "f")];

        for algorithm in [DiffAlgorithm::Heckel, DiffAlgorithm::Myers] {
            let r = Reconciler::new().with_algorithm(algorithm).reconcile(&old, &new).unwrap();
            let rows = r.script().unwrap().replay(&old, &new).unwrap();
            let ids: Vec<u32> = rows.iter().map(|r| r.id).collect();
            assert_eq!(ids, vec![5, 3, 1, 6], "algorithm {algorithm}");
            assert_eq!(rows[1].v, "C");
        }
    }
}
