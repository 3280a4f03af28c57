use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::item::Diffable;
use crate::error::{ReconcileError, Side};

/// How to treat identity keys that occur more than once within one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with `ReconcileError::InvalidInput`
    #[default]
    Reject,
    /// Match the first occurrence; later occurrences are unmatched rows
    FirstMatch,
}

/// Pairing of old and new positions by identity key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    /// For each old index, the new index holding the same key
    pub old_to_new: Vec<Option<usize>>,
    /// For each new index, the old index holding the same key
    pub new_to_old: Vec<Option<usize>>,
    /// Number of rows left unmatched because their key was a repeat
    pub duplicates: usize,
}

impl Matching {
    /// Matched `(old, new)` pairs in new-sequence order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.new_to_old
            .iter()
            .enumerate()
            .filter_map(|(j, old)| old.map(|i| (i, j)))
    }
}

/// Match rows of `old` and `new` by identity key.
///
/// Lookups go through hash maps, but every output is produced by walking the
/// slices in index order, so the result never depends on hash iteration.
pub fn match_keys<T: Diffable>(
    old: &[T],
    new: &[T],
    policy: DuplicatePolicy,
) -> Result<Matching, ReconcileError> {
    let mut duplicates = 0usize;
    let old_first = first_positions(old, Side::Old, policy, &mut duplicates)?;
    let new_first = first_positions(new, Side::New, policy, &mut duplicates)?;

    let mut old_to_new = vec![None; old.len()];
    let mut new_to_old = vec![None; new.len()];

    for (j, item) in new.iter().enumerate() {
        let key = item.diff_key();
        if new_first.get(&key) != Some(&j) {
            continue;
        }
        if let Some(&i) = old_first.get(&key) {
            old_to_new[i] = Some(j);
            new_to_old[j] = Some(i);
        }
    }

    Ok(Matching {
        old_to_new,
        new_to_old,
        duplicates,
    })
}

fn first_positions<T: Diffable>(
    items: &[T],
    side: Side,
    policy: DuplicatePolicy,
    duplicates: &mut usize,
) -> Result<HashMap<T::Key, usize>, ReconcileError> {
    let mut positions = HashMap::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match positions.entry(item.diff_key()) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            Entry::Occupied(slot) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(ReconcileError::InvalidInput {
                        side,
                        index,
                        first_index: *slot.get(),
                        key: format!("{:?}", slot.key()),
                    });
                }
                DuplicatePolicy::FirstMatch => *duplicates += 1,
            },
        }
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row(u32);

    impl Diffable for Row {
        type Key = u32;

        fn diff_key(&self) -> u32 {
            self.0
        }

        fn content_eq(&self, _other: &Self) -> bool {
            true
        }
    }

    fn rows(ids: &[u32]) -> Vec<Row> {
        ids.iter().copied().map(Row).collect()
    }

    #[test]
    fn test_match_by_key() {
        let m = match_keys(&rows(&[1, 2, 3]), &rows(&[3, 4, 1]), DuplicatePolicy::Reject).unwrap();

        assert_eq!(m.old_to_new, vec![Some(2), None, Some(0)]);
        assert_eq!(m.new_to_old, vec![Some(2), None, Some(0)]);
        assert_eq!(m.pairs().collect::<Vec<_>>(), vec![(2, 0), (0, 2)]);
        assert_eq!(m.duplicates, 0);
    }

    #[test]
    fn test_reject_duplicates() {
        let err = match_keys(&rows(&[1, 2, 1]), &rows(&[1]), DuplicatePolicy::Reject).unwrap_err();

        assert_eq!(
            err,
            ReconcileError::InvalidInput {
                side: Side::Old,
                index: 2,
                first_index: 0,
                key: "1".to_string(),
            }
        );
    }

    #[test]
    fn test_reject_duplicates_in_new() {
        let err = match_keys(&rows(&[1, 2]), &rows(&[2, 1, 3, 2]), DuplicatePolicy::Reject).unwrap_err();

        assert_eq!(
            err,
            ReconcileError::InvalidInput {
                side: Side::New,
                index: 3,
                first_index: 0,
                key: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_first_match_duplicates() {
        let m = match_keys(&rows(&[1, 2, 1]), &rows(&[1, 1]), DuplicatePolicy::FirstMatch).unwrap();

        assert_eq!(m.old_to_new, vec![Some(0), None, None]);
        assert_eq!(m.new_to_old, vec![Some(0), None]);
        assert_eq!(m.duplicates, 2);
    }
}
