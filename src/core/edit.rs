use serde::Serialize;

use crate::error::{LayoutError, Side};

/// A single structural row operation
///
/// Index conventions follow batch row updates on list controls: deletions and
/// move sources address the old sequence, insertions, move targets and
/// replacements address the new sequence.
///
/// A row that both moved and changed appears as a `Move` immediately
/// followed by a `Replace` at the move target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Edit {
    Insert { index: usize },
    Delete { index: usize },
    Move { from: usize, to: usize },
    Replace { index: usize },
}

/// Ordered set of edits transforming one rendered list state into another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditScript {
    edits: Vec<Edit>,
}

/// Where a row of the updated list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// An existing row, kept or moved, by old index
    Old(usize),
    /// A row rendered fresh from the new sequence, by new index
    New(usize),
}

/// Outcome of reconciling two sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Both sides were non-empty; apply the script incrementally
    Incremental(EditScript),
    /// One side was empty; re-render the whole list instead
    Reload,
}

impl Reconciliation {
    /// Whether an incremental diff was produced
    pub fn should_diff(&self) -> bool {
        matches!(self, Reconciliation::Incremental(_))
    }

    /// The edit script, if any
    pub fn script(&self) -> Option<&EditScript> {
        match self {
            Reconciliation::Incremental(script) => Some(script),
            Reconciliation::Reload => None,
        }
    }
}

impl EditScript {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    pub fn insertions(&self) -> usize {
        self.count(|e| matches!(e, Edit::Insert { .. }))
    }

    pub fn deletions(&self) -> usize {
        self.count(|e| matches!(e, Edit::Delete { .. }))
    }

    pub fn moves(&self) -> usize {
        self.count(|e| matches!(e, Edit::Move { .. }))
    }

    pub fn replacements(&self) -> usize {
        self.count(|e| matches!(e, Edit::Replace { .. }))
    }

    fn count(&self, pred: impl Fn(&Edit) -> bool) -> usize {
        self.edits.iter().filter(|e| pred(e)).count()
    }

    /// Lay the script out over lists of `old_len` and `new_len` rows.
    ///
    /// Inserted rows and move targets are placed first. The remaining slots
    /// are filled, in order, with old rows that were neither deleted nor moved.
    /// Replaced slots are then re-sourced from the new sequence.
    pub fn layout(&self, old_len: usize, new_len: usize) -> Result<Vec<RowOrigin>, LayoutError> {
        let mut consumed = vec![false; old_len];
        let mut slots: Vec<Option<RowOrigin>> = vec![None; new_len];

        let check_old = |index: usize| {
            if index < old_len {
                Ok(())
            } else {
                Err(LayoutError::IndexOutOfBounds {
                    side: Side::Old,
                    index,
                    len: old_len,
                })
            }
        };
        let check_new = |index: usize| {
            if index < new_len {
                Ok(())
            } else {
                Err(LayoutError::IndexOutOfBounds {
                    side: Side::New,
                    index,
                    len: new_len,
                })
            }
        };

        let mut deleted = 0usize;
        let mut inserted = 0usize;

        for edit in &self.edits {
            match *edit {
                Edit::Delete { index } => {
                    check_old(index)?;
                    if std::mem::replace(&mut consumed[index], true) {
                        return Err(LayoutError::SourceReused { index });
                    }
                    deleted += 1;
                }
                Edit::Insert { index } => {
                    check_new(index)?;
                    if slots[index].replace(RowOrigin::New(index)).is_some() {
                        return Err(LayoutError::TargetConflict { index });
                    }
                    inserted += 1;
                }
                Edit::Move { from, to } => {
                    check_old(from)?;
                    check_new(to)?;
                    if std::mem::replace(&mut consumed[from], true) {
                        return Err(LayoutError::SourceReused { index: from });
                    }
                    if slots[to].replace(RowOrigin::Old(from)).is_some() {
                        return Err(LayoutError::TargetConflict { index: to });
                    }
                }
                Edit::Replace { index } => check_new(index)?,
            }
        }

        let expected = old_len - deleted + inserted;
        if expected != new_len {
            return Err(LayoutError::CountMismatch {
                expected,
                actual: new_len,
            });
        }

        // Counts match and every target is unique, so the free slots and the
        // untouched old rows pair up exactly.
        let mut untouched = (0..old_len).filter(|&i| !consumed[i]);
        let mut rows = Vec::with_capacity(new_len);
        for slot in slots {
            let origin = match slot {
                Some(origin) => origin,
                None => match untouched.next() {
                    Some(i) => RowOrigin::Old(i),
                    // Unreachable after the count check above.
                    None => {
                        return Err(LayoutError::CountMismatch {
                            expected,
                            actual: new_len,
                        })
                    }
                },
            };
            rows.push(origin);
        }

        for edit in &self.edits {
            if let Edit::Replace { index } = *edit {
                rows[index] = RowOrigin::New(index);
            }
        }

        Ok(rows)
    }

    /// Replay the script over `old`, taking fresh rows from `new`.
    ///
    /// For a script produced by reconciling `old` against `new`, the result
    /// has the same identity keys in the same order as `new`.
    pub fn replay<'a, T>(&self, old: &'a [T], new: &'a [T]) -> Result<Vec<&'a T>, LayoutError> {
        let rows = self
            .layout(old.len(), new.len())?
            .into_iter()
            .map(|origin| match origin {
                RowOrigin::Old(i) => &old[i],
                RowOrigin::New(j) => &new[j],
            })
            .collect();
        Ok(rows)
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let script = EditScript::new(vec![
            Edit::Delete { index: 0 },
            Edit::Insert { index: 1 },
            Edit::Move { from: 2, to: 0 },
            Edit::Replace { index: 2 },
            Edit::Insert { index: 3 },
        ]);

        assert_eq!(script.len(), 5);
        assert_eq!(script.insertions(), 2);
        assert_eq!(script.deletions(), 1);
        assert_eq!(script.moves(), 1);
        assert_eq!(script.replacements(), 1);
    }

    #[test]
    fn test_layout_fills_untouched_rows_in_order() {
        // old: a b c d  ->  new: c a X b   (d deleted, X inserted, c moved)
        let script = EditScript::new(vec![
            Edit::Delete { index: 3 },
            Edit::Move { from: 2, to: 0 },
            Edit::Insert { index: 2 },
        ]);

        let rows = script.layout(4, 4).unwrap();
        assert_eq!(
            rows,
            vec![
                RowOrigin::Old(2),
                RowOrigin::Old(0),
                RowOrigin::New(2),
                RowOrigin::Old(1),
            ]
        );
    }

    #[test]
    fn test_replay_with_replacement() {
        let old = ["a", "b"];
        let new = ["a", "B"];
        let script = EditScript::new(vec![Edit::Replace { index: 1 }]);

        let rows = script.replay(&old, &new).unwrap();
        assert_eq!(rows, vec![&"a", &"B"]);
    }

    #[test]
    fn test_layout_rejects_wrong_count() {
        let script = EditScript::new(vec![Edit::Insert { index: 0 }]);
        assert_eq!(
            script.layout(2, 2),
            Err(LayoutError::CountMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_layout_rejects_out_of_bounds() {
        let script = EditScript::new(vec![Edit::Delete { index: 5 }]);
        assert_eq!(
            script.layout(2, 1),
            Err(LayoutError::IndexOutOfBounds {
                side: Side::Old,
                index: 5,
                len: 2
            })
        );
    }

    #[test]
    fn test_layout_rejects_conflicting_targets() {
        let script = EditScript::new(vec![
            Edit::Delete { index: 0 },
            Edit::Insert { index: 0 },
            Edit::Move { from: 1, to: 0 },
        ]);
        assert_eq!(
            script.layout(2, 2),
            Err(LayoutError::TargetConflict { index: 0 })
        );
    }

    #[test]
    fn test_layout_rejects_reused_source() {
        let script = EditScript::new(vec![
            Edit::Delete { index: 1 },
            Edit::Move { from: 1, to: 0 },
        ]);
        assert_eq!(
            script.layout(2, 1),
            Err(LayoutError::SourceReused { index: 1 })
        );
    }

    #[test]
    fn test_reconciliation_accessors() {
        let incremental = Reconciliation::Incremental(EditScript::default());
        assert!(incremental.should_diff());
        assert!(incremental.script().unwrap().is_empty());

        assert!(!Reconciliation::Reload.should_diff());
        assert!(Reconciliation::Reload.script().is_none());
    }

    #[test]
    fn test_edit_json_shape() {
        let json = serde_json::to_value(Edit::Move { from: 1, to: 0 }).unwrap();
        assert_eq!(json, serde_json::json!({"op": "move", "from": 1, "to": 0}));
    }
}
