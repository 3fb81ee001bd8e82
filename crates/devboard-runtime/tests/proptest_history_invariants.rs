//! Property-based invariant tests for the snapshot history.
//!
//! 1. The undo side never exceeds `max_depth`.
//! 2. The history behaves like a linear timeline: any mix of edits, undos and
//!    redos matches a reference model built on two deques.
//! 3. Undo followed by redo returns to the same current state.

use std::collections::VecDeque;

use devboard_runtime::undo::{HistoryConfig, SnapshotHistory};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Edit,
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![3 => Just(Op::Edit), 2 => Just(Op::Undo), 1 => Just(Op::Redo)]
}

/// Straight transcription of the history rules on deques.
struct Model {
    past: VecDeque<u32>,
    future: VecDeque<u32>,
    max: usize,
}

impl Model {
    fn push(&mut self, s: u32) {
        self.past.push_back(s);
        if self.past.len() > self.max {
            self.past.pop_front();
        }
        self.future.clear();
    }

    fn undo(&mut self, current: u32) -> Option<u32> {
        let prev = self.past.pop_back()?;
        self.future.push_front(current);
        Some(prev)
    }

    fn redo(&mut self, current: u32) -> Option<u32> {
        let next = self.future.pop_front()?;
        self.past.push_back(current);
        if self.past.len() > self.max {
            self.past.pop_front();
        }
        Some(next)
    }
}

proptest! {
    #[test]
    fn history_matches_linear_model(
        max in 1usize..8,
        ops in prop::collection::vec(op_strategy(), 0..120),
    ) {
        let mut history = SnapshotHistory::new(HistoryConfig::default().with_max_depth(max));
        let mut model = Model { past: VecDeque::new(), future: VecDeque::new(), max };
        let mut current = 0u32;
        let mut model_current = 0u32;
        let mut next_state = 1u32;

        for op in ops {
            match op {
                Op::Edit => {
                    history.push(current);
                    model.push(model_current);
                    current = next_state;
                    model_current = next_state;
                    next_state += 1;
                }
                Op::Undo => {
                    let got = history.undo(current);
                    let want = model.undo(model_current);
                    prop_assert_eq!(got, want);
                    if let Some(s) = got {
                        current = s;
                        model_current = s;
                    }
                }
                Op::Redo => {
                    let got = history.redo(current);
                    let want = model.redo(model_current);
                    prop_assert_eq!(got, want);
                    if let Some(s) = got {
                        current = s;
                        model_current = s;
                    }
                }
            }
            prop_assert!(history.undo_depth() <= max);
            prop_assert_eq!(history.undo_depth(), model.past.len());
            prop_assert_eq!(history.redo_depth(), model.future.len());
        }
    }
}

proptest! {
    #[test]
    fn undo_then_redo_is_identity(edits in 1usize..70) {
        let mut history = SnapshotHistory::default();
        for i in 0..edits {
            history.push(i);
        }
        let current = edits;
        let Some(prev) = history.undo(current) else {
            return Err(TestCaseError::fail("nothing to undo"));
        };
        prop_assert_eq!(history.redo(prev), Some(current));
        prop_assert!(!history.can_redo());
    }
}
