//! Shuffle sequencing
//!
//! A round's shuffle is `count` independent random transpositions, not a
//! uniform permutation: the same pair may come up twice and cancel out. The
//! visual difficulty curve is tuned against exactly this distribution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::permutation::PermutationTracker;
use super::state::ContainerId;

/// Exchange of two distinct slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOp {
    pub slot_a: usize,
    pub slot_b: usize,
}

/// A swap as it was applied: the slots and the jars that were in them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedSwap {
    pub op: SwapOp,
    pub container_a: ContainerId,
    pub container_b: ContainerId,
}

/// Generate `count` swaps over `n` slots.
///
/// `slot_a` is uniform over `0..n`; `slot_b` is redrawn until it differs.
/// With fewer than two slots there is nothing to swap and the list is empty.
pub fn generate<R: Rng>(n: usize, count: u32, rng: &mut R) -> Vec<SwapOp> {
    if n < 2 {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let slot_a = rng.random_range(0..n);
            let mut slot_b = rng.random_range(0..n);
            while slot_b == slot_a {
                slot_b = rng.random_range(0..n);
            }
            SwapOp { slot_a, slot_b }
        })
        .collect()
}

/// Cursor over a generated swap list, applied strictly one at a time
#[derive(Debug, Clone, Default)]
pub struct SwapRun {
    ops: Vec<SwapOp>,
    cursor: usize,
}

impl SwapRun {
    pub fn new(ops: Vec<SwapOp>) -> Self {
        Self { ops, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Swaps not yet applied
    pub fn remaining(&self) -> usize {
        self.ops.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.ops.len()
    }

    pub fn ops(&self) -> &[SwapOp] {
        &self.ops
    }

    /// Apply the next swap to the tracker and advance
    pub fn apply_next(&mut self, tracker: &mut PermutationTracker) -> Option<AppliedSwap> {
        let op = *self.ops.get(self.cursor)?;
        self.cursor += 1;
        let (container_a, container_b) = tracker.apply_swap(op.slot_a, op.slot_b)?;
        Some(AppliedSwap {
            op,
            container_a,
            container_b,
        })
    }
}

/// Apply every swap in order with no pacing in between.
///
/// `on_each` fires right after each swap updates the tracker, before the next
/// one begins; `on_done` fires once after the last (immediately for an empty
/// list).
pub fn run_sequentially(
    ops: Vec<SwapOp>,
    tracker: &mut PermutationTracker,
    mut on_each: impl FnMut(&AppliedSwap, &PermutationTracker),
    on_done: impl FnOnce(&PermutationTracker),
) {
    let mut run = SwapRun::new(ops);
    while !run.is_finished() {
        if let Some(applied) = run.apply_next(tracker) {
            on_each(&applied, tracker);
        }
    }
    on_done(tracker);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Bounds;
    use crate::sim::state::{Container, TokenId};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn tracker(n: usize) -> PermutationTracker {
        let containers = (0..n)
            .map(|i| Container {
                id: ContainerId(i),
                slot: i,
                bounds: Bounds::default(),
                active: true,
            })
            .collect();
        PermutationTracker::new(containers)
    }

    #[test]
    fn test_generate_count_and_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let ops = generate(3, 50, &mut rng);
        assert_eq!(ops.len(), 50);
        for op in &ops {
            assert!(op.slot_a < 3 && op.slot_b < 3);
            assert_ne!(op.slot_a, op.slot_b);
        }
    }

    #[test]
    fn test_generate_two_slots_always_swaps_both() {
        let mut rng = Pcg32::seed_from_u64(9);
        for op in generate(2, 20, &mut rng) {
            assert_eq!(op.slot_a + op.slot_b, 1);
        }
    }

    #[test]
    fn test_generate_degenerate() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(generate(3, 0, &mut rng).is_empty());
        assert!(generate(1, 10, &mut rng).is_empty());
        assert!(generate(0, 10, &mut rng).is_empty());
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a = generate(5, 30, &mut Pcg32::seed_from_u64(77));
        let b = generate(5, 30, &mut Pcg32::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_covers_every_pair() {
        let mut rng = Pcg32::seed_from_u64(3);
        let ops = generate(3, 300, &mut rng);
        for (a, b) in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)] {
            assert!(ops.iter().any(|op| op.slot_a == a && op.slot_b == b));
        }
    }

    #[test]
    fn test_run_sequentially_scenario() {
        let mut t = tracker(3);
        t.place_tokens(&[ContainerId(1)]);
        let ops = vec![
            SwapOp { slot_a: 0, slot_b: 2 },
            SwapOp { slot_a: 1, slot_b: 0 },
        ];

        let mut seen = Vec::new();
        let mut done = false;
        run_sequentially(
            ops,
            &mut t,
            |applied, tracker| {
                seen.push((applied.container_a, applied.container_b, tracker.token_slot(TokenId(0))))
            },
            |_| done = true,
        );

        assert!(done);
        assert_eq!(
            seen,
            vec![
                (ContainerId(0), ContainerId(2), Some(1)),
                (ContainerId(1), ContainerId(2), Some(0)),
            ]
        );
        assert_eq!(t.token_slot(TokenId(0)), Some(0));
        assert_eq!(t.container_at(0), Some(ContainerId(1)));
    }

    #[test]
    fn test_run_sequentially_empty_is_done_immediately() {
        let mut t = tracker(3);
        let mut applied = 0;
        let mut done = false;
        run_sequentially(Vec::new(), &mut t, |_, _| applied += 1, |_| done = true);
        assert_eq!(applied, 0);
        assert!(done);
        assert_eq!(t.container_at(0), Some(ContainerId(0)));
    }

    #[test]
    fn test_swap_run_cursor() {
        let mut t = tracker(3);
        let mut run = SwapRun::new(vec![SwapOp { slot_a: 0, slot_b: 1 }]);
        assert_eq!(run.remaining(), 1);
        assert!(run.apply_next(&mut t).is_some());
        assert!(run.is_finished());
        assert!(run.apply_next(&mut t).is_none());
    }
}
