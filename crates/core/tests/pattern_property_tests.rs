use cache_conflict_core::{LatencyProber, WorkBuffer, traits::CycleCounter};
use common::types::{Alignment, TraversalMode, WARMUP_TRAVERSALS};
use proptest::prelude::*;
use proptest::strategy::Strategy;

const ACCESSES_STRATEGY: std::ops::Range<usize> = 0usize..24;

fn alignment_strategy() -> impl Strategy<Value = Alignment> {
    prop_oneof![Just(Alignment::Aligned), Just(Alignment::LineOffset)]
}

fn mode_strategy() -> impl Strategy<Value = TraversalMode> {
    prop_oneof![
        Just(TraversalMode::Strided),
        Just(TraversalMode::PointerChase)
    ]
}

/// Counter that never advances; only the checksum matters here.
struct StoppedCounter;

impl CycleCounter for StoppedCounter {
    fn now(&mut self) -> u64 {
        0
    }
}

fn visited(alignment: Alignment, accesses: usize, mode: TraversalMode) -> Vec<usize> {
    let mut buffer = WorkBuffer::for_max_accesses(accesses);
    buffer.prepare(alignment, accesses, mode).unwrap();
    buffer.traversal(alignment, accesses, mode).collect()
}

proptest! {
    /// Property: building the same pattern twice visits the same offsets
    #[test]
    fn pattern_is_deterministic(
        alignment in alignment_strategy(),
        accesses in ACCESSES_STRATEGY,
        mode in mode_strategy(),
    ) {
        prop_assert_eq!(visited(alignment, accesses, mode), visited(alignment, accesses, mode));
    }

    /// Property: every traversal visits exactly `accesses` offsets, one stride apart
    #[test]
    fn offsets_are_one_stride_apart(
        alignment in alignment_strategy(),
        accesses in ACCESSES_STRATEGY,
        mode in mode_strategy(),
    ) {
        let offsets = visited(alignment, accesses, mode);
        prop_assert_eq!(offsets.len(), accesses);

        let expected: Vec<usize> = (0..accesses).map(|i| i * alignment.stride_words()).collect();
        prop_assert_eq!(offsets, expected);
    }

    /// Property: every visited offset lies inside the buffer sized for the traversal
    #[test]
    fn offsets_stay_in_bounds(
        alignment in alignment_strategy(),
        accesses in ACCESSES_STRATEGY,
        mode in mode_strategy(),
    ) {
        let capacity = WorkBuffer::required_words(accesses);
        for offset in visited(alignment, accesses, mode) {
            prop_assert!(offset < capacity);
        }
    }

    /// Property: with page-aligned pointer chasing the hop after the last access
    /// reaches the wrap slot, which points back to offset 0
    #[test]
    fn aligned_chain_wraps_home(accesses in 1usize..24) {
        let mut buffer = WorkBuffer::for_max_accesses(accesses);
        buffer.prepare(Alignment::Aligned, accesses, TraversalMode::PointerChase).unwrap();

        let last = buffer
            .traversal(Alignment::Aligned, accesses, TraversalMode::PointerChase)
            .last()
            .unwrap();
        let next = buffer.words()[last] as usize;

        prop_assert_eq!(next, WorkBuffer::wrap_slot(accesses));
        prop_assert_eq!(buffer.words()[next], 0);
    }

    /// Property: the timed loop reads exactly the words the offset iterator visits,
    /// once per warmup and once per timed run
    #[test]
    fn checksum_matches_visited_words(
        alignment in alignment_strategy(),
        accesses in ACCESSES_STRATEGY,
        mode in mode_strategy(),
        runs in 0usize..4,
    ) {
        let mut prober = LatencyProber::with_capacity(accesses, StoppedCounter);
        let measurement = prober.access_mem(alignment, accesses, runs, mode).unwrap();

        let buffer = prober.buffer();
        let per_traversal = buffer
            .traversal(alignment, accesses, mode)
            .fold(0u64, |sum, offset| sum.wrapping_add(buffer.words()[offset]));
        let traversals = (WARMUP_TRAVERSALS + runs) as u64;

        prop_assert_eq!(measurement.checksum, per_traversal.wrapping_mul(traversals));
    }
}
