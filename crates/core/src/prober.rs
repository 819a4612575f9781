use std::hint::black_box;

use tracing::debug;

use super::buffer::WorkBuffer;
use super::traits::CycleCounter;
use common::{
    error::Error,
    stats::MinTracker,
    types::{Alignment, Measurement, TraversalMode, WARMUP_TRAVERSALS},
};

/// Times traversals of page-strided access patterns over an owned work buffer.
pub struct LatencyProber<C: CycleCounter> {
    buffer: WorkBuffer,
    counter: C,
}

impl<C: CycleCounter> LatencyProber<C> {
    pub fn new(buffer: WorkBuffer, counter: C) -> Self {
        Self { buffer, counter }
    }

    /// Builds a prober whose buffer fits traversals of up to `max_accesses` accesses.
    pub fn with_capacity(max_accesses: usize, counter: C) -> Self {
        Self::new(WorkBuffer::for_max_accesses(max_accesses), counter)
    }

    pub fn buffer(&self) -> &WorkBuffer {
        &self.buffer
    }

    /// Measures `accesses` accesses spaced one page (+ `alignment`) apart.
    ///
    /// Lays out the pattern, runs the warmup traversals, then times `runs`
    /// traversals and keeps the fastest one. The returned checksum must be
    /// consumed by the caller so the reads cannot be optimised away.
    ///
    /// # Errors
    /// Returns `Error::BufferTooSmall` if the buffer cannot hold the traversal.
    pub fn access_mem(
        &mut self,
        alignment: Alignment,
        accesses: usize,
        runs: usize,
        mode: TraversalMode,
    ) -> Result<Measurement, Error> {
        self.buffer.prepare(alignment, accesses, mode)?;

        let stride = alignment.stride_words();
        let words = self.buffer.words();
        let mut sum: u64 = 0;

        for _ in 0..WARMUP_TRAVERSALS {
            sum = sum.wrapping_add(traverse(black_box(words), accesses, stride, mode));
        }

        let mut fastest = MinTracker::new();
        for _ in 0..runs {
            let words = black_box(words);
            let before = self.counter.now();
            let run_sum = traverse(words, accesses, stride, mode);
            let after = self.counter.now();

            sum = sum.wrapping_add(run_sum);
            fastest.record(after.wrapping_sub(before));
        }

        let measurement = Measurement {
            min_cycles: fastest.min(),
            checksum: black_box(sum),
        };
        debug!(
            ?alignment,
            ?mode,
            accesses,
            runs,
            min_cycles = measurement.min_cycles,
            "probe finished"
        );
        Ok(measurement)
    }
}

/// Walks `accesses` accesses from offset 0 and returns the sum of the words read.
#[inline(always)]
fn traverse(words: &[u64], accesses: usize, stride: usize, mode: TraversalMode) -> u64 {
    let mut sum: u64 = 0;
    let mut offset = 0;
    match mode {
        TraversalMode::Strided => {
            for _ in 0..accesses {
                sum = sum.wrapping_add(words[offset]);
                offset += stride;
            }
        }
        TraversalMode::PointerChase => {
            for _ in 0..accesses {
                let next = words[offset];
                sum = sum.wrapping_add(next);
                offset = next as usize;
            }
        }
    }
    sum
}
