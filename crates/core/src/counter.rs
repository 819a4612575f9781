use std::time::Instant;

use super::traits::CycleCounter;

/// Time-stamp counter read between two memory fences.
///
/// The fences keep loads of the traversal from drifting outside the measured window.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TscCounter;

#[cfg(target_arch = "x86_64")]
impl CycleCounter for TscCounter {
    #[inline(always)]
    fn now(&mut self) -> u64 {
        use std::arch::x86_64::{_mm_mfence, _rdtsc};

        // SAFETY: rdtsc and mfence are part of the x86_64 baseline.
        unsafe {
            _mm_mfence();
            let tsc = _rdtsc();
            _mm_mfence();
            tsc
        }
    }
}

/// Nanoseconds elapsed since the clock was created.
///
/// Used where no cycle counter is wired up; reports time rather than cycles.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl CycleCounter for MonotonicClock {
    #[inline(always)]
    fn now(&mut self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Lowest-overhead counter available on the build target.
#[cfg(target_arch = "x86_64")]
pub type DefaultCounter = TscCounter;

#[cfg(not(target_arch = "x86_64"))]
pub type DefaultCounter = MonotonicClock;
