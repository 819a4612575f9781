/// Source of monotonic timestamps used to bracket a timed traversal.
///
/// Implementations return raw ticks: cycles for a hardware cycle counter,
/// nanoseconds for a clock fallback. Absolute values depend on the platform
/// and on frequency scaling, so only deltas from the same counter are comparable.
pub trait CycleCounter {
    /// Reads the counter. Successive reads within a run must not decrease.
    fn now(&mut self) -> u64;
}
