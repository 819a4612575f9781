use cache_conflict_core::traits::CycleCounter;

/// Counter that advances by a fixed step on every read, so every timed run costs `step`.
pub struct StepCounter {
    now: u64,
    step: u64,
}

impl StepCounter {
    pub fn new(step: u64) -> Self {
        Self { now: 0, step }
    }
}

impl CycleCounter for StepCounter {
    fn now(&mut self) -> u64 {
        self.now += self.step;
        self.now
    }
}
