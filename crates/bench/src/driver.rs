use std::io::Write;

use tracing::info;

use super::config::{Config, RunMode};
use super::error::Error;
use super::report;
use cache_conflict_core::{LatencyProber, traits::CycleCounter};
use common::types::TraversalMode;

/// Runs the reports selected by `config.mode`, writing them to `out`.
///
/// The prober's buffer is allocated once, sized for the largest access count
/// the mode will probe.
pub fn run<C: CycleCounter, W: Write>(config: &Config, counter: C, out: &mut W) -> Result<(), Error> {
    let max_accesses = config.max_accesses();
    let mut prober = LatencyProber::with_capacity(max_accesses, counter);
    info!(
        mode = ?config.mode,
        max_accesses,
        buffer_words = prober.buffer().capacity(),
        "work buffer allocated"
    );

    match config.mode {
        RunMode::Compare => {
            for &accesses in &config.compare.access_counts {
                report::compare(
                    &mut prober,
                    accesses,
                    config.compare.runs,
                    TraversalMode::PointerChase,
                    out,
                )?;
            }
        }
        RunMode::Graph => {
            for pass in &config.sweep.passes {
                report::sweep(&mut prober, pass.bound, config.sweep.runs, pass.traversal, out)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
