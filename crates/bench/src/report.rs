use std::io::Write;
use std::iter;

use tracing::info;

use super::error::Error;
use cache_conflict_core::{LatencyProber, traits::CycleCounter};
use common::{
    stats::ratio,
    types::{Alignment, LINE_SIZE, Measurement, TraversalMode},
};

/// Aligned and unaligned measurements for one access count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub accesses: usize,
    pub aligned: Measurement,
    pub unaligned: Measurement,
}

impl Comparison {
    /// Page-aligned cost divided by page-unaligned cost.
    pub fn ratio(&self) -> f64 {
        ratio(self.aligned.min_cycles, self.unaligned.min_cycles)
    }
}

/// Timings collected by a sweep, indexed by access count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepResult {
    pub aligned: Vec<u64>,
    pub unaligned: Vec<u64>,
}

impl SweepResult {
    pub fn with_capacity(bound: usize) -> Self {
        Self {
            aligned: Vec::with_capacity(bound),
            unaligned: Vec::with_capacity(bound),
        }
    }

    pub fn len(&self) -> usize {
        self.aligned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned.is_empty()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.aligned
            .iter()
            .zip(&self.unaligned)
            .map(|(&aligned, &unaligned)| ratio(aligned, unaligned))
            .collect()
    }
}

/// Probes `accesses` accesses at both alignments and prints the comparison block.
pub fn compare<C: CycleCounter, W: Write>(
    prober: &mut LatencyProber<C>,
    accesses: usize,
    runs: usize,
    mode: TraversalMode,
    out: &mut W,
) -> Result<Comparison, Error> {
    let aligned = probe(prober, Alignment::Aligned, accesses, runs, mode, out)?;
    let unaligned = probe(prober, Alignment::LineOffset, accesses, runs, mode, out)?;
    let comparison = Comparison {
        accesses,
        aligned,
        unaligned,
    };

    writeln!(out, "----------{} accesses--------", accesses)?;
    writeln!(out, "Page-aligned time:         {}", aligned.min_cycles)?;
    writeln!(
        out,
        "Page-unaligned (+{}) time: {}",
        LINE_SIZE, unaligned.min_cycles
    )?;
    writeln!(out, "Difference: {:.6}", comparison.ratio())?;

    info!(
        accesses,
        aligned = aligned.min_cycles,
        unaligned = unaligned.min_cycles,
        "comparison done"
    );
    Ok(comparison)
}

/// Probes every access count in `0..bound` at both alignments and prints
/// the aligned, unaligned and ratio series as comma-terminated lines.
pub fn sweep<C: CycleCounter, W: Write>(
    prober: &mut LatencyProber<C>,
    bound: usize,
    runs: usize,
    mode: TraversalMode,
    out: &mut W,
) -> Result<SweepResult, Error> {
    let mut result = SweepResult::with_capacity(bound);

    for accesses in 0..bound {
        let aligned = probe(prober, Alignment::Aligned, accesses, runs, mode, out)?;
        let unaligned = probe(prober, Alignment::LineOffset, accesses, runs, mode, out)?;
        result.aligned.push(aligned.min_cycles);
        result.unaligned.push(unaligned.min_cycles);
    }

    write_series(&result, out)?;

    info!(bound, ?mode, "sweep done");
    Ok(result)
}

/// Runs one probe and prints its checksum so the traversal stays observable.
fn probe<C: CycleCounter, W: Write>(
    prober: &mut LatencyProber<C>,
    alignment: Alignment,
    accesses: usize,
    runs: usize,
    mode: TraversalMode,
    out: &mut W,
) -> Result<Measurement, Error> {
    let measurement = prober.access_mem(alignment, accesses, runs, mode)?;
    writeln!(out, "Sum: {}", measurement.checksum)?;
    Ok(measurement)
}

fn write_series<W: Write>(result: &SweepResult, out: &mut W) -> Result<(), Error> {
    // A record holding only an empty field would be quoted, so empty series are bare newlines.
    if result.is_empty() {
        out.write_all(b"\n\n\n")?;
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut *out);

    // The trailing empty field yields the comma after the last value.
    writer.write_record(comma_terminated(result.aligned.iter().map(u64::to_string)))?;
    writer.write_record(comma_terminated(result.unaligned.iter().map(u64::to_string)))?;
    writer.write_record(comma_terminated(
        result.ratios().into_iter().map(|r| format!("{:.6}", r)),
    ))?;
    writer.flush()?;

    Ok(())
}

fn comma_terminated(fields: impl Iterator<Item = String>) -> impl Iterator<Item = String> {
    fields.chain(iter::once(String::new()))
}
