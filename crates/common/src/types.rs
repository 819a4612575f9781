use serde::Deserialize;

/// Size of a memory page in bytes.
pub const PAGE_SIZE: usize = 4096;

/// Size of a cache line in bytes.
pub const LINE_SIZE: usize = 64;

/// Size of one buffer element (`u64`) in bytes.
pub const WORD_SIZE: usize = std::mem::size_of::<u64>();

/// Untimed traversals run before measuring to settle cache and TLB state.
pub const WARMUP_TRAVERSALS: usize = 2;

/// Offset of each access relative to a page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Accesses exactly one page apart.
    Aligned,
    /// Accesses one page plus one cache line apart.
    LineOffset,
}

impl Alignment {
    pub fn bytes(self) -> usize {
        match self {
            Alignment::Aligned => 0,
            Alignment::LineOffset => LINE_SIZE,
        }
    }

    /// Distance between two consecutive accesses, in buffer elements.
    ///
    /// ```text
    /// Aligned:    (4096 + 0)  / 8 = 512
    /// LineOffset: (4096 + 64) / 8 = 520
    /// ```
    pub fn stride_words(self) -> usize {
        (PAGE_SIZE + self.bytes()) / WORD_SIZE
    }
}

/// How the next address of a traversal is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// The next offset is computed arithmetically; the value read only feeds the checksum.
    Strided,
    /// The value read is the offset of the next access.
    PointerChase,
}

/// Outcome of one timed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Smallest cycle count observed for one full traversal.
    pub min_cycles: u64,
    /// Wrapping sum of every value read, warmup included.
    pub checksum: u64,
}
