use common::{
    error::Error,
    types::{Alignment, PAGE_SIZE, TraversalMode, WORD_SIZE},
};

/// Contiguous array of words the prober lays its access patterns over.
///
/// Allocated once, sized for the longest traversal a run needs, and
/// re-initialised by [`WorkBuffer::prepare`] before every measurement.
#[derive(Debug, Clone)]
pub struct WorkBuffer {
    words: Vec<u64>,
}

impl WorkBuffer {
    /// Allocates a buffer able to hold any traversal of up to `max_accesses` accesses.
    pub fn for_max_accesses(max_accesses: usize) -> Self {
        Self {
            words: vec![0; Self::required_words(max_accesses)],
        }
    }

    /// Number of words initialised for a traversal of `accesses` accesses.
    pub fn fill_words(accesses: usize) -> usize {
        accesses * PAGE_SIZE
    }

    /// Index of the chain slot that points back to offset 0.
    pub fn wrap_slot(accesses: usize) -> usize {
        accesses * PAGE_SIZE / WORD_SIZE
    }

    /// Smallest buffer length that keeps a traversal of `accesses` accesses in bounds.
    ///
    /// Covers the filled region, the wrap slot, and the furthest strided offset
    /// at either alignment.
    pub fn required_words(accesses: usize) -> usize {
        let furthest_stride = accesses.saturating_sub(1) * Alignment::LineOffset.stride_words();
        Self::fill_words(accesses)
            .max(Self::wrap_slot(accesses) + 1)
            .max(furthest_stride + 1)
    }

    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Writes the filler values and, for pointer chasing, the chain of next offsets.
    ///
    /// The chain places `i + stride` at every `stride`-th word of the filled region
    /// and then stores `0` at [`WorkBuffer::wrap_slot`], so the walk restarts at the
    /// front of the buffer.
    pub fn prepare(
        &mut self,
        alignment: Alignment,
        accesses: usize,
        mode: TraversalMode,
    ) -> Result<(), Error> {
        let required = Self::required_words(accesses);
        if required > self.capacity() {
            return Err(Error::BufferTooSmall {
                required,
                capacity: self.capacity(),
            });
        }

        let fill = Self::fill_words(accesses);
        for (i, word) in self.words[..fill].iter_mut().enumerate() {
            *word = (i % 17) as u64;
        }

        if mode == TraversalMode::PointerChase {
            let stride = alignment.stride_words();
            for i in (0..fill).step_by(stride) {
                self.words[i] = (i + stride) as u64;
            }
            self.words[Self::wrap_slot(accesses)] = 0;
        }

        Ok(())
    }

    /// Offsets a traversal of `accesses` accesses visits, in order.
    pub fn traversal(
        &self,
        alignment: Alignment,
        accesses: usize,
        mode: TraversalMode,
    ) -> Traversal<'_> {
        Traversal {
            words: &self.words,
            mode,
            stride: alignment.stride_words(),
            offset: 0,
            remaining: accesses,
        }
    }
}

/// Iterator over the offsets of one traversal, starting at offset 0.
pub struct Traversal<'a> {
    words: &'a [u64],
    mode: TraversalMode,
    stride: usize,
    offset: usize,
    remaining: usize,
}

impl Iterator for Traversal<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.offset;
        self.offset = match self.mode {
            TraversalMode::Strided => current + self.stride,
            TraversalMode::PointerChase => self.words[current] as usize,
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Traversal<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_words() {
        assert_eq!(WorkBuffer::required_words(0), 1);
        assert_eq!(WorkBuffer::required_words(1), PAGE_SIZE);
        assert_eq!(WorkBuffer::required_words(1024), 1024 * PAGE_SIZE);
    }

    #[test]
    fn test_pointer_chase_wraps_to_zero() {
        let mut buffer = WorkBuffer::for_max_accesses(4);
        buffer
            .prepare(Alignment::Aligned, 4, TraversalMode::PointerChase)
            .unwrap();

        let visited: Vec<usize> = buffer
            .traversal(Alignment::Aligned, 4, TraversalMode::PointerChase)
            .collect();
        assert_eq!(visited, vec![0, 512, 1024, 1536]);

        // The hop after the last visited slot lands on the wrap slot, which points home.
        let last = *visited.last().unwrap();
        let next = buffer.words()[last] as usize;
        assert_eq!(next, WorkBuffer::wrap_slot(4));
        assert_eq!(buffer.words()[next], 0);
    }

    #[test]
    fn test_line_offset_chain() {
        let mut buffer = WorkBuffer::for_max_accesses(4);
        buffer
            .prepare(Alignment::LineOffset, 4, TraversalMode::PointerChase)
            .unwrap();

        let visited: Vec<usize> = buffer
            .traversal(Alignment::LineOffset, 4, TraversalMode::PointerChase)
            .collect();
        assert_eq!(visited, vec![0, 520, 1040, 1560]);
    }

    #[test]
    fn test_strided_writes_no_chain() {
        let mut buffer = WorkBuffer::for_max_accesses(2);
        buffer
            .prepare(Alignment::Aligned, 2, TraversalMode::Strided)
            .unwrap();

        assert_eq!(buffer.words()[0], 0);
        assert_eq!(buffer.words()[512], (512 % 17) as u64);

        let visited: Vec<usize> = buffer
            .traversal(Alignment::LineOffset, 3, TraversalMode::Strided)
            .collect();
        assert_eq!(visited, vec![0, 520, 1040]);
    }

    #[test]
    fn test_prepare_resets_previous_chain() {
        let mut buffer = WorkBuffer::for_max_accesses(4);
        buffer
            .prepare(Alignment::Aligned, 4, TraversalMode::PointerChase)
            .unwrap();
        buffer
            .prepare(Alignment::Aligned, 4, TraversalMode::Strided)
            .unwrap();

        let filler: Vec<u64> = (0..WorkBuffer::fill_words(4))
            .map(|i| (i % 17) as u64)
            .collect();
        assert_eq!(&buffer.words()[..WorkBuffer::fill_words(4)], filler.as_slice());
    }

    #[test]
    fn test_zero_accesses() {
        let mut buffer = WorkBuffer::for_max_accesses(0);
        buffer
            .prepare(Alignment::LineOffset, 0, TraversalMode::PointerChase)
            .unwrap();

        assert_eq!(buffer.words(), &[0]);
        assert_eq!(
            buffer
                .traversal(Alignment::LineOffset, 0, TraversalMode::PointerChase)
                .count(),
            0
        );
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buffer = WorkBuffer::for_max_accesses(1);
        let result = buffer.prepare(Alignment::Aligned, 2, TraversalMode::PointerChase);

        assert_eq!(
            result,
            Err(Error::BufferTooSmall {
                required: 2 * PAGE_SIZE,
                capacity: PAGE_SIZE,
            })
        );
    }
}
