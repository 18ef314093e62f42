//! The changes buffer — an owned, append-only byte store.
//!
//! Every byte ever inserted into the document lands here, in insertion order,
//! and stays at its offset for the lifetime of the table. That stability is
//! what lets any number of spans reference disjoint (or overlapping,
//! historical) ranges of the same storage: growth reallocates the backing
//! memory but copies used bytes to the same relative positions, so span
//! offsets remain valid across every append.

// ---------------------------------------------------------------------------
// AppendBuffer
// ---------------------------------------------------------------------------

/// Starting capacity of the changes buffer. Covers a typical editing burst
/// before the first growth.
const INITIAL_CAPACITY: usize = 1024;

/// Append-only growable byte buffer.
///
/// Supports exactly two operations: [`append`](Self::append), which writes at
/// the end and returns the start offset of the written range, and
/// [`slice`](Self::slice), which reads a previously written range. Used bytes
/// are never overwritten, shrunk, or moved to a different offset.
///
/// Capacity grows to `max(required, 2 × current)` whenever an append would
/// overflow — the used length and the allocated capacity are tracked
/// separately, and growth preserves all previously written bytes.
#[derive(Debug)]
pub struct AppendBuffer {
    buf: Vec<u8>,
}

impl AppendBuffer {
    /// An empty buffer with the fixed starting capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been appended yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Currently allocated capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Append `data` and return the offset where it starts.
    ///
    /// Grows capacity first if needed, to at least
    /// `max(len() + data.len(), 2 × capacity())`.
    pub fn append(&mut self, data: &[u8]) -> usize {
        let start = self.buf.len();
        let required = start + data.len();

        if required > self.buf.capacity() {
            let target = required.max(self.buf.capacity() * 2);
            self.buf.reserve_exact(target - start);
        }

        self.buf.extend_from_slice(data);
        start
    }

    /// The bytes at `[start, start + length)`.
    ///
    /// # Panics
    ///
    /// Panics if the range extends past the used length. Spans only ever
    /// reference ranges returned by [`append`](Self::append), so a panic here
    /// means the span sequence is corrupt.
    #[inline]
    #[must_use]
    pub fn slice(&self, start: usize, length: usize) -> &[u8] {
        &self.buf[start..start + length]
    }
}

impl Default for AppendBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
