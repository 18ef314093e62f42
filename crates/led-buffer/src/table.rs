//! The piece table — the document model behind every edit and query.
//!
//! A `PieceTable` never rewrites text it already holds. The original text is
//! copied once at construction and stays immutable; every insertion appends
//! to a second, append-only buffer. The logical document is an ordered
//! sequence of [`Span`]s, each referencing a contiguous slice of one of the
//! two buffers — concatenating span contents in order reconstructs the
//! current text.
//!
//! # Design choices
//!
//! - **Edits rewrite spans, not bytes.** Insert splits the span containing
//!   the insertion point and splices a new changes-span between the halves;
//!   removal shrinks or splits the containing span. Buffer offsets stored in
//!   spans never change — only their position in the sequence does.
//!
//! - **No zero-length spans.** Splits that would produce an empty remainder
//!   skip it. The committed sequence always partitions the document with no
//!   gaps, no overlaps, and no padding entries.
//!
//! - **Queries walk the sequence.** Length is a prefix sum; `text()` copies
//!   span contents into a caller-owned snapshot; the line queries walk the
//!   document byte-by-byte counting `\n`. No persistent line index is kept —
//!   at this scale a linear walk per query is the simpler trade.
//!
//! - **Byte offsets only.** The table does not know about UTF-8. Callers
//!   that insert multi-byte characters index by byte, as everywhere else in
//!   the crate.

use crate::error::{IndexOutOfRange, Result};
use crate::span::{Span, SpanSource};
use crate::store::AppendBuffer;

// ---------------------------------------------------------------------------
// PieceTable
// ---------------------------------------------------------------------------

/// A text document stored as spans over two buffers.
///
/// Owns the immutable original buffer, the append-only changes buffer, and
/// the span sequence. Dropping the table frees all three together — the
/// only data that survives it are the owned snapshots returned by
/// [`text`](Self::text).
#[derive(Debug)]
pub struct PieceTable {
    /// Exact-size copy of the construction text. Never mutated.
    original: Box<[u8]>,
    /// Everything inserted after construction, in insertion order.
    changes: AppendBuffer,
    /// Ordered spans; concatenated contents equal the current document.
    spans: Vec<Span>,
}

impl PieceTable {
    // -- Construction -------------------------------------------------------

    /// Create a table over a copy of `initial`.
    ///
    /// A non-empty text becomes a single span covering the whole original
    /// buffer; an empty text starts with an empty span sequence.
    #[must_use]
    pub fn new(initial: &[u8]) -> Self {
        let spans = if initial.is_empty() {
            Vec::new()
        } else {
            vec![Span::original(0, initial.len())]
        };

        Self {
            original: initial.into(),
            changes: AppendBuffer::new(),
            spans,
        }
    }

    // -- Length and materialization -----------------------------------------

    /// Logical document length in bytes. O(number of spans).
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.iter().map(|span| span.length).sum()
    }

    /// True when the document has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of spans in the sequence. Diagnostic — the document content
    /// never depends on how it is partitioned.
    #[inline]
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Materialize the document as an independent, caller-owned snapshot.
    ///
    /// Allocates exactly `len()` bytes and copies each span's content in
    /// sequence order. The snapshot does not alias either internal buffer.
    /// O(document length).
    #[must_use]
    pub fn text(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for span in &self.spans {
            out.extend_from_slice(self.span_bytes(span));
        }
        out
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `data` before byte offset `index`.
    ///
    /// `index` may be anywhere in `[0, len()]`; `len()` appends. The data is
    /// appended to the changes buffer and a span referencing it is spliced
    /// into the sequence, splitting the span that contains `index` when the
    /// insertion point falls inside one.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index > len()`. Validation happens before the
    /// changes buffer is touched, so a failed insert mutates nothing.
    pub fn insert(&mut self, index: usize, data: &[u8]) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(IndexOutOfRange { index, bound: len });
        }
        if data.is_empty() {
            return Ok(());
        }

        let start = self.changes.append(data);
        let new = Span::changes(start, data.len());

        // Appending (which includes inserting into an empty document) needs
        // no split: there is no following content to separate from.
        if index == len {
            self.spans.push(new);
            return Ok(());
        }

        let (target_idx, offset) = self.locate(index);
        let target = self.spans[target_idx];

        // Replace the target with {left remainder?, new, right remainder}.
        // The left remainder is empty exactly when `index` sits on the
        // target's leading boundary; the right remainder is never empty
        // because `offset < target.length`.
        let mut replacement = Vec::with_capacity(3);
        if offset > 0 {
            replacement.push(Span {
                length: offset,
                ..target
            });
        }
        replacement.push(new);
        replacement.push(Span {
            source: target.source,
            start: target.start + offset,
            length: target.length - offset,
        });

        self.spans.splice(target_idx..=target_idx, replacement);
        Ok(())
    }

    /// Remove `count` bytes starting at byte offset `index`.
    ///
    /// Applies [`remove_one`](Self::remove_one) `count` times at the same
    /// index — each removal shifts the rest of the document left, so the
    /// next logical byte is removed each time.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the current index falls out of range at any
    /// point. **Not atomic**: removals already applied when the error occurs
    /// stay applied. Callers that need all-or-nothing behavior must check
    /// `index + count <= len()` first.
    pub fn remove(&mut self, index: usize, count: usize) -> Result<()> {
        for _ in 0..count {
            self.remove_one(index)?;
        }
        Ok(())
    }

    /// Remove exactly one byte at `index`.
    ///
    /// The containing span shrinks from the matching edge, or splits in two
    /// when the byte is interior. A span shrunk to nothing leaves the
    /// sequence entirely.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index >= len()`; the document is unchanged.
    pub fn remove_one(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(IndexOutOfRange { index, bound: len });
        }

        let (target_idx, offset) = self.locate(index);
        let target = self.spans[target_idx];

        if target.length == 1 {
            // Sole byte — the span would become zero-length; drop it.
            self.spans.remove(target_idx);
        } else if offset == target.length - 1 {
            // Last byte of the span.
            self.spans[target_idx].length -= 1;
        } else if offset == 0 {
            // First byte of the span.
            self.spans[target_idx].start += 1;
            self.spans[target_idx].length -= 1;
        } else {
            // Interior byte — split around it.
            let right = Span {
                source: target.source,
                start: target.start + offset + 1,
                length: target.length - offset - 1,
            };
            self.spans[target_idx].length = offset;
            self.spans.insert(target_idx + 1, right);
        }

        Ok(())
    }

    // -- Line queries -------------------------------------------------------

    /// Document offset where line `line` starts.
    ///
    /// Line 0 starts at offset 0. For `line > 0` this is the offset of the
    /// byte immediately after the `line`-th `\n` — which equals `len()` when
    /// the document ends with a newline and `line` addresses the empty last
    /// line. O(document length).
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the document contains fewer than `line`
    /// newlines; `bound` reports how many it has.
    pub fn line_start(&self, line: usize) -> Result<usize> {
        if line == 0 {
            return Ok(0);
        }

        let mut newlines = 0;
        for (offset, byte) in self.bytes().enumerate() {
            if byte == b'\n' {
                newlines += 1;
                if newlines == line {
                    return Ok(offset + 1);
                }
            }
        }

        Err(IndexOutOfRange {
            index: line,
            bound: newlines,
        })
    }

    /// Number of bytes in line `line`, excluding its terminating `\n`.
    ///
    /// The last line of a document with no trailing newline runs to end of
    /// document. O(document length).
    ///
    /// # Errors
    ///
    /// Propagates [`line_start`](Self::line_start)'s failure for a line that
    /// does not exist.
    pub fn line_length(&self, line: usize) -> Result<usize> {
        let start = self.line_start(line)?;

        let mut length = 0;
        for byte in self.bytes().skip(start) {
            if byte == b'\n' {
                break;
            }
            length += 1;
        }
        Ok(length)
    }

    // -- Internals ----------------------------------------------------------

    /// The bytes a span references.
    fn span_bytes(&self, span: &Span) -> &[u8] {
        match span.source {
            SpanSource::Original => &self.original[span.start..span.end()],
            SpanSource::Changes => self.changes.slice(span.start, span.length),
        }
    }

    /// Iterate the document's bytes in logical order.
    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.spans
            .iter()
            .flat_map(|span| self.span_bytes(span).iter().copied())
    }

    /// Locate the span containing byte offset `index` by running prefix
    /// sums. Returns the span's position in the sequence and the offset of
    /// `index` within it.
    ///
    /// Callers must validate `index < len()` first.
    fn locate(&self, index: usize) -> (usize, usize) {
        let mut consumed = 0;
        for (i, span) in self.spans.iter().enumerate() {
            if index < consumed + span.length {
                return (i, index - consumed);
            }
            consumed += span.length;
        }
        unreachable!("locate called with index past the span sequence");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
