//! # led-buffer — Piece-table buffer engine for led
//!
//! This crate is the editor's document model. A [`table::PieceTable`] holds
//! the text as two byte buffers — the immutable original and an append-only
//! buffer of everything inserted since — plus an ordered sequence of spans
//! that stitches slices of the two into the logical document:
//!
//! - **[`span`]** — `Span` and `SpanSource`, the slice descriptors
//! - **[`store`]** — `AppendBuffer`, the append-only changes buffer
//! - **[`table`]** — `PieceTable` with insert/remove and the line queries
//! - **[`error`]** — `IndexOutOfRange`, the one recoverable failure
//!
//! Everything is byte-indexed. The crate never looks inside the bytes except
//! to count `\n` for the line queries — encoding, display width, and cursor
//! semantics belong to the layers above.

pub mod error;
pub mod span;
pub mod store;
pub mod table;
