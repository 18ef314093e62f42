// SPDX-License-Identifier: MIT
//
// Screen output — escape sequence helpers for the repaint path.
//
// Pure functions that write to any `impl Write`. No state, no decisions
// about when to emit — the editor accumulates a frame's worth of output
// in a buffer and flushes it once per repaint.
//
// All cursor positions are 0-indexed in our API and converted to
// 1-indexed for the terminal (ANSI uses 1-based coordinates).
//
// Raw mode disables OPOST, so the terminal no longer translates `\n` to
// `\r\n` on output; `write_text` does that expansion for document text.

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen and home the cursor (ED 2 + CUP 1;1).
#[inline]
pub fn clear(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J\x1b[1;1H")
}

// ─── Text ────────────────────────────────────────────────────────────────────

/// Write document text, expanding each `\n` to `\r\n`.
///
/// With OPOST disabled a bare `\n` only moves the cursor down, leaving the
/// column where it was; every newline needs an explicit carriage return.
/// Writes each `\n`-free run in one call rather than byte-at-a-time.
pub fn write_text(w: &mut impl Write, text: &[u8]) -> io::Result<()> {
    let mut rest = text;
    while let Some(nl) = rest.iter().position(|&b| b == b'\n') {
        w.write_all(&rest[..nl])?;
        w.write_all(b"\r\n")?;
        rest = &rest[nl + 1..];
    }
    w.write_all(rest)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
