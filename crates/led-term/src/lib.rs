// SPDX-License-Identifier: MIT
//
// led-term — Terminal layer for led.
//
// Three thin OS-facing modules, each owning one boundary:
//
//   terminal → raw-mode session (termios save/restore, timed reads,
//              panic-safe cleanup, size queries)
//   input    → keystroke decoding (raw bytes → logical key events,
//              including escape-sequence recognition)
//   screen   → output helpers (clear, cursor placement, LF→CRLF text)
//
// This crate intentionally avoids TUI frameworks (ratatui, crossterm):
// the editor needs a handful of escape sequences and one termios round
// trip, and owning them directly keeps every byte on the wire accounted
// for.

pub mod input;
pub mod screen;
pub mod terminal;
