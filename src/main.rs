// SPDX-License-Identifier: MIT
//
// led — a piece-table line editor for the terminal.
//
// This is the main binary that wires together the two crates:
//
//   led-term   → raw-mode session, key decoding, screen output
//   led-buffer → the piece-table document model
//
// The Editor struct owns the piece table and a byte-offset cursor. Each
// keypress flows through:
//
//   stdin → parser → on_key → buffer mutation / cursor move
//   repaint → text() snapshot → LF→CRLF write → cursor placement
//
// Rendering is deliberately naive: every dirty frame clears the screen
// and rewrites the whole document. At the document sizes this editor
// targets, the piece table's O(n) materialization and the single
// buffered write are nowhere near the interactive threshold.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use led_buffer::table::PieceTable;
use led_term::input::{KeyCode, KeyEvent, Parser};
use led_term::screen;
use led_term::terminal::Terminal;

// ─── Dispatch result ────────────────────────────────────────────────────────

/// What the editor tells the main loop after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Keep running.
    Continue,
    /// Exit the loop cleanly.
    Quit,
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// Editor state: the document and the cursor.
///
/// The cursor is a byte offset in `[0, len()]` — the position *before*
/// which typed text is inserted. Row/column coordinates exist only at
/// render time and on vertical moves, recomputed from the buffer's line
/// queries each time they're needed.
struct Editor {
    table: PieceTable,
    cursor: usize,
}

impl Editor {
    /// An editor over an empty document.
    fn new() -> Self {
        Self {
            table: PieceTable::new(b""),
            cursor: 0,
        }
    }

    /// An editor with a file's bytes as the initial text.
    ///
    /// Exits the process on a read error — this runs before the terminal
    /// session starts, so stderr still points at a cooked terminal.
    fn from_file(path: &str) -> Self {
        let bytes = fs::read(path).unwrap_or_else(|e| {
            eprintln!("led: {path}: {e}");
            process::exit(1);
        });
        Self {
            table: PieceTable::new(&bytes),
            cursor: 0,
        }
    }

    // ── Key dispatch ────────────────────────────────────────────

    /// Handle one decoded key event.
    fn on_key(&mut self, event: &KeyEvent) -> Action {
        if event.is_ctrl('q') {
            return Action::Quit;
        }

        match event.code {
            KeyCode::Char(ch) if event.modifiers.is_empty() => self.insert_char(ch),
            KeyCode::Enter => self.insert_bytes(b"\n"),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor < self.table.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Up => self.move_vertical(-1),
            KeyCode::Down => self.move_vertical(1),
            KeyCode::Home => self.cursor = self.line_bounds().0,
            KeyCode::End => {
                let (start, length) = self.line_bounds();
                self.cursor = start + length;
            }
            // Tab would desync the column arithmetic against the terminal's
            // tab stops; it and the remaining keys are unbound.
            _ => {}
        }

        Action::Continue
    }

    // ── Editing ─────────────────────────────────────────────────

    fn insert_char(&mut self, ch: char) {
        let mut encoded = [0u8; 4];
        self.insert_bytes(ch.encode_utf8(&mut encoded).as_bytes());
    }

    fn insert_bytes(&mut self, bytes: &[u8]) {
        self.table
            .insert(self.cursor, bytes)
            .expect("cursor within document bounds");
        self.cursor += bytes.len();
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.table
            .remove(self.cursor - 1, 1)
            .expect("cursor within document bounds");
        self.cursor -= 1;
    }

    fn delete_forward(&mut self) {
        if self.cursor < self.table.len() {
            self.table
                .remove(self.cursor, 1)
                .expect("cursor within document bounds");
        }
    }

    // ── Cursor geometry ─────────────────────────────────────────

    /// The (line, column) the cursor sits on, both 0-indexed, derived
    /// from the buffer's line queries.
    fn cursor_position(&self) -> (usize, usize) {
        let mut line = 0;
        loop {
            match self.table.line_start(line + 1) {
                Ok(start) if start <= self.cursor => line += 1,
                _ => break,
            }
        }
        let start = self
            .table
            .line_start(line)
            .expect("cursor line exists");
        (line, self.cursor - start)
    }

    /// Start offset and length of the line the cursor is on.
    fn line_bounds(&self) -> (usize, usize) {
        let (line, _) = self.cursor_position();
        let start = self.table.line_start(line).expect("cursor line exists");
        let length = self.table.line_length(line).expect("cursor line exists");
        (start, length)
    }

    /// Move the cursor up or down one line, clamping the column to the
    /// target line's length.
    fn move_vertical(&mut self, delta: isize) {
        let (line, col) = self.cursor_position();

        let target = if delta < 0 {
            let Some(target) = line.checked_sub(1) else {
                return;
            };
            target
        } else {
            line + 1
        };

        let Ok(start) = self.table.line_start(target) else {
            return; // Already on the last line.
        };
        let length = self
            .table
            .line_length(target)
            .expect("line_start succeeded for the same line");

        self.cursor = start + col.min(length);
    }

    // ── Rendering ───────────────────────────────────────────────

    /// Paint the whole document and park the cursor, into a frame buffer
    /// the caller writes out in one syscall.
    fn paint(&self, out: &mut impl Write) -> io::Result<()> {
        screen::cursor_hide(out)?;
        screen::clear(out)?;
        screen::write_text(out, &self.table.text())?;

        let (line, col) = self.cursor_position();
        screen::cursor_to(out, clamp_u16(col), clamp_u16(line))?;
        screen::cursor_show(out)
    }
}

/// Saturate a document coordinate into the terminal's u16 space.
fn clamp_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

// ─── Main loop ──────────────────────────────────────────────────────────────

/// Read keys, dispatch, repaint — until the editor quits.
///
/// `read_input` returns empty on the raw-mode read timeout; that deadline
/// is what resolves a pending lone ESC into the Escape key.
fn run(editor: &mut Editor, term: &mut Terminal) -> io::Result<()> {
    let mut parser = Parser::new();
    let mut input = [0u8; 1024];
    let mut frame = Vec::with_capacity(4096);

    repaint(editor, &mut frame)?;

    loop {
        let n = term.read_input(&mut input)?;

        let events = if n == 0 {
            if !parser.has_pending() {
                continue;
            }
            parser.flush()
        } else {
            parser.advance(&input[..n])
        };

        if events.is_empty() {
            continue;
        }

        for event in &events {
            if editor.on_key(event) == Action::Quit {
                return Ok(());
            }
        }

        repaint(editor, &mut frame)?;
    }
}

/// Build one frame in memory and write it with a single syscall.
fn repaint(editor: &Editor, frame: &mut Vec<u8>) -> io::Result<()> {
    frame.clear();
    editor.paint(frame)?;

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(frame)?;
    lock.flush()
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut editor = if args.len() > 1 {
        Editor::from_file(&args[1])
    } else {
        Editor::new()
    };

    let mut term = Terminal::new().unwrap_or_else(|e| {
        eprintln!("led: failed to initialize terminal: {e}");
        process::exit(1);
    });

    if let Err(e) = term.enter() {
        eprintln!("led: {e}");
        process::exit(1);
    }

    let result = run(&mut editor, &mut term);
    let restored = term.leave();

    if let Err(e) = result.and(restored) {
        eprintln!("led: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use led_term::input::Modifiers;

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Key press for a plain character.
    fn press(ch: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(ch))
    }

    /// Key press for a named key.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    /// Feed a string through the dispatch path one char at a time.
    fn type_str(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                editor.on_key(&key(KeyCode::Enter));
            } else {
                editor.on_key(&press(ch));
            }
        }
    }

    fn text_of(editor: &Editor) -> String {
        String::from_utf8(editor.table.text()).unwrap()
    }

    // ── Typing ────────────────────────────────────────────────────────────

    #[test]
    fn typing_inserts_at_cursor() {
        let mut editor = Editor::new();
        type_str(&mut editor, "hello");
        assert_eq!(text_of(&editor), "hello");
        assert_eq!(editor.cursor, 5);
    }

    #[test]
    fn enter_inserts_newline() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\ncd");
        assert_eq!(text_of(&editor), "ab\ncd");
        assert_eq!(editor.cursor_position(), (1, 2));
    }

    #[test]
    fn typing_mid_document_splices() {
        let mut editor = Editor::new();
        type_str(&mut editor, "helloworld");
        editor.cursor = 5;
        type_str(&mut editor, ", ");
        assert_eq!(text_of(&editor), "hello, world");
        assert_eq!(editor.cursor, 7);
    }

    #[test]
    fn multibyte_char_advances_by_its_byte_length() {
        let mut editor = Editor::new();
        editor.on_key(&press('é'));
        assert_eq!(editor.cursor, 2);
        assert_eq!(editor.table.len(), 2);
    }

    #[test]
    fn modified_chars_are_not_inserted() {
        let mut editor = Editor::new();
        editor.on_key(&KeyEvent::new(KeyCode::Char('x'), Modifiers::ALT));
        assert_eq!(editor.table.len(), 0);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut editor = Editor::new();
        let quit = KeyEvent::new(KeyCode::Char('q'), Modifiers::CTRL);
        assert_eq!(editor.on_key(&quit), Action::Quit);
    }

    // ── Backspace and delete ──────────────────────────────────────────────

    #[test]
    fn backspace_removes_before_cursor() {
        let mut editor = Editor::new();
        type_str(&mut editor, "abc");
        editor.on_key(&key(KeyCode::Backspace));
        assert_eq!(text_of(&editor), "ab");
        assert_eq!(editor.cursor, 2);
    }

    #[test]
    fn backspace_at_start_is_a_noop() {
        let mut editor = Editor::new();
        type_str(&mut editor, "abc");
        editor.cursor = 0;
        editor.on_key(&key(KeyCode::Backspace));
        assert_eq!(text_of(&editor), "abc");
        assert_eq!(editor.cursor, 0);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\ncd");
        editor.cursor = 3; // start of "cd"
        editor.on_key(&key(KeyCode::Backspace));
        assert_eq!(text_of(&editor), "abcd");
        assert_eq!(editor.cursor, 2);
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut editor = Editor::new();
        type_str(&mut editor, "abc");
        editor.cursor = 1;
        editor.on_key(&key(KeyCode::Delete));
        assert_eq!(text_of(&editor), "ac");
        assert_eq!(editor.cursor, 1);
    }

    #[test]
    fn delete_at_end_is_a_noop() {
        let mut editor = Editor::new();
        type_str(&mut editor, "abc");
        editor.on_key(&key(KeyCode::Delete));
        assert_eq!(text_of(&editor), "abc");
    }

    // ── Horizontal movement ───────────────────────────────────────────────

    #[test]
    fn left_right_clamp_at_document_edges() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab");

        editor.on_key(&key(KeyCode::Right));
        assert_eq!(editor.cursor, 2); // already at end

        editor.on_key(&key(KeyCode::Left));
        editor.on_key(&key(KeyCode::Left));
        editor.on_key(&key(KeyCode::Left));
        assert_eq!(editor.cursor, 0); // clamped at start
    }

    #[test]
    fn home_and_end_use_line_bounds() {
        let mut editor = Editor::new();
        type_str(&mut editor, "first\nsecond line");
        editor.cursor = 9; // inside "second line"

        editor.on_key(&key(KeyCode::Home));
        assert_eq!(editor.cursor, 6);

        editor.on_key(&key(KeyCode::End));
        assert_eq!(editor.cursor, 17);
    }

    // ── Vertical movement ─────────────────────────────────────────────────

    #[test]
    fn up_down_preserve_column_when_possible() {
        let mut editor = Editor::new();
        type_str(&mut editor, "abcd\nefgh");
        editor.cursor = 7; // line 1, col 2

        editor.on_key(&key(KeyCode::Up));
        assert_eq!(editor.cursor_position(), (0, 2));

        editor.on_key(&key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (1, 2));
    }

    #[test]
    fn up_down_clamp_to_shorter_lines() {
        let mut editor = Editor::new();
        type_str(&mut editor, "long line here\nab");
        editor.cursor = 10; // line 0, col 10

        editor.on_key(&key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (1, 2)); // end of "ab"
    }

    #[test]
    fn up_on_first_line_and_down_on_last_are_noops() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\ncd");

        editor.cursor = 1;
        editor.on_key(&key(KeyCode::Up));
        assert_eq!(editor.cursor, 1);

        editor.cursor = 4;
        editor.on_key(&key(KeyCode::Down));
        assert_eq!(editor.cursor, 4);
    }

    #[test]
    fn down_onto_trailing_empty_line() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\n");
        editor.cursor = 1;

        editor.on_key(&key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (1, 0));
        assert_eq!(editor.cursor, 3);
    }

    // ── Cursor geometry ───────────────────────────────────────────────────

    #[test]
    fn cursor_position_walks_lines() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\ncd\nef");

        editor.cursor = 0;
        assert_eq!(editor.cursor_position(), (0, 0));
        editor.cursor = 4;
        assert_eq!(editor.cursor_position(), (1, 1));
        editor.cursor = 8;
        assert_eq!(editor.cursor_position(), (2, 2));
    }

    #[test]
    fn cursor_position_on_empty_document() {
        let editor = Editor::new();
        assert_eq!(editor.cursor_position(), (0, 0));
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    #[test]
    fn paint_emits_document_with_crlf() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\ncd");
        editor.cursor = 0;

        let mut frame = Vec::new();
        editor.paint(&mut frame).unwrap();
        let s = String::from_utf8(frame).unwrap();

        assert!(s.contains("ab\r\ncd"));
        assert!(s.contains("\x1b[2J")); // clears
        assert!(s.ends_with("\x1b[?25h")); // re-shows the cursor last
    }

    #[test]
    fn paint_parks_cursor_at_row_col() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab\ncd");
        editor.cursor = 4; // line 1, col 1

        let mut frame = Vec::new();
        editor.paint(&mut frame).unwrap();
        let s = String::from_utf8(frame).unwrap();

        // CUP is 1-indexed: row 2, col 2.
        assert!(s.contains("\x1b[2;2H"));
    }

    #[test]
    fn clamp_u16_saturates() {
        assert_eq!(clamp_u16(3), 3);
        assert_eq!(clamp_u16(usize::from(u16::MAX) + 10), u16::MAX);
    }

    // ── Whole-session flows ───────────────────────────────────────────────

    #[test]
    fn editing_session_end_to_end() {
        let mut editor = Editor::new();
        type_str(&mut editor, "This is test data.");

        // Go back and qualify "data".
        editor.cursor = 8;
        type_str(&mut editor, "some ");
        assert_eq!(text_of(&editor), "This is some test data.");

        // Split into two lines at the cursor.
        editor.on_key(&key(KeyCode::Enter));
        assert_eq!(text_of(&editor), "This is some \ntest data.");
        assert_eq!(editor.cursor_position(), (1, 0));

        // And undo the split with backspace.
        editor.on_key(&key(KeyCode::Backspace));
        assert_eq!(text_of(&editor), "This is some test data.");
    }

    #[test]
    fn length_matches_text_after_dispatch_storm() {
        let mut editor = Editor::new();
        type_str(&mut editor, "line\nline\nline");

        for _ in 0..3 {
            editor.on_key(&key(KeyCode::Up));
            editor.on_key(&key(KeyCode::End));
            type_str(&mut editor, "!");
            editor.on_key(&key(KeyCode::Home));
            editor.on_key(&key(KeyCode::Delete));
        }

        assert_eq!(editor.table.len(), editor.table.text().len());
    }
}
