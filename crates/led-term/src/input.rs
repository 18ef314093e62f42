// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into logical key events. Handles what a raw-mode
// session without optional protocols actually receives:
//
// - Printable ASCII and UTF-8 multi-byte characters
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, Home/End, Delete, xterm modifiers)
// - SS3 sequences (arrow/Home/End alternate encoding from some terminals)
// - Alt+key (ESC followed by a printable character)
//
// # Design
//
// The parser maintains a small internal byte buffer because escape
// sequences can span multiple `read()` calls. Feed bytes with
// [`Parser::advance`], retrieve events from the returned `Vec`. After a
// read timeout with no new bytes, call [`Parser::flush`] to emit any
// pending lone ESC as a real Escape keypress.
//
// Number parsing is done directly on `&[u8]` — no intermediate `String`
// allocation for CSI parameter decoding.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key event with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key event with explicit modifiers.
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// True for Ctrl + the given (lowercase) character.
    #[inline]
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL) && self.code == KeyCode::Char(ch)
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// One step of parsing from the front of the pending buffer.
enum Step {
    /// `consumed` bytes produced this event.
    Event(usize, KeyEvent),
    /// `consumed` bytes produced nothing we handle (unknown sequence).
    Skip(usize),
    /// The buffer holds the start of a sequence that needs more bytes.
    Incomplete,
}

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. The parser buffers incomplete sequences internally and
/// resumes when more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be either a standalone Escape keypress or
/// the start of a multi-byte escape sequence. The parser holds it as
/// pending. The caller should wait for the read timeout and then call
/// [`flush`](Parser::flush) to emit the pending ESC as a real Escape key.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// True when bytes are buffered waiting for a sequence to complete.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Feed raw bytes from the terminal and return all complete events.
    ///
    /// Bytes that form an incomplete sequence are kept in the internal
    /// buffer and combined with future calls. Call [`flush`](Parser::flush)
    /// after a read timeout to resolve a pending lone ESC.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match parse_one(&self.buf[pos..]) {
                Step::Event(consumed, event) => {
                    events.push(event);
                    pos += consumed;
                }
                Step::Skip(consumed) => pos += consumed,
                Step::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Resolve pending bytes after a read timeout.
    ///
    /// A sequence start that never completed is not going to: a leading ESC
    /// becomes the Escape key, anything else unparseable is dropped. The
    /// buffer is empty afterwards.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match parse_one(&self.buf[pos..]) {
                Step::Event(consumed, event) => {
                    events.push(event);
                    pos += consumed;
                }
                Step::Skip(consumed) => pos += consumed,
                Step::Incomplete => {
                    if self.buf[pos] == 0x1b {
                        events.push(KeyEvent::plain(KeyCode::Escape));
                    }
                    pos += 1;
                }
            }
        }

        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Byte-Level Decoding ────────────────────────────────────────────────────

/// Parse one event from the front of `bytes`. Never called on empty input.
fn parse_one(bytes: &[u8]) -> Step {
    let first = bytes[0];
    match first {
        0x1b => parse_escape(bytes),
        b'\r' | b'\n' => Step::Event(1, KeyEvent::plain(KeyCode::Enter)),
        b'\t' => Step::Event(1, KeyEvent::plain(KeyCode::Tab)),
        // DEL is what modern terminals send for Backspace; 0x08 is the
        // legacy Ctrl-H encoding.
        0x7f | 0x08 => Step::Event(1, KeyEvent::plain(KeyCode::Backspace)),
        0x01..=0x1a => {
            // Ctrl+letter arrives as the letter with bits 5-6 cleared.
            let ch = char::from(first | 0x60);
            Step::Event(1, KeyEvent::new(KeyCode::Char(ch), Modifiers::CTRL))
        }
        // NUL and the remaining C0 bytes have no editor meaning.
        0x00 | 0x1c..=0x1f => Step::Skip(1),
        0x20..=0x7e => Step::Event(1, KeyEvent::plain(KeyCode::Char(char::from(first)))),
        _ => parse_utf8(bytes),
    }
}

/// Parse a sequence starting with ESC.
fn parse_escape(bytes: &[u8]) -> Step {
    if bytes.len() == 1 {
        // Lone ESC: Escape key or sequence start — only time can tell.
        return Step::Incomplete;
    }

    match bytes[1] {
        b'[' => parse_csi(bytes),
        b'O' => {
            if bytes.len() < 3 {
                return Step::Incomplete;
            }
            ss3_key(bytes[2]).map_or(Step::Skip(3), |code| {
                Step::Event(3, KeyEvent::plain(code))
            })
        }
        0x20..=0x7e => {
            // ESC + printable: Alt+char.
            let ch = char::from(bytes[1]);
            Step::Event(2, KeyEvent::new(KeyCode::Char(ch), Modifiers::ALT))
        }
        _ => {
            // ESC + control byte: treat the ESC as Escape and let the
            // following byte parse on its own.
            Step::Event(1, KeyEvent::plain(KeyCode::Escape))
        }
    }
}

/// Parse a CSI sequence: `ESC [ params final`.
///
/// The final byte is in `0x40..=0x7E`; everything between the bracket and
/// the final byte is parameter data.
fn parse_csi(bytes: &[u8]) -> Step {
    let mut i = 2;
    while i < bytes.len() {
        let b = bytes[i];
        if (0x40..=0x7e).contains(&b) {
            let params = &bytes[2..i];
            let consumed = i + 1;
            return csi_key(b, params)
                .map_or(Step::Skip(consumed), |event| Step::Event(consumed, event));
        }
        i += 1;
    }
    Step::Incomplete
}

/// Decode a complete CSI sequence into a key event.
///
/// Returns `None` for sequences we recognize the shape of but not the
/// meaning (function keys, responses to queries we never send).
fn csi_key(final_byte: u8, params: &[u8]) -> Option<KeyEvent> {
    let fields = split_params(params)?;
    let modifiers = fields[1].map_or_else(Modifiers::empty, decode_modifiers);

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'~' => match fields[0] {
            Some(1 | 7) => KeyCode::Home,
            Some(3) => KeyCode::Delete,
            Some(4 | 8) => KeyCode::End,
            _ => return None,
        },
        _ => return None,
    };

    Some(KeyEvent::new(code, modifiers))
}

/// Decode an SS3 sequence final byte (`ESC O x`).
const fn ss3_key(byte: u8) -> Option<KeyCode> {
    match byte {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

/// Split CSI parameter bytes into up to two numeric fields.
///
/// Returns `None` when the parameter data contains bytes we don't decode
/// (intermediate or private-use characters).
fn split_params(params: &[u8]) -> Option<[Option<usize>; 2]> {
    let mut out = [None, None];
    let mut field = 0;
    let mut current: Option<usize> = None;

    for &b in params {
        match b {
            b'0'..=b'9' => {
                let digit = usize::from(b - b'0');
                current = Some(current.unwrap_or(0) * 10 + digit);
            }
            b';' => {
                if field < out.len() {
                    out[field] = current;
                }
                field += 1;
                current = None;
            }
            _ => return None,
        }
    }
    if field < out.len() {
        out[field] = current;
    }

    Some(out)
}

/// Decode an xterm modifier parameter: `param = 1 + bitmask`.
fn decode_modifiers(param: usize) -> Modifiers {
    let mask = param.saturating_sub(1);
    let mut mods = Modifiers::empty();
    if mask & 0x1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if mask & 0x2 != 0 {
        mods |= Modifiers::ALT;
    }
    if mask & 0x4 != 0 {
        mods |= Modifiers::CTRL;
    }
    mods
}

/// Parse a UTF-8 multi-byte character from the front of `bytes`.
fn parse_utf8(bytes: &[u8]) -> Step {
    let expected = match bytes[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        // Stray continuation byte or invalid leading byte.
        _ => return Step::Skip(1),
    };

    if bytes.len() < expected {
        return Step::Incomplete;
    }

    std::str::from_utf8(&bytes[..expected]).map_or(Step::Skip(1), |s| {
        s.chars().next().map_or(Step::Skip(1), |ch| {
            Step::Event(expected, KeyEvent::plain(KeyCode::Char(ch)))
        })
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
