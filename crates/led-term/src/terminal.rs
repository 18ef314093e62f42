// SPDX-License-Identifier: MIT
//
// Terminal control — the raw-mode session.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads/writes. These
// are the standard POSIX interfaces for terminal control — there is no
// safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state as an explicit resource:
// entering the session saves the current termios and switches the
// terminal to raw mode; leaving (or dropping, or panicking) restores it.
// Raw mode disables canonical line buffering and echo so the editor sees
// every keystroke byte as it arrives.
//
// Reads use VMIN=0 / VTIME=1: a read returns as soon as bytes are
// available, or empty after a tenth of a second. The timeout does double
// duty — it keeps the loop responsive and it is the deadline after which
// a lone ESC byte is treated as the Escape key rather than the start of
// an escape sequence.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a
// pre-built restore sequence directly to fd 1, then restoring termios
// from a global backup. This prevents a panic mid-write from leaving the
// user's shell in raw mode with no echo and no way to read the message.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore cooked mode without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Screen restore sequence for emergency use: reset SGR attributes, show
/// the cursor, move to the last row so the panic message prints below
/// whatever the editor last drew.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\x1b[9999;1H\r\n";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock to avoid deadlock), restores termios, then delegates to the
/// original panic handler so the error prints to a working terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
///
/// Bypasses Rust's `io::stdout()` lock to avoid deadlocking if the panic
/// occurred while the lock was held (e.g., mid-repaint).
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The raw-mode terminal session.
///
/// Call [`enter`](Self::enter) to save the current termios and switch to
/// raw mode; [`leave`](Self::leave) (or drop) restores the original
/// settings on every exit path, including panic.
///
/// # Example
///
/// ```no_run
/// use led_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// // ... read keys, repaint ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Current terminal size (cached, refresh with [`refresh_size`](Self::refresh_size)).
    size: Size,

    /// Whether we're in raw mode.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle and query the current size.
    ///
    /// Does **not** enter raw mode — call [`enter`](Self::enter) for that.
    /// Falls back to 80×24 if the terminal size cannot be determined
    /// (e.g., in tests or piped environments).
    ///
    /// # Errors
    ///
    /// Currently infallible, but returns `Result` for forward compatibility
    /// with platforms whose console setup can fail.
    pub fn new() -> io::Result<Self> {
        let size = get_size().unwrap_or(Size { cols: 80, rows: 24 });

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        })
    }

    /// Current terminal size (columns, rows).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the OS.
    ///
    /// Returns the updated size and caches it internally.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Whether we're currently in raw mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter the raw-mode session.
    ///
    /// Installs the panic hook, saves the current termios, switches to raw
    /// mode, and clears the screen with the cursor at the home position.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        // Install the panic hook (once per process).
        install_panic_hook();

        // Enable raw mode (no-op if not a TTY).
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        crate::screen::clear(&mut lock)?;
        lock.flush()?;

        self.active = true;
        Ok(())
    }

    /// Leave the session and restore the terminal.
    ///
    /// Clears the screen, re-shows the cursor, and restores the saved
    /// termios. Idempotent: calling `leave()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        crate::screen::clear(&mut lock)?;
        crate::screen::cursor_show(&mut lock)?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    /// Read raw input bytes into `buf`, waiting at most a tenth of a second.
    ///
    /// Returns the number of bytes read; `0` means the timeout expired with
    /// no input (the caller's cue to flush a pending lone ESC). Only
    /// meaningful inside an active session — raw mode's `VMIN=0`/`VTIME=1`
    /// is what gives the read its deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    #[cfg(unix)]
    pub fn read_input(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        debug_assert!(self.active, "read_input outside an active session");

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(err);
        }

        #[allow(clippy::cast_sign_loss)] // n >= 0 guaranteed above.
        let read = n as usize;
        Ok(read)
    }

    #[cfg(not(unix))]
    pub fn read_input(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use std::io::Read;
        debug_assert!(self.active, "read_input outside an active session");
        io::stdin().lock().read(buf)
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save original for restore.
            self.original_termios = Some(termios);

            // Also save to global backup for the panic hook.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // Disable all line processing: no flow control, no CR
            // translation, no echo, no canonical buffering, no signals.
            termios.c_iflag &= !(libc::BRKINT
                | libc::INPCK
                | libc::ISTRIP
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag |= libc::CS8;

            // VMIN=0, VTIME=1: reads return immediately when bytes are
            // available, or empty after a tenth of a second.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            // Clear the global backup — we've restored successfully.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
