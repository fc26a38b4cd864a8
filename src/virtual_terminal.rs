//! Headless terminal emulator.
//!
//! Wraps `alacritty_terminal`'s VTE state machine with no rendering
//! backend: nothing here ever draws to a real terminal, it only tracks
//! cell state so the screen reader can read it back out as plain text.

use alacritty_terminal::event::{Event, EventListener};
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::index::{Column, Line, Point};
use alacritty_terminal::term::cell::Flags;
use alacritty_terminal::term::{Config, Term};
use alacritty_terminal::vte::ansi::Processor;

use crate::constants::{DEFAULT_COLS, DEFAULT_ROWS};

/// [`Term`] needs a listener type; this one drops every event. Nothing in
/// this subsystem reacts to title changes, bells, or clipboard requests -
/// the screen reader polls grid state directly instead.
#[derive(Clone, Default)]
pub struct NoopListener;

impl EventListener for NoopListener {
    fn send_event(&self, _event: Event) {}
}

/// Grid dimensions, decoupled from the real PTY size so scrollback depth is
/// configurable independently of the viewport.
#[derive(Debug, Clone, Copy)]
struct TermSize {
    columns: usize,
    screen_lines: usize,
    scrollback_lines: usize,
}

impl Dimensions for TermSize {
    fn total_lines(&self) -> usize {
        self.screen_lines + self.scrollback_lines
    }

    fn screen_lines(&self) -> usize {
        self.screen_lines
    }

    fn columns(&self) -> usize {
        self.columns
    }
}

/// A headless terminal: feed it raw PTY bytes, read plain-text lines back.
pub struct VirtualTerminal {
    term: Term<NoopListener>,
    parser: Processor,
    scrollback_lines: usize,
}

impl VirtualTerminal {
    /// Create a new terminal of `cols × rows` with `scrollback_lines` of
    /// history retained beyond the viewport.
    #[must_use]
    pub fn new(rows: u16, cols: u16, scrollback_lines: usize) -> Self {
        let size = TermSize {
            columns: cols as usize,
            screen_lines: rows as usize,
            scrollback_lines,
        };
        let config = Config {
            scrolling_history: scrollback_lines,
            kitty_keyboard: false,
            ..Config::default()
        };
        let term = Term::new(config, &size, NoopListener);
        Self {
            term,
            parser: Processor::new(),
            scrollback_lines,
        }
    }

    /// Create a terminal using the documented default size.
    #[must_use]
    pub fn with_defaults(scrollback_lines: usize) -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS, scrollback_lines)
    }

    /// Feed raw bytes (straight from the PTY) through the VTE parser.
    pub fn write(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.term, bytes);
    }

    /// Resize the viewport, preserving scrollback depth.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let size = TermSize {
            columns: cols as usize,
            screen_lines: rows as usize,
            scrollback_lines: self.scrollback_lines,
        };
        self.term.resize(size);
    }

    /// Number of viewport rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.term.screen_lines()
    }

    /// Number of viewport columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.term.columns()
    }

    /// The current viewport, exactly `rows()` strings, trailing blanks
    /// trimmed from each line.
    #[must_use]
    pub fn get_screen(&self) -> Vec<String> {
        let rows = self.rows();
        (0..rows).map(|row| self.render_line(Line(row as i32))).collect()
    }

    /// Scrollback followed by the current viewport, oldest line first.
    ///
    /// Depth beyond `scrollback_lines` configured at construction is
    /// unavailable - the grid itself only retains that many history lines.
    #[must_use]
    pub fn get_full_buffer(&self) -> Vec<String> {
        let grid = self.term.grid();
        let history_len = grid.history_size();
        let rows = self.rows();
        let top = -(history_len as i32);
        (top..rows as i32).map(|row| self.render_line(Line(row))).collect()
    }

    /// Whether the line at absolute row `line` soft-wraps into the next
    /// row, i.e. it ends mid-logical-line rather than at a hard newline.
    #[must_use]
    pub fn is_wrapped(&self, line: i32) -> bool {
        let grid = self.term.grid();
        let row = &grid[Line(line)];
        row.flags.contains(Flags::WRAPLINE)
    }

    /// Same as [`Self::is_wrapped`], but addressed by an index into a
    /// `get_full_buffer()`-shaped slice of length `full_len` rather than an
    /// absolute grid line - the caller of `extract_content_blocks` only
    /// ever has the former.
    #[must_use]
    pub fn is_wrapped_in_buffer(&self, row_idx: usize, full_len: usize) -> bool {
        let offset = full_len.saturating_sub(self.rows());
        let absolute = row_idx as i32 - offset as i32;
        self.is_wrapped(absolute)
    }

    fn render_line(&self, line: Line) -> String {
        let grid = self.term.grid();
        let cols = self.cols();
        let row = &grid[line];
        let mut out = String::with_capacity(cols);
        let mut col = 0usize;
        while col < cols {
            let cell = &row[Column(col)];
            if cell.flags.contains(Flags::WIDE_CHAR_SPACER) {
                col += 1;
                continue;
            }
            out.push(cell.c);
            for zerowidth in cell.zerowidth().into_iter().flatten() {
                out.push(*zerowidth);
            }
            col += 1;
        }
        while out.ends_with(' ') {
            out.pop();
        }
        out
    }

    /// The absolute row index of the cursor, for adapters that need to
    /// anchor a search (e.g. the footer scan) relative to where the cursor
    /// currently sits rather than the bottom of the viewport.
    #[must_use]
    pub fn cursor_point(&self) -> Point {
        self.term.grid().cursor.point
    }
}
