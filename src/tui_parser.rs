//! The central TUI state machine.
//!
//! One instance per session, owned exclusively by that session's reader
//! task - matches `AlacrittyParser`'s ownership style: `&mut self`
//! methods, no interior mutability, because nothing else ever touches it
//! concurrently.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::constants::IDLE_TIMEOUT;
use crate::event::AgentEvent;
use crate::screen_reader::{
    self, extract_content_blocks, find_footer_start, read_footer, Block, FooterSignal, FooterState,
};
use crate::virtual_terminal::VirtualTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initializing,
    Ready,
    Processing,
    Idle,
}

/// Per-session TUI parser: feed it raw bytes, get semantic events back.
pub struct TuiParser {
    state: State,
    vt: VirtualTerminal,
    seen_block_keys: HashSet<String>,
    last_footer: FooterState,
    last_processing_ts: Option<Instant>,
    prompt_seen_since_processing: bool,
    seen_processing_footer: bool,
    in_interactive_menu: bool,
    idle_timeout: Duration,
}

impl TuiParser {
    #[must_use]
    pub fn new(rows: u16, cols: u16, scrollback_lines: usize) -> Self {
        Self::with_idle_timeout(rows, cols, scrollback_lines, IDLE_TIMEOUT)
    }

    #[must_use]
    pub fn with_idle_timeout(rows: u16, cols: u16, scrollback_lines: usize, idle_timeout: Duration) -> Self {
        Self {
            state: State::Initializing,
            vt: VirtualTerminal::new(rows, cols, scrollback_lines),
            seen_block_keys: HashSet::new(),
            last_footer: FooterState {
                signal: FooterSignal::Unknown,
                has_prompt: false,
            },
            last_processing_ts: None,
            prompt_seen_since_processing: false,
            seen_processing_footer: false,
            in_interactive_menu: false,
            idle_timeout,
        }
    }

    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.vt.resize(rows, cols);
    }

    /// Feed a chunk of raw PTY bytes, returning the events it produced, in
    /// order: a raw passthrough first, then any state-transition and
    /// content events.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        events.push(AgentEvent::output(String::from_utf8_lossy(chunk).into_owned()));

        self.vt.write(chunk);
        let screen = self.vt.get_screen();

        let was_processing = self.state == State::Processing;
        let footer = read_footer(&screen);
        self.run_transitions(footer, &mut events);

        if was_processing || self.state == State::Processing {
            self.extract_content(&mut events);
        }

        self.last_footer = footer;
        events
    }

    /// Timer-driven idle check: a turn can end with the TUI redrawing a
    /// quiescent frame with no further bytes arriving, so this must be
    /// polled independently of `feed`.
    pub fn tick(&mut self) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        if self.state == State::Processing {
            self.try_idle_transition(self.last_footer, &mut events);
        }
        events
    }

    fn run_transitions(&mut self, footer: FooterState, events: &mut Vec<AgentEvent>) {
        match self.state {
            State::Initializing => {
                if footer.has_prompt {
                    self.state = State::Ready;
                    events.push(AgentEvent::Ready);
                }
            }
            State::Ready | State::Idle => {
                if footer.signal == FooterSignal::Processing {
                    self.state = State::Processing;
                    self.prompt_seen_since_processing = false;
                    self.seen_processing_footer = true;
                    self.last_processing_ts = Some(Instant::now());
                }
            }
            State::Processing => {
                if footer.has_prompt {
                    self.prompt_seen_since_processing = true;
                }
                if footer.signal == FooterSignal::Processing {
                    self.last_processing_ts = Some(Instant::now());
                    self.seen_processing_footer = true;
                }

                if footer.signal == FooterSignal::InteractiveMenu && !self.in_interactive_menu {
                    events.push(AgentEvent::question(""));
                    self.in_interactive_menu = true;
                } else if self.in_interactive_menu && footer.signal != FooterSignal::InteractiveMenu {
                    self.in_interactive_menu = false;
                }

                self.try_idle_transition(footer, events);
            }
        }
    }

    fn try_idle_transition(&mut self, footer: FooterState, events: &mut Vec<AgentEvent>) {
        if footer.signal == FooterSignal::Permission || footer.signal == FooterSignal::InteractiveMenu {
            return;
        }
        if !self.seen_processing_footer {
            return;
        }

        let timed_out = self
            .last_processing_ts
            .is_some_and(|ts| ts.elapsed() > self.idle_timeout);

        if self.prompt_seen_since_processing && (footer.signal == FooterSignal::Idle || timed_out) {
            self.state = State::Idle;
            events.push(AgentEvent::TaskComplete);
        }
    }

    fn extract_content(&mut self, events: &mut Vec<AgentEvent>) {
        let full = self.vt.get_full_buffer();
        let footer_start = find_footer_start(&full);
        let full_len = full.len();
        let vt = &self.vt;
        let blocks: Vec<Block> =
            extract_content_blocks(&full, |row_idx| vt.is_wrapped_in_buffer(row_idx, full_len), footer_start);

        for block in blocks {
            let Some(normalized) = screen_reader::normalize_block_text(&block.text) else {
                continue;
            };
            let key = Block::key(block.marker, &normalized);
            if self.seen_block_keys.contains(&key) {
                continue;
            }
            self.seen_block_keys.insert(key);
            if let Some(event) = screen_reader::block_to_event(block.marker, &normalized) {
                events.push(event);
            }
        }
    }
}
