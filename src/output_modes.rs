//! Optional stream transformer producing a clean, answer-only view over
//! the event stream.
//!
//! Grounded in shape on `agent/screen.rs`'s "pure transform over terminal
//! state" style: a small state machine with no I/O of its own, fed one
//! event at a time by whatever is consuming the facade's broadcast
//! channel.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::constants::{PRIMARY_MARKER, SUB_MARKER};
use crate::event::AgentEvent;

static CURSOR_FORWARD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[(\d+)C").unwrap());
static OSC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\][^\x07\x1b]*(\x07|\x1b\\)").unwrap());
static CSI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap());

const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const TRAILING_CHROME: &[&str] = &["(esc to interrupt)", "(esc to cancel)", "ctrl+b to run in background"];

/// Converts ANSI CSI/OSC noise to plain text, converting cursor-forward
/// moves to spaces first so word boundaries in the target TUIs survive.
#[must_use]
pub fn strip_chrome(text: &str) -> String {
    let with_spaces = CURSOR_FORWARD_RE.replace_all(text, |caps: &Captures| {
        let n: usize = caps[1].parse().unwrap_or(0);
        " ".repeat(n)
    });
    let without_osc = OSC_RE.replace_all(&with_spaces, "");
    let without_csi = CSI_RE.replace_all(&without_osc, "");

    let kept: Vec<String> = without_csi
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with(PRIMARY_MARKER) || trimmed.starts_with(SUB_MARKER)
        })
        .filter_map(strip_trailing_chrome)
        .collect();

    kept.join("\n")
}

fn strip_trailing_chrome(line: &str) -> Option<String> {
    let mut t = line.trim_end().to_string();

    for phrase in TRAILING_CHROME {
        if let Some(stripped) = t.strip_suffix(phrase) {
            t = stripped.trim_end().to_string();
        }
    }

    while t.ends_with(|c: char| SPINNER_CHARS.contains(&c)) || t.ends_with(' ') {
        t.pop();
    }

    let body = t.trim_start_matches([PRIMARY_MARKER, SUB_MARKER]).trim();
    if body.is_empty() {
        None
    } else {
        Some(t.trim().to_string())
    }
}

/// A small state machine converting `AgentEvent`s into an answer-only text
/// stream, one event at a time.
#[derive(Debug, Default)]
pub struct OutputMode {
    processing: bool,
}

impl OutputMode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event, returning text to emit, if any.
    pub fn push(&mut self, event: &AgentEvent) -> Option<String> {
        match event {
            AgentEvent::Ready | AgentEvent::TaskComplete => {
                self.processing = false;
                None
            }
            AgentEvent::ToolStart { .. } | AgentEvent::Thinking { .. } => {
                self.processing = true;
                None
            }
            AgentEvent::Message { text } => {
                self.processing = true;
                Some(text.clone())
            }
            AgentEvent::Output { text } => {
                let clean = strip_chrome(text);
                if clean.is_empty() {
                    return None;
                }
                if self.processing {
                    Some(clean)
                } else {
                    self.processing = true;
                    Some(clean)
                }
            }
            _ => None,
        }
    }
}

/// Run a full event sequence through a fresh [`OutputMode`], collecting
/// every emitted string in order.
#[must_use]
pub fn create_answer_stream(events: &[AgentEvent]) -> Vec<String> {
    let mut mode = OutputMode::new();
    events.iter().filter_map(|e| mode.push(e)).collect()
}
