//! Per-agent strategies: build argv/env, convert a raw byte stream to
//! semantic events.
//!
//! Closed set, dispatched through a shared trait the way the host app
//! dispatches transport strategies through its `Channel` trait - a small,
//! fixed set of implementations rather than an open plugin system.

pub mod claude_stream;
pub mod claude_tui;
pub mod codex_stream;
pub mod codex_tui;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub use claude_stream::ClaudeStreamAdapter;
pub use claude_tui::ClaudeTuiAdapter;
pub use codex_stream::CodexStreamAdapter;
pub use codex_tui::CodexTuiAdapter;

use crate::event::AgentEvent;
use crate::types::AgentKind;

/// What the facade asked an agent to do, passed to `build_args`/`build_env`.
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    pub cwd: PathBuf,
    pub prompt: Option<String>,
    pub allowed_tools: Vec<String>,
    pub extra_args: Vec<String>,
}

/// A per-agent command/parsing strategy.
///
/// Stateless regarding argv construction; stateful regarding parsing -
/// each session owns its own `Adapter` instance so the inner parser (a
/// `JsonLinesParser` or a `TuiParser`) is exclusively theirs.
pub trait Adapter: Send {
    /// The binary name to spawn (`claude`, `codex`).
    fn binary(&self) -> &'static str;

    /// The arguments to spawn with, not including the binary name itself.
    fn build_args(&self, opts: &SpawnOptions) -> Vec<String>;

    /// Extra environment variables to set on the child, merged on top of
    /// the inherited environment.
    fn build_env(&self, opts: &SpawnOptions) -> HashMap<String, String>;

    /// Whether the facade should type `opts.prompt` into the PTY once the
    /// adapter's first `ready` event is observed, rather than passing it
    /// as an argv element.
    fn interactive_prompt(&self) -> bool;

    /// Feed one chunk of raw bytes, returning the events it produced.
    fn feed(&mut self, chunk: &[u8]) -> Vec<AgentEvent>;

    /// Timer-driven follow-up, for adapters whose state machine needs an
    /// idle-timeout escape hatch (the TUI adapters). Stream adapters have
    /// no notion of time-based transitions and use the default no-op.
    fn tick(&mut self) -> Vec<AgentEvent> {
        Vec::new()
    }
}

/// Construct the adapter for a given agent kind, with TUI adapters sized
/// to the requested PTY dimensions, scrollback depth, and idle timeout.
#[must_use]
pub fn build_adapter(
    kind: AgentKind,
    rows: u16,
    cols: u16,
    scrollback_lines: usize,
    idle_timeout: Duration,
) -> Box<dyn Adapter> {
    match kind {
        AgentKind::ClaudeStream => Box::new(ClaudeStreamAdapter::new()),
        AgentKind::CodexStream => Box::new(CodexStreamAdapter::new()),
        AgentKind::ClaudeTui => {
            Box::new(ClaudeTuiAdapter::with_idle_timeout(rows, cols, scrollback_lines, idle_timeout))
        }
        AgentKind::CodexTui => Box::new(CodexTuiAdapter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_adapter_dispatches_on_kind() {
        let a = build_adapter(AgentKind::ClaudeStream, 30, 80, 200, Duration::from_secs(3));
        assert_eq!(a.binary(), "claude");
        let b = build_adapter(AgentKind::CodexStream, 30, 80, 200, Duration::from_secs(3));
        assert_eq!(b.binary(), "codex");
    }
}
