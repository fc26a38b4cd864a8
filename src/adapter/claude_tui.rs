//! Claude's full-screen TUI adapter, driven by the screen reader and the
//! central TUI state machine.

use std::collections::HashMap;
use std::time::Duration;

use super::{Adapter, SpawnOptions};
use crate::event::AgentEvent;
use crate::tui_parser::TuiParser;

pub struct ClaudeTuiAdapter {
    parser: TuiParser,
}

impl ClaudeTuiAdapter {
    #[must_use]
    pub fn new(rows: u16, cols: u16, scrollback_lines: usize) -> Self {
        Self {
            parser: TuiParser::new(rows, cols, scrollback_lines),
        }
    }

    #[must_use]
    pub fn with_idle_timeout(rows: u16, cols: u16, scrollback_lines: usize, idle_timeout: Duration) -> Self {
        Self {
            parser: TuiParser::with_idle_timeout(rows, cols, scrollback_lines, idle_timeout),
        }
    }
}

impl Adapter for ClaudeTuiAdapter {
    fn binary(&self) -> &'static str {
        "claude"
    }

    fn build_args(&self, opts: &SpawnOptions) -> Vec<String> {
        let mut args = opts.extra_args.clone();
        if !opts.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(opts.allowed_tools.join(","));
        }
        args
    }

    fn build_env(&self, _opts: &SpawnOptions) -> HashMap<String, String> {
        HashMap::new()
    }

    fn interactive_prompt(&self) -> bool {
        true
    }

    fn feed(&mut self, chunk: &[u8]) -> Vec<AgentEvent> {
        self.parser.feed(chunk)
    }

    fn tick(&mut self) -> Vec<AgentEvent> {
        self.parser.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_not_passed_as_an_argument() {
        let adapter = ClaudeTuiAdapter::new(30, 80, 200);
        let opts = SpawnOptions {
            prompt: Some("do the thing".to_string()),
            allowed_tools: vec!["Bash".to_string()],
            ..Default::default()
        };
        let args = adapter.build_args(&opts);
        assert!(!args.iter().any(|a| a == "do the thing"));
        assert_eq!(args, vec!["--allowedTools", "Bash"]);
    }

    #[test]
    fn interactive_prompt_is_typed_in_by_the_facade() {
        assert!(ClaudeTuiAdapter::new(30, 80, 200).interactive_prompt());
    }
}
