//! Codex's full-screen TUI adapter.
//!
//! Stub: argv matches the Codex stream adapter minus `--json`, but the
//! parser is not currently required to emit semantic events, only raw
//! passthrough. A future implementation would apply the same
//! screen-reader pipeline the Claude TUI adapter uses.

use std::collections::HashMap;

use super::{Adapter, SpawnOptions};
use crate::event::AgentEvent;

#[derive(Default)]
pub struct CodexTuiAdapter;

impl CodexTuiAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for CodexTuiAdapter {
    fn binary(&self) -> &'static str {
        "codex"
    }

    fn build_args(&self, opts: &SpawnOptions) -> Vec<String> {
        let mut args = vec!["exec".to_string(), "--full-auto".to_string()];
        args.extend(opts.extra_args.iter().cloned());
        if let Some(prompt) = &opts.prompt {
            args.push(prompt.clone());
        }
        args
    }

    fn build_env(&self, _opts: &SpawnOptions) -> HashMap<String, String> {
        HashMap::new()
    }

    fn interactive_prompt(&self) -> bool {
        false
    }

    fn feed(&mut self, chunk: &[u8]) -> Vec<AgentEvent> {
        vec![AgentEvent::output(String::from_utf8_lossy(chunk).into_owned())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args_omits_json_flag() {
        let adapter = CodexTuiAdapter::new();
        let opts = SpawnOptions::default();
        let args = adapter.build_args(&opts);
        assert!(!args.iter().any(|a| a == "--json"));
        assert!(args.contains(&"--full-auto".to_string()));
    }

    #[test]
    fn feed_only_passes_through_raw_output() {
        let mut adapter = CodexTuiAdapter::new();
        let events = adapter.feed(b"raw bytes");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], AgentEvent::Output { text } if text == "raw bytes"));
    }
}
