//! Codex's `exec --json` output format adapter.

use std::collections::HashMap;

use serde_json::Value;

use super::{Adapter, SpawnOptions};
use crate::event::AgentEvent;
use crate::json_lines::JsonLinesParser;

pub struct CodexStreamAdapter {
    parser: JsonLinesParser<AgentEvent>,
}

impl CodexStreamAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: JsonLinesParser::new(map_line).with_non_json_handler(|line| vec![AgentEvent::output(line)]),
        }
    }
}

impl Default for CodexStreamAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for CodexStreamAdapter {
    fn binary(&self) -> &'static str {
        "codex"
    }

    fn build_args(&self, opts: &SpawnOptions) -> Vec<String> {
        let mut args = vec!["exec".to_string(), "--json".to_string(), "--full-auto".to_string()];
        args.extend(opts.extra_args.iter().cloned());
        args.push(opts.prompt.clone().unwrap_or_default());
        args
    }

    fn build_env(&self, _opts: &SpawnOptions) -> HashMap<String, String> {
        HashMap::new()
    }

    fn interactive_prompt(&self) -> bool {
        false
    }

    fn feed(&mut self, chunk: &[u8]) -> Vec<AgentEvent> {
        self.parser.feed(chunk)
    }
}

fn map_line(value: Value) -> Vec<AgentEvent> {
    match value.get("type").and_then(Value::as_str) {
        Some("thread.started") => vec![AgentEvent::Ready],
        Some("turn.started") => Vec::new(),
        Some("turn.completed") => vec![AgentEvent::TaskComplete],
        Some("error") => {
            let message = value.get("message").and_then(Value::as_str).unwrap_or_default();
            vec![AgentEvent::error(message)]
        }
        Some("item.started") => map_item_started(value.get("item")),
        Some("item.completed") => map_item_completed(value.get("item")),
        _ => Vec::new(),
    }
}

fn map_item_started(item: Option<&Value>) -> Vec<AgentEvent> {
    let Some(item) = item else { return Vec::new() };
    match item.get("type").and_then(Value::as_str) {
        Some("command_execution") => {
            let command = item.get("command").and_then(Value::as_str).unwrap_or_default();
            vec![AgentEvent::tool_start("command", command), AgentEvent::command_run(command)]
        }
        Some("mcp_tool_call") => {
            let name = item.get("name").and_then(Value::as_str).unwrap_or("unknown");
            let arguments = item.get("arguments").map(ToString::to_string).unwrap_or_default();
            vec![AgentEvent::tool_start(name, arguments)]
        }
        _ => Vec::new(),
    }
}

fn map_item_completed(item: Option<&Value>) -> Vec<AgentEvent> {
    let Some(item) = item else { return Vec::new() };
    match item.get("type").and_then(Value::as_str) {
        Some("reasoning") => {
            let text = item.get("text").and_then(Value::as_str).unwrap_or_default();
            vec![AgentEvent::thinking(text)]
        }
        Some("command_execution") => {
            let output = item.get("aggregated_output").and_then(Value::as_str).unwrap_or_default();
            vec![AgentEvent::tool_end("command", output)]
        }
        Some("mcp_tool_call") => {
            let name = item.get("name").and_then(Value::as_str).unwrap_or("unknown");
            let output = item.get("output").map(ToString::to_string).unwrap_or_default();
            vec![AgentEvent::tool_end(name, output)]
        }
        Some("agent_message") => {
            let text = item.get("text").and_then(Value::as_str).unwrap_or_default();
            vec![AgentEvent::message(text)]
        }
        Some("error") => {
            let text = item.get("text").and_then(Value::as_str).unwrap_or_default();
            vec![AgentEvent::error(text)]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args_places_prompt_last() {
        let adapter = CodexStreamAdapter::new();
        let opts = SpawnOptions {
            prompt: Some("add tests".to_string()),
            ..Default::default()
        };
        let args = adapter.build_args(&opts);
        assert_eq!(args, vec!["exec", "--json", "--full-auto", "add tests"]);
    }

    #[test]
    fn happy_path_scenario_produces_expected_event_sequence() {
        let mut adapter = CodexStreamAdapter::new();
        let input = concat!(
            "{\"type\":\"thread.started\",\"thread_id\":\"t1\"}\n",
            "{\"type\":\"item.started\",\"item\":{\"id\":\"i1\",\"type\":\"command_execution\",\"command\":\"echo hi\",\"status\":\"in_progress\"}}\n",
            "{\"type\":\"item.completed\",\"item\":{\"id\":\"i1\",\"type\":\"command_execution\",\"command\":\"echo hi\",\"aggregated_output\":\"hi\\n\",\"exit_code\":0,\"status\":\"completed\"}}\n",
            "{\"type\":\"item.completed\",\"item\":{\"id\":\"i2\",\"type\":\"agent_message\",\"text\":\"Done.\"}}\n",
            "{\"type\":\"turn.completed\"}\n",
        );
        let events = adapter.feed(input.as_bytes());

        assert!(matches!(events[0], AgentEvent::Ready));
        match &events[1] {
            AgentEvent::ToolStart { tool, input } => {
                assert_eq!(tool, "command");
                assert_eq!(input, "echo hi");
            }
            other => panic!("expected ToolStart, got {other:?}"),
        }
        match &events[2] {
            AgentEvent::CommandRun { command } => assert_eq!(command, "echo hi"),
            other => panic!("expected CommandRun, got {other:?}"),
        }
        match &events[3] {
            AgentEvent::ToolEnd { tool, output } => {
                assert_eq!(tool, "command");
                assert_eq!(output, "hi\n");
            }
            other => panic!("expected ToolEnd, got {other:?}"),
        }
        match &events[4] {
            AgentEvent::Message { text } => assert_eq!(text, "Done."),
            other => panic!("expected Message, got {other:?}"),
        }
        assert!(matches!(events[5], AgentEvent::TaskComplete));
    }

    #[test]
    fn chunk_boundary_split_produces_identical_events() {
        let input = "{\"type\":\"thread.started\",\"thread_id\":\"t1\"}\n{\"type\":\"turn.completed\"}\n";

        let mut whole_adapter = CodexStreamAdapter::new();
        let whole = whole_adapter.feed(input.as_bytes());

        let mut split_adapter = CodexStreamAdapter::new();
        let mut split = split_adapter.feed(&input.as_bytes()[..15]);
        split.extend(split_adapter.feed(&input.as_bytes()[15..]));

        assert_eq!(whole.len(), split.len());
        for (a, b) in whole.iter().zip(split.iter()) {
            assert_eq!(format!("{a:?}"), format!("{b:?}"));
        }
    }

    #[test]
    fn top_level_error_becomes_error_event() {
        let mut adapter = CodexStreamAdapter::new();
        let events = adapter.feed(b"{\"type\":\"error\",\"message\":\"boom\"}\n");
        match &events[0] {
            AgentEvent::Error { text } => assert_eq!(text, "boom"),
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
