//! Claude's `stream-json` output format adapter.

use std::collections::HashMap;

use serde_json::Value;

use super::{Adapter, SpawnOptions};
use crate::event::AgentEvent;
use crate::json_lines::JsonLinesParser;

pub struct ClaudeStreamAdapter {
    parser: JsonLinesParser<AgentEvent>,
}

impl ClaudeStreamAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: JsonLinesParser::new(map_line).with_non_json_handler(|line| vec![AgentEvent::output(line)]),
        }
    }
}

impl Default for ClaudeStreamAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for ClaudeStreamAdapter {
    fn binary(&self) -> &'static str {
        "claude"
    }

    fn build_args(&self, opts: &SpawnOptions) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            "--verbose".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
        ];
        args.extend(opts.extra_args.iter().cloned());
        if !opts.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(opts.allowed_tools.join(","));
        }
        args.push("--".to_string());
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
        Some("system") if value.get("subtype").and_then(Value::as_str) == Some("init") => {
            vec![AgentEvent::Ready]
        }
        Some("assistant") => map_assistant_blocks(&value),
        Some("user") => map_user_blocks(&value),
        Some("result") => vec![AgentEvent::TaskComplete],
        _ => Vec::new(),
    }
}

fn map_assistant_blocks(value: &Value) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    let Some(blocks) = value.pointer("/message/content").and_then(Value::as_array) else {
        return events;
    };
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                if let Some(text) = block.get("text").and_then(Value::as_str) {
                    events.push(AgentEvent::message(text));
                }
            }
            Some("tool_use") => {
                let name = block.get("name").and_then(Value::as_str).unwrap_or("unknown");
                let input = block.get("input").map(ToString::to_string).unwrap_or_default();
                events.push(AgentEvent::tool_start(name, input));
            }
            Some("thinking") => {
                if let Some(text) = block.get("thinking").and_then(Value::as_str) {
                    events.push(AgentEvent::thinking(text));
                }
            }
            _ => {}
        }
    }
    events
}

fn map_user_blocks(value: &Value) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    let Some(blocks) = value.pointer("/message/content").and_then(Value::as_array) else {
        return events;
    };
    for block in blocks {
        if block.get("type").and_then(Value::as_str) == Some("tool_result") {
            let id = block.get("tool_use_id").and_then(Value::as_str).unwrap_or("unknown");
            let content = block.get("content").and_then(Value::as_str).unwrap_or_default();
            events.push(AgentEvent::tool_end(id, content));
        }
    }
    events
}
