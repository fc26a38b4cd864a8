//! The semantic event vocabulary every adapter converts its raw stream into.
//!
//! Shape follows the hub's event enums elsewhere in this codebase: a single
//! tagged variant with builder constructors and `is_*` predicates, plus
//! per-variant unit tests rather than one generic round-trip test.

/// A semantic event produced by an agent adapter's parser.
///
/// Events are values - cheap to clone and copied to each subscriber of the
/// facade's broadcast channel, never shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// The agent has finished initializing and is ready for input.
    Ready,
    /// Raw passthrough for consumers that want the unprocessed stream.
    Output { text: String },
    /// A plain message from the agent.
    Message { text: String },
    /// A reasoning/thinking trace.
    Thinking { text: String },
    /// A tool invocation started.
    ToolStart { tool: String, input: String },
    /// A tool invocation completed.
    ///
    /// The TUI adapter cannot reliably attribute a sub-item line to a prior
    /// `tool-start` without tighter coupling to the target CLI's internals,
    /// so its `tool` field is always `"unknown"` - do not invent an
    /// attribution the screen reader did not observe.
    ToolEnd { tool: String, output: String },
    /// A shell command was run (Codex `command_execution` items).
    CommandRun { command: String },
    /// The agent is asking permission to use a tool.
    PermissionRequest { tool: String, details: String },
    /// The agent is asking the user a question (TUI interactive menus).
    Question { text: String },
    /// An error surfaced by the agent or the parser.
    Error { text: String },
    /// The current turn has completed.
    TaskComplete,
}

impl AgentEvent {
    #[must_use]
    pub fn output(text: impl Into<String>) -> Self {
        Self::Output { text: text.into() }
    }

    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message { text: text.into() }
    }

    #[must_use]
    pub fn thinking(text: impl Into<String>) -> Self {
        Self::Thinking { text: text.into() }
    }

    #[must_use]
    pub fn tool_start(tool: impl Into<String>, input: impl Into<String>) -> Self {
        Self::ToolStart {
            tool: tool.into(),
            input: input.into(),
        }
    }

    #[must_use]
    pub fn tool_end(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self::ToolEnd {
            tool: tool.into(),
            output: output.into(),
        }
    }

    #[must_use]
    pub fn command_run(command: impl Into<String>) -> Self {
        Self::CommandRun {
            command: command.into(),
        }
    }

    #[must_use]
    pub fn permission_request(tool: impl Into<String>, details: impl Into<String>) -> Self {
        Self::PermissionRequest {
            tool: tool.into(),
            details: details.into(),
        }
    }

    #[must_use]
    pub fn question(text: impl Into<String>) -> Self {
        Self::Question { text: text.into() }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    #[must_use]
    pub fn is_task_complete(&self) -> bool {
        matches!(self, Self::TaskComplete)
    }

    #[must_use]
    pub fn is_tool_start(&self) -> bool {
        matches!(self, Self::ToolStart { .. })
    }

    #[must_use]
    pub fn is_tool_end(&self) -> bool {
        matches!(self, Self::ToolEnd { .. })
    }
}
