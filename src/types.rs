//! Small ambient types shared across the facade and adapters.

use std::str::FromStr;

use uuid::Uuid;

/// Opaque session identity, matching the host app's use of `uuid::Uuid`
/// for agent identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of agent CLIs this crate knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    ClaudeTui,
    ClaudeStream,
    CodexStream,
    CodexTui,
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude_tui" => Ok(Self::ClaudeTui),
            "claude_stream" => Ok(Self::ClaudeStream),
            "codex_stream" => Ok(Self::CodexStream),
            "codex_tui" => Ok(Self::CodexTui),
            other => Err(format!("unknown agent kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn session_id_display_is_not_empty() {
        assert!(!SessionId::new().to_string().is_empty());
    }

    #[test]
    fn agent_kind_parses_known_strings() {
        assert_eq!(AgentKind::from_str("claude_tui").unwrap(), AgentKind::ClaudeTui);
        assert_eq!(AgentKind::from_str("codex_stream").unwrap(), AgentKind::CodexStream);
    }

    #[test]
    fn agent_kind_rejects_unknown_strings() {
        assert!(AgentKind::from_str("something_else").is_err());
    }
}
