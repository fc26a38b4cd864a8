//! Error taxonomy for the agent terminal subsystem.
//!
//! Spawn-time failures are the only unconditionally fatal condition in this
//! crate and are the only ones worth a dedicated type; everything else
//! downstream of a running session is absorbed and expressed as `error`
//! events or `output` passthrough rather than a `Result`.

use std::fmt;

/// Failure surfaced synchronously from [`crate::facade::AgentTerminal::spawn`].
///
/// No session is registered when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// The requested agent kind has no registered adapter.
    UnknownAgent(String),
    /// The agent binary could not be found or executed.
    BinaryNotFound(String),
    /// The PTY could not be allocated.
    PtyAllocationFailed(String),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAgent(agent) => write!(f, "unknown agent kind: {agent}"),
            Self::BinaryNotFound(bin) => write!(f, "agent binary not found: {bin}"),
            Self::PtyAllocationFailed(reason) => write!(f, "failed to allocate PTY: {reason}"),
        }
    }
}

impl std::error::Error for SpawnError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_agent_display_names_the_agent() {
        let err = SpawnError::UnknownAgent("gremlin".to_string());
        assert_eq!(err.to_string(), "unknown agent kind: gremlin");
    }

    #[test]
    fn binary_not_found_display_names_the_binary() {
        let err = SpawnError::BinaryNotFound("claude".to_string());
        assert_eq!(err.to_string(), "agent binary not found: claude");
    }

    #[test]
    fn pty_allocation_failed_carries_the_reason() {
        let err = SpawnError::PtyAllocationFailed("out of ptys".to_string());
        assert_eq!(err.to_string(), "failed to allocate PTY: out of ptys");
    }
}
