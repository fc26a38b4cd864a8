//! Events broadcast by a PTY session to its subscribers.
//!
//! Sent via `tokio::sync::broadcast`, the same pub/sub mechanism used
//! elsewhere in this codebase for PTY output: the session emits without
//! knowing who is subscribed, and each subscriber gets its own receiver.

use bytes::Bytes;

/// A raw-layer event broadcast by a running [`super::PtySession`].
#[derive(Debug, Clone)]
pub enum PtyEvent {
    /// Raw output bytes read from the PTY, after the debugger-banner filter.
    ///
    /// `Bytes` rather than `Vec<u8>`: every subscriber's `broadcast::Receiver`
    /// gets its own clone of each event, and a reference-counted buffer
    /// makes that fan-out allocation-free.
    Output(Bytes),
    /// The PTY was resized.
    Resized { rows: u16, cols: u16 },
    /// The child process exited.
    Exited { code: Option<i32>, signal: Option<String> },
}

impl PtyEvent {
    #[must_use]
    pub fn output(data: impl Into<Bytes>) -> Self {
        Self::Output(data.into())
    }

    #[must_use]
    pub fn resized(rows: u16, cols: u16) -> Self {
        Self::Resized { rows, cols }
    }

    #[must_use]
    pub fn exited(code: Option<i32>, signal: Option<String>) -> Self {
        Self::Exited { code, signal }
    }

    #[must_use]
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    #[must_use]
    pub fn is_exited(&self) -> bool {
        matches!(self, Self::Exited { .. })
    }
}
