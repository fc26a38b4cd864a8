//! PTY-backed terminal subsystem for running AI coding agents and
//! normalizing their output into semantic events.
//!
//! [`facade::AgentTerminal`] is the entry point: spawn a session, subscribe
//! to its [`event::AgentEvent`] stream, drive it with `send`/`interrupt`/
//! `kill`. Everything else in this crate exists to make that facade honest:
//! [`pty`] owns the child process, [`virtual_terminal`] and [`screen_reader`]
//! turn its raw bytes into readable screens for the full-screen agents,
//! [`json_lines`] does the same for the streaming ones, and [`adapter`]
//! picks which of those strategies a given agent kind needs.

pub mod adapter;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod facade;
pub mod json_lines;
pub mod output_modes;
pub mod pty;
pub mod screen_reader;
pub mod tui_parser;
pub mod types;
pub mod virtual_terminal;

pub use config::Config;
pub use error::SpawnError;
pub use event::AgentEvent;
pub use facade::{AgentTerminal, SpawnRequest};
pub use types::{AgentKind, SessionId};
