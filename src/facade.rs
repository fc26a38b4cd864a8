//! Agent Terminal: the facade tracking live sessions.
//!
//! Tracks every live session in a mutex-protected registry and multicasts
//! both its raw and semantic event streams to any number of subscribers,
//! adapted to an async mutex since `spawn`/`kill` here do real async work
//! (opening a PTY, spawning tasks) rather than being largely synchronous.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::adapter::{self, Adapter, SpawnOptions};
use crate::config::Config;
use crate::error::SpawnError;
use crate::event::AgentEvent;
use crate::pty::{PtyEvent, PtySession, PtySessionState};
use crate::types::{AgentKind, SessionId};

/// What the caller asks for when starting a new agent.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub agent: AgentKind,
    pub cwd: PathBuf,
    pub prompt: Option<String>,
    pub allowed_tools: Vec<String>,
    pub extra_args: Vec<String>,
}

struct SessionHandle {
    pty: Arc<PtySession>,
    events_tx: broadcast::Sender<AgentEvent>,
}

type Registry = Arc<Mutex<HashMap<SessionId, SessionHandle>>>;

/// Tracks every live session, routes spawn requests to the right adapter,
/// and multicasts both the raw and the semantic event streams.
pub struct AgentTerminal {
    config: Config,
    sessions: Registry,
}

impl AgentTerminal {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a new agent session, returning its id once the PTY has
    /// started and the adapter's argv/env have been applied.
    pub async fn spawn(&self, request: SpawnRequest) -> Result<SessionId, SpawnError> {
        let mut adapter = adapter::build_adapter(
            request.agent,
            self.config.default_rows,
            self.config.default_cols,
            self.config.scrollback_lines,
            std::time::Duration::from_secs(self.config.idle_timeout_secs),
        );

        let opts = SpawnOptions {
            cwd: request.cwd.clone(),
            prompt: request.prompt.clone(),
            allowed_tools: request.allowed_tools.clone(),
            extra_args: request.extra_args.clone(),
        };

        let mut argv = vec![adapter.binary().to_string()];
        argv.extend(adapter.build_args(&opts));
        let env = adapter.build_env(&opts);

        let pty = Arc::new(PtySession::start(
            &argv,
            &request.cwd,
            &env,
            self.config.default_rows,
            self.config.default_cols,
            self.config.filter_debugger_banners,
        )?);

        let id = SessionId::new();
        let (events_tx, _) = broadcast::channel(1024);

        spawn_event_pump(
            id,
            Arc::clone(&pty),
            events_tx.clone(),
            adapter,
            Arc::clone(&self.sessions),
            std::time::Duration::from_millis(self.config.tick_interval_ms),
        );

        if adapter_wants_interactive_prompt(&self.config, request.agent) {
            if let Some(prompt) = opts.prompt.clone() {
                spawn_prompt_typer(Arc::clone(&pty), events_tx.subscribe(), prompt);
            }
        }

        let mut sessions = self.sessions.lock().await;
        sessions.insert(id, SessionHandle { pty, events_tx });

        Ok(id)
    }

    /// Subscribe to a session's semantic event stream.
    pub async fn events(&self, id: SessionId) -> Option<broadcast::Receiver<AgentEvent>> {
        let sessions = self.sessions.lock().await;
        sessions.get(&id).map(|s| s.events_tx.subscribe())
    }

    /// Subscribe to a session's raw byte stream.
    pub async fn raw(&self, id: SessionId) -> Option<broadcast::Receiver<PtyEvent>> {
        let sessions = self.sessions.lock().await;
        sessions.get(&id).map(|s| s.pty.subscribe())
    }

    /// Write text plus a trailing return to a session's stdin. A no-op
    /// for an unknown id.
    pub async fn send(&self, id: SessionId, text: &str) {
        let sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&id) {
            let mut bytes = text.as_bytes().to_vec();
            bytes.push(b'\r');
            session.pty.write(bytes);
        }
    }

    /// Send an interrupt (`Ctrl-C`) to a session. A no-op for an unknown
    /// id.
    pub async fn interrupt(&self, id: SessionId) {
        let sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&id) {
            session.pty.write(vec![0x03]);
        }
    }

    /// Kill a session's child process. A no-op for an unknown id.
    pub async fn kill(&self, id: SessionId) {
        let sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&id) {
            session.pty.kill();
        }
    }

    /// Kill every live session.
    pub async fn kill_all(&self) {
        let sessions = self.sessions.lock().await;
        for session in sessions.values() {
            session.pty.kill();
        }
    }

    /// The ids of every currently-registered session.
    pub async fn list(&self) -> Vec<SessionId> {
        let sessions = self.sessions.lock().await;
        sessions.keys().copied().collect()
    }

    /// A session's current state, if it is registered at all.
    pub async fn get(&self, id: SessionId) -> Option<PtySessionState> {
        let sessions = self.sessions.lock().await;
        sessions.get(&id).map(|s| s.pty.state())
    }
}

/// Only the TUI adapters need the prompt typed in after `ready`; the
/// stream adapters already bake the prompt into argv.
fn adapter_wants_interactive_prompt(_config: &Config, agent: AgentKind) -> bool {
    matches!(agent, AgentKind::ClaudeTui)
}

fn spawn_prompt_typer(pty: Arc<PtySession>, mut events_rx: broadcast::Receiver<AgentEvent>, prompt: String) {
    tokio::spawn(async move {
        while let Ok(event) = events_rx.recv().await {
            if event.is_ready() {
                let mut bytes = prompt.into_bytes();
                bytes.push(b'\r');
                pty.write(bytes);
                break;
            }
        }
    });
}

/// Feeds raw PTY bytes into the adapter and republishes its events, and
/// drives `adapter.tick()` on a timer alongside it - a turn can end with the
/// TUI redrawing a quiescent frame with no further bytes ever arriving, so
/// idle detection can't rely on `feed` alone.
fn spawn_event_pump(
    id: SessionId,
    pty: Arc<PtySession>,
    events_tx: broadcast::Sender<AgentEvent>,
    mut adapter: Box<dyn Adapter>,
    sessions: Registry,
    tick_interval: std::time::Duration,
) {
    tokio::spawn(async move {
        let mut raw_rx = pty.subscribe();
        let mut ticker = tokio::time::interval(tick_interval);
        loop {
            tokio::select! {
                raw = raw_rx.recv() => {
                    match raw {
                        Ok(PtyEvent::Output(bytes)) => {
                            for event in adapter.feed(&bytes) {
                                let _ = events_tx.send(event);
                            }
                        }
                        Ok(PtyEvent::Exited { .. }) => {
                            sessions.lock().await.remove(&id);
                            break;
                        }
                        Ok(PtyEvent::Resized { .. }) => {}
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => {
                            sessions.lock().await.remove(&id);
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    for event in adapter.tick() {
                        let _ = events_tx.send(event);
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_operations_are_no_ops() {
        let terminal = AgentTerminal::new(Config::default());
        let unknown = SessionId::new();
        terminal.send(unknown, "hello").await;
        terminal.interrupt(unknown).await;
        terminal.kill(unknown).await;
        assert!(terminal.get(unknown).await.is_none());
    }

    #[tokio::test]
    async fn list_is_empty_for_a_fresh_terminal() {
        let terminal = AgentTerminal::new(Config::default());
        assert!(terminal.list().await.is_empty());
    }

    #[tokio::test]
    async fn spawn_and_kill_removes_session_from_registry() {
        let cwd = tempfile::tempdir().expect("tempdir");
        let terminal = AgentTerminal::new(Config::default());
        let request = SpawnRequest {
            agent: AgentKind::CodexStream,
            cwd: cwd.path().to_path_buf(),
            prompt: None,
            allowed_tools: Vec::new(),
            extra_args: vec!["true".to_string()],
        };

        // `codex` won't exist on the test machine; assert the no-binary
        // path fails cleanly rather than attempting a real spawn.
        let result = terminal.spawn(request).await;
        assert!(result.is_err());
        assert!(terminal.list().await.is_empty());
    }
}
