//! PTY session lifecycle.
//!
//! A [`PtySession`] is the exclusive owner of one child process and its
//! pseudo-terminal. It exposes three observables - a multicast raw byte
//! stream, a last-value-wins state, and process exit - and a small command
//! surface (`write`, `resize`, `kill`) that is serialized through a single
//! command task so operations are applied in the caller's issue order.
//!
//! Reading the PTY is blocking I/O (`portable-pty` has no async reader), so
//! the reader loop runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`] rather than a dedicated `std::thread` -
//! the rest of the session lives entirely in async tasks, and this keeps it
//! that way without a manual channel bridge.

pub mod banner_filter;
pub mod commands;
pub mod events;
pub mod spawn;

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use portable_pty::{Child, MasterPty};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;

use crate::constants::KILL_GRACE_PERIOD;
use crate::error::SpawnError;

pub use commands::PtyCommand;
pub use events::PtyEvent;

/// Capacity of the raw-event broadcast channel.
///
/// The raw stream favours drop-oldest-on-slow-consumer over back-pressure
/// on the producer - a bounded channel gives that for free; a slow
/// subscriber falls behind and sees [`broadcast::error::RecvError::Lagged`]
/// instead of stalling the reader.
const RAW_CHANNEL_CAPACITY: usize = 4096;

/// Last-value-wins session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtySessionState {
    Running,
    Exited,
}

/// A running (or just-exited) PTY-backed child process.
pub struct PtySession {
    command_tx: mpsc::UnboundedSender<PtyCommand>,
    event_tx: broadcast::Sender<PtyEvent>,
    state_rx: watch::Receiver<PtySessionState>,
    disposed: std::sync::atomic::AtomicBool,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Debug for PtySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySession")
            .field("state", &*self.state_rx.borrow())
            .finish_non_exhaustive()
    }
}

impl PtySession {
    /// Spawn `argv[0]` with the remaining elements as arguments, attached to
    /// a PTY of size `cols × rows`, in `cwd` with `env` applied.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnError`] if the PTY cannot be allocated or the binary
    /// cannot be spawned. No session is registered by the caller in that
    /// case.
    pub fn start(
        argv: &[String],
        cwd: &Path,
        env: &HashMap<String, String>,
        rows: u16,
        cols: u16,
        filter_debugger_banners: bool,
    ) -> Result<Self, SpawnError> {
        let pair = spawn::open_pty(rows, cols)
            .map_err(|e| SpawnError::PtyAllocationFailed(e.to_string()))?;

        let cmd = spawn::build_command(argv, cwd, env)
            .map_err(|_| SpawnError::BinaryNotFound("argv must not be empty".to_string()))?;

        let program = argv.first().cloned().unwrap_or_default();
        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|_| SpawnError::BinaryNotFound(program))?;

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| SpawnError::PtyAllocationFailed(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| SpawnError::PtyAllocationFailed(e.to_string()))?;

        let (event_tx, _) = broadcast::channel(RAW_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(PtySessionState::Running);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        spawn_reader_task(reader, event_tx.clone(), filter_debugger_banners);
        spawn_command_task(command_rx, pair.master, writer, child, event_tx.clone(), state_tx);

        Ok(Self {
            command_tx,
            event_tx,
            state_rx,
            disposed: std::sync::atomic::AtomicBool::new(false),
            started_at: chrono::Utc::now(),
        })
    }

    /// When this session's PTY was opened, for logging and session listings.
    #[must_use]
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Subscribe to this session's raw event stream.
    ///
    /// Late subscribers receive events from subscription onward, never a
    /// replay, matching the facade's "multicast, no history" contract.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PtyEvent> {
        self.event_tx.subscribe()
    }

    /// The session's current last-value-wins state.
    #[must_use]
    pub fn state(&self) -> PtySessionState {
        *self.state_rx.borrow()
    }

    /// Write bytes to the child's stdin.
    ///
    /// A no-op once the child has exited or the session has been disposed -
    /// the command task stops consuming and the send is silently dropped.
    pub fn write(&self, bytes: Vec<u8>) {
        let _ = self.command_tx.send(PtyCommand::Write(bytes));
    }

    /// Resize the PTY (and the adapter's virtual terminal, via the facade).
    pub fn resize(&self, rows: u16, cols: u16) {
        let _ = self.command_tx.send(PtyCommand::Resize { rows, cols });
    }

    /// Terminate the child process: `SIGTERM` first, escalating to
    /// `SIGKILL` after [`KILL_GRACE_PERIOD`] if it hasn't exited.
    pub fn kill(&self) {
        let _ = self.command_tx.send(PtyCommand::Kill);
    }

    /// Idempotent teardown: kill the child if still running.
    ///
    /// Safe to call more than once or after the child has already exited.
    pub fn dispose(&self) {
        if self
            .disposed
            .compare_exchange(
                false,
                true,
                std::sync::atomic::Ordering::SeqCst,
                std::sync::atomic::Ordering::SeqCst,
            )
            .is_ok()
        {
            self.kill();
        }
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn spawn_reader_task(
    mut reader: Box<dyn Read + Send>,
    event_tx: broadcast::Sender<PtyEvent>,
    filter_debugger_banners: bool,
) {
    tokio::task::spawn_blocking(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if filter_debugger_banners && banner_filter::is_debugger_banner(&buf[..n]) {
                        continue;
                    }
                    // No subscribers is not an error - the raw stream is
                    // fire-and-forget until someone listens.
                    let _ = event_tx.send(PtyEvent::output(buf[..n].to_vec()));
                }
                Err(e) => {
                    log::debug!("PTY reader stopping: {e}");
                    break;
                }
            }
        }
    });
}

/// Ask the child to exit gracefully via `SIGTERM`.
///
/// `portable_pty::Child::kill()` is a hard `SIGKILL` (it wraps
/// `std::process::Child::kill()` on Unix, which is always `SIGKILL`), so the
/// graceful half of kill/escalate has to go around it via the child's pid.
/// Returns `false` if the pid is unavailable or the signal couldn't be
/// sent, in which case the caller falls back to an immediate hard kill.
#[cfg(unix)]
fn send_sigterm(child: &dyn Child) -> bool {
    let Some(pid) = child.process_id() else {
        return false;
    };
    // SAFETY: `pid` was just obtained from `Child::process_id()`; signaling
    // it with a standard signal number is the same syscall
    // `std::process::Child::kill()` wraps, just with SIGTERM instead of
    // SIGKILL.
    let result = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    result == 0
}

#[cfg(not(unix))]
fn send_sigterm(_child: &dyn Child) -> bool {
    false
}

fn spawn_command_task(
    mut command_rx: mpsc::UnboundedReceiver<PtyCommand>,
    master_pty: Box<dyn MasterPty + Send>,
    mut writer: Box<dyn Write + Send>,
    mut child: Box<dyn Child + Send>,
    event_tx: broadcast::Sender<PtyEvent>,
    state_tx: watch::Sender<PtySessionState>,
) {
    tokio::spawn(async move {
        let mut kill_requested_at: Option<Instant> = None;

        loop {
            if let Ok(Some(status)) = child.try_wait() {
                let code = status.exit_code().try_into().ok();
                let _ = event_tx.send(PtyEvent::exited(code, None));
                let _ = state_tx.send(PtySessionState::Exited);
                return;
            }

            if let Some(requested_at) = kill_requested_at {
                if requested_at.elapsed() >= KILL_GRACE_PERIOD {
                    log::warn!("child did not exit within grace period, escalating SIGTERM to SIGKILL");
                    let _ = child.kill();
                    kill_requested_at = None;
                }
            }

            let next = tokio::time::timeout(Duration::from_millis(100), command_rx.recv()).await;
            match next {
                Ok(Some(PtyCommand::Write(bytes))) => {
                    if writer.write_all(&bytes).is_err() {
                        continue;
                    }
                    let _ = writer.flush();
                }
                Ok(Some(PtyCommand::Resize { rows, cols })) => {
                    if master_pty
                        .resize(portable_pty::PtySize {
                            rows,
                            cols,
                            pixel_width: 0,
                            pixel_height: 0,
                        })
                        .is_ok()
                    {
                        let _ = event_tx.send(PtyEvent::resized(rows, cols));
                    }
                }
                Ok(Some(PtyCommand::Kill)) => {
                    if !send_sigterm(child.as_ref()) {
                        let _ = child.kill();
                    }
                    kill_requested_at = Some(Instant::now());
                }
                Ok(None) => {
                    // All PtySession handles dropped without an explicit
                    // dispose; keep polling for exit so we still emit it.
                }
                Err(_) => {
                    // Timed out waiting for a command; loop back to poll exit.
                }
            }
        }
    });
}
