use std::path::PathBuf;

use agent_terminal::{AgentKind, AgentTerminal, Config, SpawnRequest};
use anyhow::{Context, Result};
use clap::Parser;

/// Spawn one agent session and print its event stream to stdout until the
/// process exits. A thin demonstration of the facade, not a replacement for
/// the interactive host application.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Which agent CLI to drive.
    #[arg(value_enum)]
    agent: AgentArg,

    /// Working directory for the spawned agent.
    #[arg(long, default_value = ".")]
    cwd: PathBuf,

    /// Initial prompt. Typed into the PTY once the TUI agents report ready,
    /// passed as an argv element for the streaming agents.
    #[arg(long)]
    prompt: Option<String>,

    /// Tool names to allow without a permission prompt.
    #[arg(long, value_delimiter = ',')]
    allowed_tools: Vec<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum AgentArg {
    ClaudeTui,
    ClaudeStream,
    CodexStream,
    CodexTui,
}

impl From<AgentArg> for AgentKind {
    fn from(arg: AgentArg) -> Self {
        match arg {
            AgentArg::ClaudeTui => Self::ClaudeTui,
            AgentArg::ClaudeStream => Self::ClaudeStream,
            AgentArg::CodexStream => Self::CodexStream,
            AgentArg::CodexTui => Self::CodexTui,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let terminal = AgentTerminal::new(Config::from_env());
    let request = SpawnRequest {
        agent: cli.agent.into(),
        cwd: cli.cwd,
        prompt: cli.prompt,
        allowed_tools: cli.allowed_tools,
        extra_args: Vec::new(),
    };

    let id = terminal.spawn(request).await.context("failed to spawn agent session")?;
    log::info!("spawned session {id}");

    let mut events = terminal
        .events(id)
        .await
        .context("session disappeared immediately after spawn")?;

    loop {
        match events.recv().await {
            Ok(event) => println!("{event:?}"),
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("event consumer lagged, missed {skipped} events");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }

    Ok(())
}
