//! Runtime configuration for the agent terminal subsystem.
//!
//! There is nothing to persist here - no files, no keyring, no server URL.
//! Every knob has a sensible code default and can be overridden by an
//! environment variable, mirroring the two-step `default()` then
//! `apply_env_overrides()` pattern used elsewhere in this codebase for
//! process-wide settings.

use crate::constants::{
    DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SCROLLBACK_LINES, MIN_SCROLLBACK_LINES, TICK_INTERVAL,
};

/// Process-wide tunables for PTY sessions and their parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Default PTY width when a spawn request doesn't specify one.
    pub default_cols: u16,
    /// Default PTY height when a spawn request doesn't specify one.
    pub default_rows: u16,
    /// Scrollback depth for each session's virtual terminal, in rows.
    pub scrollback_lines: usize,
    /// Whether to drop chunks that are entirely a debugger-attach banner.
    ///
    /// A concession to development environments; see
    /// [`crate::pty::banner_filter`]. Togglable rather than hard-coded,
    /// since a production deployment may run behind a debugger too.
    pub filter_debugger_banners: bool,
    /// Seconds a stale `processing` footer may persist before the idle
    /// transition fires from a timer tick rather than a fresh footer read.
    pub idle_timeout_secs: u64,
    /// How often, in milliseconds, the facade drives each session's
    /// `Adapter::tick()` so a quiescent TUI frame still reaches
    /// `task-complete` with no further bytes arriving.
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_cols: DEFAULT_COLS,
            default_rows: DEFAULT_ROWS,
            scrollback_lines: DEFAULT_SCROLLBACK_LINES,
            filter_debugger_banners: true,
            idle_timeout_secs: 3,
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl Config {
    /// Build a `Config` from code defaults overridden by environment
    /// variables, without touching disk.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(cols) = std::env::var("AGENT_TERMINAL_COLS") {
            if let Ok(cols) = cols.parse() {
                self.default_cols = cols;
            }
        }

        if let Ok(rows) = std::env::var("AGENT_TERMINAL_ROWS") {
            if let Ok(rows) = rows.parse() {
                self.default_rows = rows;
            }
        }

        if let Ok(scrollback) = std::env::var("AGENT_TERMINAL_SCROLLBACK_LINES") {
            if let Ok(scrollback) = scrollback.parse::<usize>() {
                self.scrollback_lines = scrollback.max(MIN_SCROLLBACK_LINES);
            }
        }

        if let Ok(filter) = std::env::var("AGENT_TERMINAL_FILTER_DEBUGGER_BANNERS") {
            self.filter_debugger_banners = !matches!(filter.as_str(), "0" | "false" | "no");
        }

        if let Ok(timeout) = std::env::var("AGENT_TERMINAL_IDLE_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                self.idle_timeout_secs = timeout;
            }
        }

        if let Ok(tick) = std::env::var("AGENT_TERMINAL_TICK_INTERVAL_MS") {
            if let Ok(tick) = tick.parse() {
                self.tick_interval_ms = tick;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.default_cols, 80);
        assert_eq!(config.default_rows, 30);
        assert_eq!(config.scrollback_lines, DEFAULT_SCROLLBACK_LINES);
        assert!(config.filter_debugger_banners);
        assert_eq!(config.tick_interval_ms, TICK_INTERVAL.as_millis() as u64);
    }

    #[test]
    fn tick_interval_overrides_from_env() {
        // SAFETY (test-only): no other test in this process reads this var concurrently.
        unsafe { std::env::set_var("AGENT_TERMINAL_TICK_INTERVAL_MS", "250") };
        let config = Config::from_env();
        assert_eq!(config.tick_interval_ms, 250);
        unsafe { std::env::remove_var("AGENT_TERMINAL_TICK_INTERVAL_MS") };
    }

    #[test]
    fn scrollback_override_is_clamped_to_the_floor() {
        // SAFETY (test-only): no other test in this process reads this var concurrently.
        unsafe { std::env::set_var("AGENT_TERMINAL_SCROLLBACK_LINES", "10") };
        let config = Config::from_env();
        assert_eq!(config.scrollback_lines, MIN_SCROLLBACK_LINES);
        unsafe { std::env::remove_var("AGENT_TERMINAL_SCROLLBACK_LINES") };
    }

    #[test]
    fn cols_and_rows_override_from_env() {
        // SAFETY (test-only): no other test in this process reads these vars concurrently.
        unsafe {
            std::env::set_var("AGENT_TERMINAL_COLS", "120");
            std::env::set_var("AGENT_TERMINAL_ROWS", "40");
        }
        let config = Config::from_env();
        assert_eq!(config.default_cols, 120);
        assert_eq!(config.default_rows, 40);
        unsafe {
            std::env::remove_var("AGENT_TERMINAL_COLS");
            std::env::remove_var("AGENT_TERMINAL_ROWS");
        }
    }

    #[test]
    fn debugger_banner_filter_can_be_disabled() {
        // SAFETY (test-only): no other test in this process reads this var concurrently.
        unsafe { std::env::set_var("AGENT_TERMINAL_FILTER_DEBUGGER_BANNERS", "false") };
        let config = Config::from_env();
        assert!(!config.filter_debugger_banners);
        unsafe { std::env::remove_var("AGENT_TERMINAL_FILTER_DEBUGGER_BANNERS") };
    }
}
