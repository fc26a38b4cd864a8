//! Crate-wide constants.
//!
//! Centralizes magic numbers so defaults are discoverable in one place
//! instead of scattered across the modules that use them.

use std::time::Duration;

// ============================================================================
// Terminal dimensions
// ============================================================================

/// Default PTY width in columns when a spawn request does not specify one.
pub const DEFAULT_COLS: u16 = 80;

/// Default PTY height in rows when a spawn request does not specify one.
pub const DEFAULT_ROWS: u16 = 30;

// ============================================================================
// Scrollback
// ============================================================================

/// Default scrollback depth for the virtual terminal, in rows.
///
/// Must stay well above the lower bound of 1000 rows: a single agent turn
/// can render a long tool transcript, and content that scrolls off before
/// it is extracted is lost silently.
pub const DEFAULT_SCROLLBACK_LINES: usize = 2_000;

/// Minimum scrollback depth accepted by [`crate::config::Config`].
///
/// Below this, long turns risk losing content that scrolled out of the
/// viewport before the screen reader walked it.
pub const MIN_SCROLLBACK_LINES: usize = 1_000;

// ============================================================================
// TUI parser timing
// ============================================================================

/// How long a `processing` footer may go stale before the idle transition
/// fires on a timer tick instead of a fresh footer read.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(3);

/// Suggested interval for the facade's periodic `tick()` driver.
///
/// A turn can end with the TUI re-rendering a quiescent frame with no
/// further bytes arriving, so idle detection cannot rely on `feed` alone.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// Cancellation
// ============================================================================

/// Grace period between `SIGTERM` and escalating to `SIGKILL` on `kill()`.
pub const KILL_GRACE_PERIOD: Duration = Duration::from_secs(5);

// ============================================================================
// Content markers
// ============================================================================

/// Glyph that introduces a primary content block in the target TUIs.
pub const PRIMARY_MARKER: char = '⏺';

/// Glyph that introduces a sub (nested) content block.
pub const SUB_MARKER: char = '⎿';

/// Prompt glyph used to detect `has_prompt` in the footer.
pub const PROMPT_GLYPH: char = '❯';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrollback_default_meets_the_documented_floor() {
        assert!(DEFAULT_SCROLLBACK_LINES >= MIN_SCROLLBACK_LINES);
    }

    #[test]
    fn idle_timeout_is_reasonable() {
        assert!(IDLE_TIMEOUT >= Duration::from_secs(1));
        assert!(IDLE_TIMEOUT <= Duration::from_secs(30));
    }
}
