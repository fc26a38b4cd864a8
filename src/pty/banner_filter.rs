//! Debugger-attach banner noise filter.
//!
//! Node's `--inspect` flag (and similar dev-mode flags in other runtimes)
//! writes a banner line to stderr before the child even starts producing
//! real output. It's a build-time concern that otherwise bleeds into the
//! raw stream, so it's filtered explicitly here rather than hard-coded
//! into the reader loop, and it can be turned off via
//! [`crate::config::Config::filter_debugger_banners`].

/// Fixed substrings that mark a chunk as pure debugger-attach noise.
const BANNER_SUBSTRINGS: &[&str] = &[
    "Debugger listening on",
    "docs/inspector",
    "Debugger attached",
    "Waiting for the debugger to disconnect",
];

/// Whether `chunk`'s entire decoded payload is a debugger-attach banner.
///
/// Only drops a chunk that is a single line containing one of the fixed
/// substrings - a chunk that mixes banner text with other output lines is
/// left untouched, since dropping it would also drop real content.
#[must_use]
pub fn is_debugger_banner(chunk: &[u8]) -> bool {
    let text = String::from_utf8_lossy(chunk);
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.lines().count() > 1 {
        return false;
    }
    BANNER_SUBSTRINGS.iter().any(|banner| trimmed.contains(banner))
}
