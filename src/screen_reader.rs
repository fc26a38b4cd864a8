//! Pure functions that read meaning out of rendered terminal rows.
//!
//! Nothing here owns state or touches a PTY - every function takes rows
//! (and sometimes a wrap predicate) and returns a value. That mirrors
//! `agent/screen.rs::render_screen_as_ansi`'s shape: a pure transform over
//! already-rendered terminal state, no hidden state, no `self`.

use std::sync::LazyLock;

use regex::Regex;

use crate::event::AgentEvent;

/// Tool names the content-block parser recognises in a `NAME(arg)` call
/// form. Anything else falls through to the verb-form or generic message
/// patterns below.
const TOOL_NAMES: &[&str] = &[
    "Read", "Write", "Edit", "Bash", "Grep", "Glob", "Task", "WebFetch", "WebSearch",
    "NotebookEdit", "TodoWrite",
];

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^─+$").unwrap());
static TOKEN_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d[\d,]*k?\s*tokens?").unwrap());
static MENU_PHRASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)use arrow keys|press enter to select|esc to go back").unwrap());
static PERMISSION_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)allow\s+\w+\?|do you want to (allow|create|run|execute|proceed)").unwrap()
});
static PROCESSING_PHRASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)esc to interrupt|esc to cancel").unwrap());
static IDLE_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\? for shortcuts").unwrap());

static TOOL_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names = TOOL_NAMES.join("|");
    Regex::new(&format!(r#"^({names})\((?:"([^"]*)"|([^)]*))\)"#)).unwrap()
});
static VERB_FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Reading|Editing|Writing|Running|Searching)\s+(.*)$").unwrap());
static COMPLETED_VERB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Read|Wrote|Edited|Ran|Searched|Updated|Created|Deleted)\b").unwrap());
static THINKING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(thinking|thought|churning)[^\d]*(\d+)s").unwrap());
static PERMISSION_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^allow\s+(\w+)\?|do you want to (allow|create|run|execute|proceed)").unwrap()
});
static AGENTS_SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(running|ran)\s+\d+\s+agents?(\s+finished\s*\([^)]*\))?\s*$").unwrap()
});

/// The marker glyph that introduced a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Primary,
    Sub,
}

impl Marker {
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Primary => crate::constants::PRIMARY_MARKER,
            Self::Sub => crate::constants::SUB_MARKER,
        }
    }

    fn key_prefix(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Sub => "sub",
        }
    }
}

/// An extracted content block, pre-normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub marker: Marker,
    pub text: String,
    pub start_row: usize,
}

impl Block {
    /// The `(marker, normalized_text)` dedup key used by the TUI parser,
    /// computed after normalization has already produced `normalized_text`.
    #[must_use]
    pub fn key(marker: Marker, normalized_text: &str) -> String {
        format!("{}|{}", marker.key_prefix(), normalized_text)
    }
}

/// The footer's current signal and whether a prompt glyph is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterSignal {
    Unknown,
    Idle,
    Processing,
    Permission,
    InteractiveMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterState {
    pub signal: FooterSignal,
    pub has_prompt: bool,
}

/// Classify the footer from the whole screen, not just the trailing rows -
/// some TUIs don't keep the footer pinned to the bottom of the viewport.
#[must_use]
pub fn read_footer(rows: &[String]) -> FooterState {
    let joined = rows.join("\n");
    let has_prompt = rows.iter().any(|r| r.contains(crate::constants::PROMPT_GLYPH));

    let signal = if MENU_PHRASE_RE.is_match(&joined) {
        FooterSignal::InteractiveMenu
    } else if PERMISSION_PHRASE_RE.is_match(&joined) {
        FooterSignal::Permission
    } else if PROCESSING_PHRASE_RE.is_match(&joined) {
        FooterSignal::Processing
    } else if IDLE_PHRASE_RE.is_match(&joined) {
        FooterSignal::Idle
    } else {
        FooterSignal::Unknown
    };

    FooterState { signal, has_prompt }
}

fn is_footer_row(row: &str) -> bool {
    let trimmed = row.trim();
    if trimmed.is_empty() {
        return false;
    }
    MENU_PHRASE_RE.is_match(trimmed)
        || PERMISSION_PHRASE_RE.is_match(trimmed)
        || PROCESSING_PHRASE_RE.is_match(trimmed)
        || IDLE_PHRASE_RE.is_match(trimmed)
        || RULE_RE.is_match(trimmed)
        || TOKEN_COUNT_RE.is_match(trimmed)
        || trimmed.contains(crate::constants::PROMPT_GLYPH)
}

/// Scan bottom-up for where the footer band begins.
#[must_use]
pub fn find_footer_start(rows: &[String]) -> usize {
    let mut index = rows.len();
    for (i, row) in rows.iter().enumerate().rev() {
        if is_footer_row(row) {
            index = i;
        } else if row.trim().is_empty() {
            continue;
        } else {
            break;
        }
    }
    index
}

fn is_banner_row(row: &str) -> bool {
    let trimmed = row.trim();
    trimmed.is_empty() || RULE_RE.is_match(trimmed)
}

/// Walk `rows[.., footer_start)` and group them into content blocks.
#[must_use]
pub fn extract_content_blocks(
    rows: &[String],
    is_wrapped: impl Fn(usize) -> bool,
    footer_start: usize,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    let mut banner_end = 0;
    while banner_end < footer_start && is_banner_row(&rows[banner_end]) {
        banner_end += 1;
    }

    for row_idx in banner_end..footer_start.min(rows.len()) {
        let row = &rows[row_idx];
        let trimmed = row.trim();

        if trimmed.is_empty() {
            continue;
        }

        let primary = crate::constants::PRIMARY_MARKER;
        let sub = crate::constants::SUB_MARKER;

        if let Some(rest) = trimmed.strip_prefix(primary) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(Block {
                marker: Marker::Primary,
                text: rest.trim_start().to_string(),
                start_row: row_idx,
            });
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix(sub) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(Block {
                marker: Marker::Sub,
                text: rest.trim_start().to_string(),
                start_row: row_idx,
            });
            continue;
        }

        if is_wrapped(row_idx.saturating_sub(1)) {
            if let Some(block) = current.as_mut() {
                block.text.push(' ');
                block.text.push_str(trimmed);
                continue;
            }
        }

        let indent = row.len() - row.trim_start().len();
        if indent >= 2 {
            if let Some(block) = current.as_mut() {
                block.text.push(' ');
                block.text.push_str(trimmed);
                continue;
            }
        }

        if let Some(block) = current.take() {
            blocks.push(block);
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }

    blocks
}

/// Strip a trailing subagent-tree fragment, "Running/Ran N agents" and
/// "N agents finished (...)" phrases, and the background-run hint. Returns
/// `None` if nothing meaningful survives.
#[must_use]
pub fn normalize_block_text(text: &str) -> Option<String> {
    let tree_chars = ['├', '└', '│'];

    if text.chars().next().is_some_and(|c| tree_chars.contains(&c)) {
        return None;
    }

    let mut t = text.to_string();
    if let Some(pos) = t.find(tree_chars) {
        t.truncate(pos);
    }

    t = AGENTS_SUMMARY_RE.replace(&t, "").to_string();
    t = t.replace("ctrl+b to run in background", "");

    let trimmed = t.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Map a primary-marker block's normalized text to an event.
#[must_use]
pub fn block_to_event(marker: Marker, text: &str) -> Option<AgentEvent> {
    match marker {
        Marker::Primary => primary_block_to_event(text),
        Marker::Sub => Some(sub_block_to_event(text)),
    }
}

fn primary_block_to_event(text: &str) -> Option<AgentEvent> {
    if text.starts_with("Tip:") || text.starts_with("Did you know") {
        return None;
    }

    if let Some(caps) = TOOL_CALL_RE.captures(text) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let arg = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        return Some(AgentEvent::tool_start(name, arg));
    }

    if let Some(caps) = VERB_FORM_RE.captures(text) {
        let verb = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        return Some(AgentEvent::tool_start(verb, rest));
    }

    if COMPLETED_VERB_RE.is_match(text) && text.contains("ctrl+o") {
        return Some(AgentEvent::tool_end("unknown", text));
    }

    if let Some(caps) = THINKING_RE.captures(text) {
        let seconds = caps.get(2).map(|m| m.as_str()).unwrap_or("0");
        return Some(AgentEvent::thinking(format!("Thinking for {seconds}s")));
    }

    if let Some(caps) = PERMISSION_BLOCK_RE.captures(text) {
        let tool = caps.get(1).map(|m| m.as_str()).unwrap_or("unknown");
        return Some(AgentEvent::permission_request(tool, text));
    }

    Some(AgentEvent::message(text))
}

fn sub_block_to_event(text: &str) -> AgentEvent {
    if COMPLETED_VERB_RE.is_match(text) {
        AgentEvent::tool_end("unknown", text)
    } else {
        AgentEvent::message(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn footer_idle_when_shortcuts_hint_present() {
        let screen = rows(&["hello", "", "❯", "? for shortcuts"]);
        let footer = read_footer(&screen);
        assert_eq!(footer.signal, FooterSignal::Idle);
        assert!(footer.has_prompt);
    }

    #[test]
    fn footer_processing_when_interrupt_hint_present() {
        let screen = rows(&["⏺ Working…", "", "esc to interrupt"]);
        assert_eq!(read_footer(&screen).signal, FooterSignal::Processing);
    }

    #[test]
    fn footer_permission_outranks_processing_hint() {
        let screen = rows(&["❯", "esc to cancel", "Allow Bash?"]);
        assert_eq!(read_footer(&screen).signal, FooterSignal::Permission);
    }

    #[test]
    fn footer_interactive_menu_detected() {
        let screen = rows(&["pick one", "(use arrow keys)"]);
        assert_eq!(read_footer(&screen).signal, FooterSignal::InteractiveMenu);
    }

    #[test]
    fn find_footer_start_skips_trailing_rule_and_prompt() {
        let screen = rows(&["content here", "────────", "❯", "? for shortcuts"]);
        assert_eq!(find_footer_start(&screen), 1);
    }

    #[test]
    fn extract_blocks_groups_continuation_lines_by_indent() {
        let screen = rows(&["⏺ Read(file.rs)", "  more detail", "⎿ Done", ""]);
        let blocks = extract_content_blocks(&screen, |_| false, 4);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].marker, Marker::Primary);
        assert_eq!(blocks[0].text, "Read(file.rs) more detail");
        assert_eq!(blocks[1].marker, Marker::Sub);
    }

    #[test]
    fn extract_blocks_joins_wrapped_rows() {
        let screen = rows(&["⏺ a long line that wraps", "continues here"]);
        let blocks = extract_content_blocks(&screen, |row| row == 0, 2);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "a long line that wraps continues here");
    }

    #[test]
    fn tool_call_pattern_maps_to_tool_start() {
        let event = block_to_event(Marker::Primary, r#"Read("/x")"#).unwrap();
        match event {
            AgentEvent::ToolStart { tool, input } => {
                assert_eq!(tool, "Read");
                assert_eq!(input, "/x");
            }
            other => panic!("expected ToolStart, got {other:?}"),
        }
    }

    #[test]
    fn verb_form_maps_to_tool_start() {
        let event = block_to_event(Marker::Primary, "Reading src/main.rs").unwrap();
        match event {
            AgentEvent::ToolStart { tool, input } => {
                assert_eq!(tool, "Reading");
                assert_eq!(input, "src/main.rs");
            }
            other => panic!("expected ToolStart, got {other:?}"),
        }
    }

    #[test]
    fn completed_verb_with_expand_hint_maps_to_tool_end() {
        let event = block_to_event(Marker::Primary, "Read 3 files (ctrl+o to expand)").unwrap();
        match event {
            AgentEvent::ToolEnd { tool, .. } => assert_eq!(tool, "unknown"),
            other => panic!("expected ToolEnd, got {other:?}"),
        }
    }

    #[test]
    fn thinking_pattern_formats_seconds() {
        let event = block_to_event(Marker::Primary, "Thinking for a moment… 12s").unwrap();
        match event {
            AgentEvent::Thinking { text } => assert_eq!(text, "Thinking for 12s"),
            other => panic!("expected Thinking, got {other:?}"),
        }
    }

    #[test]
    fn permission_pattern_maps_to_permission_request() {
        let event = block_to_event(Marker::Primary, "Allow Bash?").unwrap();
        match event {
            AgentEvent::PermissionRequest { tool, .. } => assert_eq!(tool, "Bash"),
            other => panic!("expected PermissionRequest, got {other:?}"),
        }
    }

    #[test]
    fn tip_lines_are_ignored() {
        assert!(block_to_event(Marker::Primary, "Tip: try /help").is_none());
        assert!(block_to_event(Marker::Primary, "Did you know you can...").is_none());
    }

    #[test]
    fn generic_text_maps_to_message() {
        let event = block_to_event(Marker::Primary, "The answer is 42.").unwrap();
        match event {
            AgentEvent::Message { text } => assert_eq!(text, "The answer is 42."),
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[test]
    fn sub_block_without_completed_verb_is_a_message() {
        let event = sub_block_to_event("some detail");
        assert!(matches!(event, AgentEvent::Message { .. }));
    }

    #[test]
    fn normalize_strips_tree_fragment() {
        let text = "Wrote file.rs\n├ sub task one\n└ sub task two";
        let normalized = normalize_block_text(text).unwrap();
        assert_eq!(normalized, "Wrote file.rs");
    }

    #[test]
    fn normalize_strips_agents_summary_suffix() {
        let normalized = normalize_block_text("Explored the repo Ran 3 agents finished (12s)").unwrap();
        assert_eq!(normalized, "Explored the repo");
    }

    #[test]
    fn normalize_strips_background_hint() {
        let normalized = normalize_block_text("Build started ctrl+b to run in background").unwrap();
        assert_eq!(normalized, "Build started");
    }

    #[test]
    fn normalize_pure_tree_line_is_discarded() {
        assert!(normalize_block_text("├ nested thing").is_none());
    }

    #[test]
    fn normalize_empty_result_is_discarded() {
        assert!(normalize_block_text("   ").is_none());
    }

    #[test]
    fn block_key_distinguishes_markers() {
        let a = Block::key(Marker::Primary, "same text");
        let b = Block::key(Marker::Sub, "same text");
        assert_ne!(a, b);
    }
}
