//! Relevance-windowed conversation preview.
//!
//! The preview always shows the first and last [`EDGE_MESSAGES`] messages of a
//! conversation, plus every message matching the query with [`MATCH_CONTEXT`]
//! messages on each side. Gaps between shown messages collapse into a single
//! "N messages skipped" line. Output is a list of styled spans so that the TUI
//! and the plain `--preview` command can each map styles to their own backend.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use crate::models::{Conversation, Message, Role};
use crate::utils::{format_path_with_tilde, format_timestamp, strip_ansi_codes};

/// Messages always shown at each end of a conversation
pub const EDGE_MESSAGES: usize = 2;
/// Messages shown on each side of a match
pub const MATCH_CONTEXT: usize = 1;
/// Character cap per message in the full preview
pub const FULL_TEXT_LIMIT: usize = 2000;
/// Character cap per message in the compact preview
pub const COMPACT_TEXT_LIMIT: usize = 500;

const INDENT: &str = "    ";
const CODE_FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    Full,
    Compact,
}

impl PreviewMode {
    pub fn text_limit(self) -> usize {
        match self {
            PreviewMode::Full => FULL_TEXT_LIMIT,
            PreviewMode::Compact => COMPACT_TEXT_LIMIT,
        }
    }
}

/// Semantic style of a preview span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    HeaderKey,
    Role { role: Role, matched: bool },
    Timestamp,
    Highlight,
    CodeFrame,
    Code,
    Skipped,
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSpan {
    pub text: String,
    pub style: SpanStyle,
}

impl PreviewSpan {
    fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self { text: text.into(), style }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewLine {
    pub spans: Vec<PreviewSpan>,
}

impl PreviewLine {
    fn blank() -> Self {
        Self::default()
    }

    fn single(text: impl Into<String>, style: SpanStyle) -> Self {
        Self { spans: vec![PreviewSpan::new(text, style)] }
    }

    /// Concatenated text of all spans
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn has_style(&self, style: SpanStyle) -> bool {
        self.spans.iter().any(|s| s.style == style)
    }
}

/// A fully built preview: a fixed header and scrollable body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub header: Vec<PreviewLine>,
    pub body: Vec<PreviewLine>,
}

impl Preview {
    pub fn build(conversation: &Conversation, query: &str, mode: PreviewMode) -> Self {
        let query_lower = query.to_lowercase();
        let header = header_lines(conversation);
        let mut body = Vec::new();

        let mut previous: Option<usize> = None;
        for (idx, matched) in visible_messages(conversation, &query_lower) {
            let gap = match previous {
                Some(prev) => idx - prev - 1,
                None => idx,
            };
            if gap > 0 {
                body.push(skipped_line(gap));
                body.push(PreviewLine::blank());
            }
            push_message(&mut body, &conversation.messages[idx], query, matched, mode);
            previous = Some(idx);
        }

        Self { header, body }
    }

    /// Largest useful scroll offset
    pub fn max_scroll(&self) -> usize {
        self.body.len().saturating_sub(1)
    }

    /// Largest scroll offset that still fills `available_height` rows
    pub fn max_scroll_for(&self, available_height: usize) -> usize {
        let body_height = available_height.saturating_sub(self.header.len());
        self.body.len().saturating_sub(body_height.max(1))
    }

    /// Header plus the body window starting at `scroll`, at most
    /// `available_height` lines in total unless the header alone is taller.
    pub fn window(&self, scroll: usize, available_height: usize) -> Vec<PreviewLine> {
        let start = scroll.min(self.max_scroll());
        let body_height = available_height.saturating_sub(self.header.len());
        self.header
            .iter()
            .chain(self.body.iter().skip(start).take(body_height))
            .cloned()
            .collect()
    }
}

/// Render the visible slice of a conversation preview.
pub fn render_preview(
    conversation: &Conversation,
    query: &str,
    available_height: usize,
    scroll: usize,
    mode: PreviewMode,
) -> Vec<PreviewLine> {
    Preview::build(conversation, query, mode).window(scroll, available_height)
}

/// Indices of messages to display, in order, each flagged when it matches
/// `query_lower` itself.
pub fn visible_messages(conversation: &Conversation, query_lower: &str) -> Vec<(usize, bool)> {
    let count = conversation.messages.len();
    let mut shown: BTreeSet<usize> = (0..count.min(EDGE_MESSAGES)).collect();
    shown.extend(count.saturating_sub(EDGE_MESSAGES)..count);

    let mut matched = BTreeSet::new();
    if !query_lower.is_empty() {
        for (idx, message) in conversation.messages.iter().enumerate() {
            if message.text.to_lowercase().contains(query_lower) {
                matched.insert(idx);
                let start = idx.saturating_sub(MATCH_CONTEXT);
                let end = (idx + MATCH_CONTEXT + 1).min(count);
                shown.extend(start..end);
            }
        }
    }

    shown.into_iter().map(|idx| (idx, matched.contains(&idx))).collect()
}

fn header_lines(conversation: &Conversation) -> Vec<PreviewLine> {
    let field = |key: &str, value: String| PreviewLine {
        spans: vec![
            PreviewSpan::new(format!("{}: ", key), SpanStyle::HeaderKey),
            PreviewSpan::new(value, SpanStyle::Plain),
        ],
    };
    vec![
        field("Project", format_path_with_tilde(Path::new(&conversation.cwd))),
        field("Session", conversation.session_id.clone()),
        field("Messages", conversation.messages.len().to_string()),
        PreviewLine::blank(),
    ]
}

fn skipped_line(count: usize) -> PreviewLine {
    let noun = if count == 1 { "message" } else { "messages" };
    PreviewLine::single(format!("{}··· {} {} skipped ···", INDENT, count, noun), SpanStyle::Skipped)
}

fn push_message(
    out: &mut Vec<PreviewLine>,
    message: &Message,
    query: &str,
    matched: bool,
    mode: PreviewMode,
) {
    let marker = if matched { ">>> " } else { INDENT };
    let mut label = PreviewLine {
        spans: vec![PreviewSpan::new(
            format!("{}{}:", marker, message.role.label()),
            SpanStyle::Role { role: message.role, matched },
        )],
    };
    let timestamp = format_timestamp(&message.timestamp);
    if !timestamp.is_empty() {
        label.spans.push(PreviewSpan::new(format!(" {}", timestamp), SpanStyle::Timestamp));
    }
    out.push(label);

    let clean = strip_ansi_codes(&message.text);
    let (text, truncated) = truncate_chars(&clean, mode.text_limit());
    push_formatted_text(out, text, query);
    if truncated {
        out.push(PreviewLine::single(format!("{}... (truncated)", INDENT), SpanStyle::Truncated));
    }
    out.push(PreviewLine::blank());
}

/// Cut `text` to at most `limit` characters
fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Emit message text, framing fenced code and highlighting `query` elsewhere
fn push_formatted_text(out: &mut Vec<PreviewLine>, text: &str, query: &str) {
    let mut in_code = false;
    for line in text.lines() {
        // Only a fence at column zero opens or closes a block
        if let Some(lang) = line.strip_prefix(CODE_FENCE) {
            if in_code {
                out.push(PreviewLine::single(format!("{}└─────────", INDENT), SpanStyle::CodeFrame));
            } else {
                let lang = lang.trim();
                let lang = if lang.is_empty() { "code" } else { lang };
                out.push(PreviewLine::single(
                    format!("{}┌─ {} ─", INDENT, lang),
                    SpanStyle::CodeFrame,
                ));
            }
            in_code = !in_code;
        } else if in_code {
            out.push(PreviewLine {
                spans: vec![
                    PreviewSpan::new(format!("{}│ ", INDENT), SpanStyle::CodeFrame),
                    PreviewSpan::new(line, SpanStyle::Code),
                ],
            });
        } else {
            let mut spans = vec![PreviewSpan::new(INDENT, SpanStyle::Plain)];
            spans.extend(highlight(line, query));
            out.push(PreviewLine { spans });
        }
    }
    // Truncation can cut a block before its closing fence
    if in_code {
        out.push(PreviewLine::single(format!("{}└─────────", INDENT), SpanStyle::CodeFrame));
    }
}

/// Split `line` into plain and highlighted spans around every
/// case-insensitive occurrence of `query`
pub fn highlight(line: &str, query: &str) -> Vec<PreviewSpan> {
    let mut spans = Vec::new();
    let mut last = 0;
    for range in find_case_insensitive(line, query) {
        if range.start > last {
            spans.push(PreviewSpan::new(&line[last..range.start], SpanStyle::Plain));
        }
        spans.push(PreviewSpan::new(&line[range.clone()], SpanStyle::Highlight));
        last = range.end;
    }
    if last < line.len() || spans.is_empty() {
        spans.push(PreviewSpan::new(&line[last..], SpanStyle::Plain));
    }
    spans
}

/// Byte ranges of non-overlapping case-insensitive matches of `needle`
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let mut matches = Vec::new();
    if needle.is_empty() {
        return matches;
    }

    let mut search_from = 0;
    while search_from < haystack.len() {
        let Some(range) = haystack[search_from..]
            .char_indices()
            .find_map(|(offset, _)| match_at(haystack, search_from + offset, needle))
        else {
            break;
        };
        search_from = range.end;
        matches.push(range);
    }
    matches
}

fn match_at(haystack: &str, start: usize, needle: &str) -> Option<Range<usize>> {
    let mut rest = haystack[start..].char_indices();
    let mut end = start;
    for expected in needle.chars() {
        let (offset, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = start + offset + actual.len_utf8();
    }
    Some(start..end)
}
