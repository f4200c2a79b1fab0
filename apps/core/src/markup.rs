//! Presentation markup for message bodies.
//!
//! Splits a body into lines and classifies each one, in priority order:
//! whole-line bold, warning, numbered item, inline bold, paragraph.
//! Empty lines produce nothing.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const BOLD_MARKER: &str = "**";
pub const WARNING_GLYPH: &str = "⚠️";

// NOTE: expect() is acceptable here, the patterns are constant.
static NUMBERED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("Invalid regex: numbered prefix"));
static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid regex: bold span"));

/// A run of text inside an inline-bold line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Plain(String),
    Strong(String),
}

/// One rendered line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String },
    Warning { text: String },
    ListItem { text: String },
    Rich { spans: Vec<Span> },
    Paragraph { text: String },
}

/// Classify every non-empty line of `body`
pub fn parse(body: &str) -> Vec<Block> {
    body.lines().filter_map(classify_line).collect()
}

pub fn classify_line(line: &str) -> Option<Block> {
    if line.is_empty() {
        return None;
    }

    if line.starts_with(BOLD_MARKER) && line.ends_with(BOLD_MARKER) {
        return Some(Block::Heading {
            text: line.replace(BOLD_MARKER, ""),
        });
    }

    if line.starts_with(WARNING_GLYPH) {
        let text = line.replacen(&format!("{} ", WARNING_GLYPH), "", 1);
        return Some(Block::Warning { text });
    }

    if NUMBERED_PREFIX.is_match(line) {
        return Some(Block::ListItem {
            text: NUMBERED_PREFIX.replace(line, "").into_owned(),
        });
    }

    if line.contains(BOLD_MARKER) {
        return Some(Block::Rich {
            spans: split_bold(line),
        });
    }

    Some(Block::Paragraph {
        text: line.to_string(),
    })
}

/// Alternating plain/strong spans; empty plain runs are dropped.
fn split_bold(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for captures in BOLD_SPAN.captures_iter(line) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span::Plain(line[cursor..whole.start()].to_string()));
        }
        spans.push(Span::Strong(inner.as_str().to_string()));
        cursor = whole.end();
    }

    if cursor < line.len() {
        spans.push(Span::Plain(line[cursor..].to_string()));
    }

    spans
}
