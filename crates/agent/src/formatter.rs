//! Response formatting — a fixed, idempotent normalization pass over model text.
//!
//! Models often return lists, headings and sentences run together on one
//! line. The rules below put structural markers on their own lines and tidy
//! spacing. Every rule only removes horizontal whitespace or inserts a single
//! space where none was, so running the pass twice changes nothing.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::Regex;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

static SPACE_AFTER_TERMINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])([A-ZÀ-ÖØ-Þ])").expect("valid regex"));

static RUN_AFTER_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?,])[ \t]{2,}").expect("valid regex"));

static SPACE_AFTER_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",[ \t]*([^\s\d,])").expect("valid regex"));

static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S)[ \t]+(\d{1,2}\.[ \t])").expect("valid regex"));

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.:!?;])[ \t]+([-*•][ \t])").expect("valid regex"));

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s#])[ \t]+(#{1,6}[ \t])").expect("valid regex"));

static EXTRA_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Stateless text normalizer applied to every chat answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, text: &str) -> String {
        let text = strip_reasoning(text);

        let lines: Vec<String> = text
            .lines()
            .map(str::trim_end)
            .map(|line| {
                if line.trim_start().starts_with('|') {
                    format_table_row(line)
                } else {
                    format_prose(line)
                }
            })
            .collect();

        EXTRA_BLANK_LINES
            .replace_all(&lines.join("\n"), "\n\n")
            .trim()
            .to_string()
    }
}

/// Drop `<think>` blocks; an unmatched closing tag drops everything before it.
fn strip_reasoning(text: &str) -> Cow<'_, str> {
    let stripped = THINK_BLOCK.replace_all(text, "");
    match stripped.rfind("</think>") {
        Some(pos) => Cow::Owned(stripped[pos + "</think>".len()..].to_string()),
        None => stripped,
    }
}

fn format_table_row(line: &str) -> String {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    let cells: Vec<&str> = inner.split('|').map(str::trim).collect();
    format!("| {} |", cells.join(" | "))
}

fn format_prose(line: &str) -> String {
    let line = SPACE_AFTER_TERMINAL.replace_all(line, "$1 $2");
    let line = RUN_AFTER_PUNCTUATION.replace_all(&line, "$1 ");
    let line = SPACE_AFTER_COMMA.replace_all(&line, ", $1");

    let line = replace_until_stable(&NUMBERED_MARKER, &line, "${1}\n${2}");
    let line = replace_until_stable(&BULLET_MARKER, &line, "${1}\n${2}");
    replace_until_stable(&HEADING_MARKER, &line, "${1}\n\n${2}")
}

/// Markers can sit back to back (`1. 2. 3.`), and a match consumes the
/// character the next one needs, so repeat until nothing matches. Each
/// round removes horizontal whitespace, which bounds the loop.
fn replace_until_stable(re: &Regex, text: &str, replacement: &str) -> String {
    let mut current = text.to_string();
    loop {
        match re.replace_all(&current, replacement) {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => current = next,
        }
    }
}
