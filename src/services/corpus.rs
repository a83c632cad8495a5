// src/services/corpus.rs

//! Corpus assembly.

use std::collections::HashSet;

use crate::models::StructuralSlots;

/// Join structural texts and page texts into one corpus with repeated lines
/// removed.
pub fn assemble(slots: &StructuralSlots, page_texts: &[String]) -> String {
    let blocks: Vec<&str> = slots
        .texts()
        .chain(page_texts.iter().map(String::as_str))
        .collect();
    dedupe_lines(&blocks.join("\n"))
}

/// Keep each distinct line at its first occurrence.
///
/// Lines compare without their terminator; kept lines retain theirs.
pub fn dedupe_lines(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut out = String::with_capacity(text.len());

    for (content, line) in lines_with_terminators(text) {
        if seen.insert(content) {
            out.push_str(line);
        }
    }
    out
}

/// Line boundaries: `\r\n` and every single-character break, including the
/// ASCII separators `\x0b`, `\x0c`, `\x1c`-`\x1e` and Unicode `\u{85}`,
/// `\u{2028}`, `\u{2029}`.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split into `(content, content + terminator)` pairs.
fn lines_with_terminators(text: &str) -> Vec<(&str, &str)> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            end += 1;
        }
        lines.push((&text[start..i], &text[start..end]));
        start = end;
    }
    if start < text.len() {
        lines.push((&text[start..], &text[start..]));
    }
    lines
}
