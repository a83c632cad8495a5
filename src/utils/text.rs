// src/utils/text.rs

//! Text normalization applied to everything that enters the corpus.

use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("static regex"));
static REPEATED_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("static regex"));

/// Lowercase, drop ASCII punctuation, squeeze spaces/tabs and blank lines.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
/// ```
/// use site_corpus::utils::text::normalize;
///
/// assert_eq!(normalize("Hello,  World!!\n\n\nBye"), "hello world\nbye");
/// ```
pub fn normalize(raw: &str) -> String {
    let lowered: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let squeezed = HORIZONTAL_WS.replace_all(&lowered, " ");
    BLANK_LINES.replace_all(&squeezed, "\n").into_owned()
}

/// Replace every run of line breaks with a single one.
pub fn collapse_line_breaks(text: &str) -> String {
    REPEATED_NEWLINES.replace_all(text, "\n").into_owned()
}
