//! Excerpts from raw MDX: the text above the first truncate marker, with
//! Markdown syntax stripped.

use std::sync::LazyLock;

use regex::Regex;

/// `<!-- truncate -->` or `{/* truncate */}`, whitespace tolerant.
static TRUNCATE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*truncate\s*-->|\{/\*\s*truncate\s*\*/\}").expect("valid regex")
});

static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\r?\n.*?\r?\n---[ \t]*(?:\r?\n|\z)").expect("valid regex"));

/// Ordered rewrites; images must go before links.
static STRIP_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"!\[[^\]]*\]\([^)]*\)", ""),
        (r"\[([^\]]*)\]\([^)]*\)", "$1"),
        (r"(?m)^[ \t]*#{1,6}[ \t]+", ""),
        (r"(?m)^[ \t]*>[ \t]?", ""),
        (r"(?m)^[ \t]*(?:[-*+]|\d+\.)[ \t]+", ""),
        (r"\*\*([^*]+)\*\*", "$1"),
        (r"__([^_]+)__", "$1"),
        (r"\*([^*]+)\*", "$1"),
        (r"\b_([^_]+)_\b", "$1"),
        (r"`([^`]+)`", "$1"),
        (r"\n[ \t]*\n(?:[ \t]*\n)*", " "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

pub fn has_truncate_marker(source: &str) -> bool {
    TRUNCATE_MARKER.is_match(source)
}

/// Returns the plain-text excerpt above the first truncate marker.
///
/// `None` when the source has no marker, or nothing but syntax above it.
pub fn extract_excerpt(source: &str) -> Option<String> {
    let marker = TRUNCATE_MARKER.find(source)?;
    let before = &source[..marker.start()];

    let mut text = FRONT_MATTER.replace(before, "").into_owned();
    for (pattern, replacement) in STRIP_RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
