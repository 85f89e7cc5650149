//! Text helpers for API-sourced fields.
//!
//! The recipe API returns HTML-tagged text in summaries and instructions;
//! markup is stripped before any display.

use regex::Regex;
use std::sync::OnceLock;

static TAG_RE: OnceLock<Regex> = OnceLock::new();

/// Strip HTML markup tags from a text field.
pub fn strip_html(text: &str) -> String {
    let re = TAG_RE.get_or_init(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern compiles"));
    re.replace_all(text, "").into_owned()
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
