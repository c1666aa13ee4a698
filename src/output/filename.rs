use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::LawSummary;

/// Longest component kept in a filename, in bytes
pub const MAX_COMPONENT_BYTES: usize = 120;

const FALLBACK_COMPONENT: &str = "unknown";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]+"#).expect("valid regex"));
static REPEATED_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").expect("valid regex"));

/// Turn arbitrary text into something safe to use inside a single path
/// component. Returns `None` when nothing usable is left.
pub fn sanitize_component(value: &str) -> Option<String> {
    let value = WHITESPACE.replace_all(value.trim(), "_");
    let value = UNSAFE_CHARS.replace_all(&value, "_");
    let value = REPEATED_UNDERSCORES.replace_all(&value, "_");
    let value = truncate_at_char_boundary(&value, MAX_COMPONENT_BYTES);
    let value = value.trim_matches(|c| c == '_' || c == '.');

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn truncate_at_char_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Build `{law_num}_{law_name}.json`. Missing or unusable components fall
/// back to the law ID, then to `unknown`, so the result is never empty.
pub fn law_filename(law_id: &str, law_num: Option<&str>, law_name: Option<&str>) -> String {
    let id = sanitize_component(law_id).unwrap_or_else(|| FALLBACK_COMPONENT.to_string());
    let num = law_num.and_then(sanitize_component).unwrap_or_else(|| id.clone());
    let name = law_name.and_then(sanitize_component).unwrap_or_else(|| id.clone());
    format!("{}_{}.json", num, name)
}

/// Output filename for a listed law
pub fn summary_filename(summary: &LawSummary) -> String {
    law_filename(
        &summary.law_id,
        summary.law_num.as_deref(),
        summary.law_name.as_deref(),
    )
}
