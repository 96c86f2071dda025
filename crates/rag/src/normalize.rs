//! Text normalization applied before chunking or prompting.
//!
//! Whitespace is collapsed (paragraph breaks are not kept), characters outside
//! a conservative ASCII set are dropped, and the result is cut at a character
//! ceiling. None of this can fail.

/// Default ceiling, sized to keep one AI call within its request budget.
pub const DEFAULT_MAX_CHARS: usize = 50_000;

/// Normalized text plus what was lost getting there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// Characters in the cleaned text before the ceiling was applied.
    pub cleaned_chars: usize,
    pub truncated: bool,
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '-' | '(' | ')')
}

/// Normalize with [`DEFAULT_MAX_CHARS`].
pub fn normalize(raw: &str) -> String {
    normalize_with_limit(raw, DEFAULT_MAX_CHARS)
}

/// `None` stands in for absent input and normalizes to an empty string.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

pub fn normalize_with_limit(raw: &str, max_chars: usize) -> String {
    normalize_checked(raw, max_chars).text
}

/// Normalize and report whether the ceiling cut anything off.
pub fn normalize_checked(raw: &str, max_chars: usize) -> Normalized {
    let mut cleaned = String::with_capacity(raw.len().min(max_chars.saturating_add(1)));
    let mut cleaned_chars = 0usize;
    let mut pending_space = false;

    for c in raw.chars().filter(|c| is_safe(*c)) {
        if c.is_whitespace() {
            pending_space = cleaned_chars > 0;
            continue;
        }
        if pending_space {
            cleaned_chars += 1;
            if cleaned_chars <= max_chars {
                cleaned.push(' ');
            }
            pending_space = false;
        }
        cleaned_chars += 1;
        if cleaned_chars <= max_chars {
            cleaned.push(c);
        }
    }

    Normalized {
        text: cleaned,
        cleaned_chars,
        truncated: cleaned_chars > max_chars,
    }
}
