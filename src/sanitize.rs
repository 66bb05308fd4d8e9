//! Free-text cleanup and format checks for form fields.
//!
//! DESIGN
//! ======
//! Pattern-based stripping, not an HTML sanitizer. Output is meant for
//! display and storage of contact submissions; residual injection vectors
//! (malformed tags, entity tricks) are accepted for this use.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum characters kept by [`sanitize_input`].
pub const MAX_INPUT_CHARS: usize = 2000;

/// Maximum characters accepted by [`validate_email`].
pub const MAX_EMAIL_CHARS: usize = 254;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("invalid script pattern"));

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag pattern"));

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));

/// Trim, drop `<script>` blocks and remaining tags, then cap at
/// [`MAX_INPUT_CHARS`] characters.
#[must_use]
pub fn sanitize_input(text: &str) -> String {
    let trimmed = text.trim();
    let without_scripts = SCRIPT_BLOCK.replace_all(trimmed, "");
    let without_tags = HTML_TAG.replace_all(&without_scripts, "");
    without_tags.chars().take(MAX_INPUT_CHARS).collect()
}

/// `local@domain.tld` shape check, at most [`MAX_EMAIL_CHARS`] characters.
#[must_use]
pub fn validate_email(text: &str) -> bool {
    text.chars().count() <= MAX_EMAIL_CHARS && EMAIL_SHAPE.is_match(text)
}

/// True iff the trimmed text has at least `min_length` characters.
#[must_use]
pub fn validate_required(text: &str, min_length: usize) -> bool {
    text.trim().chars().count() >= min_length
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
