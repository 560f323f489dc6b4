use once_cell::sync::Lazy;
use regex::Regex;

/// Color used when a dataset record carries a malformed color.
pub const DEFAULT_FALLBACK_COLOR: &str = "#94a3b8";

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#[0-9a-f]{6}$").expect("hex color pattern is valid")
});

/// True iff `color` is exactly `#` followed by six hex digits.
pub fn is_valid_color(color: &str) -> bool {
    COLOR_RE.is_match(color)
}

/// Return `color` unchanged when valid, otherwise `fallback`.
pub fn sanitize_color<'a>(color: &'a str, fallback: &'a str) -> &'a str {
    if is_valid_color(color) { color } else { fallback }
}

/// [`sanitize_color`] with [`DEFAULT_FALLBACK_COLOR`].
pub fn sanitize_color_or_default(color: &str) -> &str {
    sanitize_color(color, DEFAULT_FALLBACK_COLOR)
}
