use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Drops script/style elements with their bodies, strips every remaining
/// `<...>` sequence, then trims whitespace.
pub fn sanitize(input: &str) -> String {
    let without_blocks = SCRIPT_BLOCK_RE.replace_all(input, "");
    TAG_RE.replace_all(&without_blocks, "").trim().to_string()
}

/// Sanitizes an optional field, treating absence as the empty string.
pub fn sanitize_opt(input: Option<&str>) -> String {
    input.map(sanitize).unwrap_or_default()
}

/// Basic `local@domain.tld` shape check. Callers sanitize first.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}
