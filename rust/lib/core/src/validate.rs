use std::sync::LazyLock;

use regex::Regex;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("domain pattern compiles")
});

/// Loose hostname check used before calling the domain verifier:
/// letters, digits, dots and hyphens, ending in an alphabetic TLD of two or
/// more characters.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

/// True when `value` is non-empty after trimming.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}
