//! Syntax checks for template keys and values

/// Punctuation allowed in values besides ASCII alphanumerics
const VALUE_EXTRA_CHARS: &[char] = &['_', '-', '/', '.'];

/// Check a template key.
///
/// Keys start with an ASCII letter and continue with ASCII letters or digits.
pub fn validate_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Check a template value against `max_len` (in bytes).
///
/// Values are restricted to path-like text: ASCII alphanumerics plus `_ - / .`,
/// never containing `..`.
pub fn validate_value(value: &str, max_len: usize) -> bool {
    if value.is_empty() || value.len() > max_len || value.contains("..") {
        return false;
    }

    value
        .chars()
        .all(|c| !c.is_control() && (c.is_ascii_alphanumeric() || VALUE_EXTRA_CHARS.contains(&c)))
}
