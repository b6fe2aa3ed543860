//! Query builders and async helpers, one module per table group.

pub mod calendar;
pub mod event;
pub mod invitation;
pub mod membership;
pub mod session;
pub mod user;

/// ## Summary
/// Escapes `LIKE` wildcards and wraps the needle for a substring match.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
