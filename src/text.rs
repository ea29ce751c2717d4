//! Character-bounded text helpers.
//!
//! All limits count Unicode scalar values rather than bytes so that
//! truncation never splits a multi-byte character.

use std::borrow::Cow;

/// Marker appended to payloads that were cut at their ceiling.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Returns at most `max_chars` leading characters of `text`.
#[must_use]
pub fn leading_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => text.get(..byte_offset).unwrap_or(text),
        None => text,
    }
}

/// Bounds `payload` to `ceiling` characters, appending [`TRUNCATION_MARKER`]
/// when anything was removed.
///
/// Payloads at or below the ceiling are returned unchanged and unmarked.
#[must_use]
pub fn truncate_with_marker(payload: &str, ceiling: usize) -> Cow<'_, str> {
    let kept = leading_chars(payload, ceiling);
    if kept.len() == payload.len() {
        return Cow::Borrowed(payload);
    }

    let mut bounded = String::with_capacity(kept.len() + TRUNCATION_MARKER.len());
    bounded.push_str(kept);
    bounded.push_str(TRUNCATION_MARKER);
    Cow::Owned(bounded)
}

/// Shortens `message` for inclusion in an error string, appending `...` when
/// it was cut.
#[must_use]
pub fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let kept = leading_chars(message, max_chars);
    if kept.len() == message.len() {
        return message.to_owned();
    }
    format!("{kept}...")
}

/// Uppercases the first character of `word`.
#[must_use]
pub fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
