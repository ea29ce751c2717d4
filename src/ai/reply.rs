//! Locating and decoding structured data inside free-text model replies.
//!
//! Replies are searched in order for a ```` ```json ```` fenced block, then
//! for the first balanced `{ … }` object. Anything that cannot be decoded
//! into the expected record falls back to that record's default, so callers
//! always receive a usable value.

use serde_json::Value;

use super::records::StructuredReply;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Where the structured candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCandidate<'a> {
    /// Content of a ```` ```json ```` fenced block, trimmed.
    TaggedFence(&'a str),
    /// The first balanced object in the reply.
    BareObject(&'a str),
    /// No structured candidate; the whole reply, trimmed.
    Opaque(&'a str),
}

/// Outcome of normalising a reply into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<T> {
    /// The reply decoded into a complete record.
    Decoded(T),
    /// The reply could not be used; the record is the type's fallback.
    Defaulted {
        /// Fallback record.
        record: T,
        /// Why decoding failed.
        reason: String,
    },
}

impl<T> Normalized<T> {
    /// The record, whichever way it was obtained.
    #[must_use]
    pub fn into_record(self) -> T {
        match self {
            Self::Decoded(record) | Self::Defaulted { record, .. } => record,
        }
    }

    /// Reason the fallback was used, if it was.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Decoded(_) => None,
            Self::Defaulted { reason, .. } => Some(reason),
        }
    }
}

/// Finds the structured candidate in `reply`.
#[must_use]
pub fn extract_candidate(reply: &str) -> ReplyCandidate<'_> {
    if let Some(fenced) = tagged_fence(reply) {
        return ReplyCandidate::TaggedFence(fenced);
    }
    first_balanced_object(reply).map_or_else(
        || ReplyCandidate::Opaque(reply.trim()),
        ReplyCandidate::BareObject,
    )
}

fn tagged_fence(reply: &str) -> Option<&str> {
    let (_, after_open) = reply.split_once(JSON_FENCE)?;
    let (inner, _) = after_open.split_once(FENCE)?;
    Some(inner.trim())
}

/// Returns the first `{ … }` span whose braces balance, ignoring braces
/// inside JSON string literals.
fn first_balanced_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let tail = reply.get(start..)?;

    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, character) in tail.char_indices() {
        if in_string {
            match character {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match character {
            '"' => in_string = true,
            '{' => depth = depth.saturating_add(1),
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return tail.get(..=offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Decodes `reply` into `T`, falling back to [`StructuredReply::fallback`]
/// when the reply is opaque, malformed, incomplete, or out of range.
#[must_use]
pub fn normalize<T: StructuredReply>(reply: &str) -> Normalized<T> {
    match decode::<T>(reply) {
        Ok(record) => Normalized::Decoded(record),
        Err(reason) => {
            tracing::debug!("falling back to default record: {reason}");
            Normalized::Defaulted {
                record: T::fallback(&reason),
                reason,
            }
        }
    }
}

fn decode<T: StructuredReply>(reply: &str) -> Result<T, String> {
    let candidate = match extract_candidate(reply) {
        ReplyCandidate::TaggedFence(text) | ReplyCandidate::BareObject(text) => text,
        ReplyCandidate::Opaque(_) => return Err("reply contained no JSON object".to_owned()),
    };

    let value: Value = serde_json::from_str(candidate)
        .map_err(|error| format!("reply JSON was malformed: {error}"))?;
    let Value::Object(fields) = &value else {
        return Err("reply JSON was not an object".to_owned());
    };

    let missing: Vec<&str> = T::REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !fields.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(format!("reply was missing fields: {}", missing.join(", ")));
    }

    let record: T = serde_json::from_value(value)
        .map_err(|error| format!("reply fields had unexpected types: {error}"))?;
    record.validate()?;
    Ok(record)
}
