use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::IntegrityError;
use crate::page::RawPage;

/// Content-only projection of one message.
///
/// Exactly these five fields participate in the content hash. Everything
/// else the API returns (attachments, reactions, mentions, display names,
/// `@odata` metadata) is covered only by the forensic hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    /// Server-assigned message identifier.
    pub id: String,
    /// Sender identifier (`from.user.id`); absent for system messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// Message body content, exactly as returned (HTML included).
    pub body: String,
    /// When the message was sent (`createdDateTime`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    /// Whether the message carries an edit marker.
    pub edited: bool,
}

/// Deterministic, content-only form of a captured page.
///
/// Two `CanonicalPage` values are equal iff the conversation content is
/// equal, independent of when or how the pages were captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPage {
    /// Messages in stable order: ascending by id, ties by sent timestamp.
    pub messages: Vec<CanonicalMessage>,
}

/// Extracts the deterministic content subset of a raw page.
///
/// Fails with [`IntegrityError::MalformedPage`] when the page has no
/// `value` array or a message is missing its `id` or `body.content`. A
/// present-but-empty `value` array is valid and yields an empty page.
pub fn canonicalize_page(
    page: &RawPage,
    page_index: usize,
) -> Result<CanonicalPage, IntegrityError> {
    let raw_messages = page.messages().ok_or_else(|| IntegrityError::MalformedPage {
        page_index,
        reason: "response body has no `value` array".to_string(),
    })?;

    let mut messages = Vec::with_capacity(raw_messages.len());
    for (position, raw) in raw_messages.iter().enumerate() {
        messages.push(canonicalize_message(raw, page_index, position)?);
    }

    // Stable order regardless of how the server happened to page.
    messages.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.sent_at.cmp(&b.sent_at)));

    Ok(CanonicalPage { messages })
}

fn canonicalize_message(
    raw: &Value,
    page_index: usize,
    position: usize,
) -> Result<CanonicalMessage, IntegrityError> {
    let malformed = |reason: String| IntegrityError::MalformedPage { page_index, reason };

    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("message {} is missing `id`", position)))?
        .to_string();

    let body = raw
        .get("body")
        .and_then(|b| b.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("message {} is missing `body.content`", position)))?
        .to_string();

    let sender_id = raw
        .get("from")
        .and_then(|f| f.get("user"))
        .and_then(|u| u.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let sent_at = raw
        .get("createdDateTime")
        .and_then(Value::as_str)
        .map(str::to_string);

    let edited = raw
        .get("lastEditedDateTime")
        .map(|v| !v.is_null())
        .unwrap_or(false);

    Ok(CanonicalMessage {
        id,
        sender_id,
        body,
        sent_at,
        edited,
    })
}
