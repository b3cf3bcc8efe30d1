use custody_canonical::{ChatId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Transport metadata recorded when a page was retrieved.
///
/// Every field is optional: bundles assembled from archived responses may
/// not have kept the request context. Whatever is present participates in
/// the forensic hash; none of it participates in the content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureInfo {
    /// URL the page was requested from (including pagination cursor).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_url: Option<String>,
    /// When the response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<Timestamp>,
    /// HTTP status code of the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Any further transport metadata the capture recorded (response
    /// headers, request ids). Preserved verbatim so it participates in
    /// the forensic hash like every other capture field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One captured pagination step: the unmodified API response plus its
/// capture metadata. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// Capture-time transport metadata (volatile; forensic-only).
    #[serde(default)]
    pub capture: CaptureInfo,
    /// Complete response body as returned by the API, including
    /// `value`, `@odata.nextLink`, and any other server fields.
    pub body: Value,
}

impl RawPage {
    /// Raw message records of this page, if the body carries a `value` array.
    pub fn messages(&self) -> Option<&[Value]> {
        self.body.get("value").and_then(Value::as_array).map(Vec::as_slice)
    }
}

/// A conversation participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Participant {
    /// Display name as reported by the API.
    pub display_name: String,
    /// Email address, when the members endpoint provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Input to the pipeline: everything the retrieval collaborator captured
/// for one conversation, in the order the pages were received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureBundle {
    /// Conversation identifier.
    pub chat_id: ChatId,
    /// Participants from the members endpoint, if it was reachable.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Captured pages, ordered as retrieved.
    pub pages: Vec<RawPage>,
}

impl CaptureBundle {
    /// Participants for the export: the captured member list when present,
    /// otherwise the sender display names recovered from the messages.
    pub fn effective_participants(&self) -> Vec<Participant> {
        if !self.participants.is_empty() {
            return self.participants.clone();
        }
        participants_from_messages(&self.pages)
    }

    /// Total number of message records across all pages.
    pub fn message_count(&self) -> usize {
        self.pages
            .iter()
            .map(|p| p.messages().map_or(0, <[Value]>::len))
            .sum()
    }
}

/// Recovers participant names from message senders.
///
/// Fallback for captures where the members endpoint was not accessible.
/// Names are deduplicated and sorted so the result is deterministic.
pub fn participants_from_messages(pages: &[RawPage]) -> Vec<Participant> {
    let mut names = BTreeSet::new();
    for page in pages {
        let Some(messages) = page.messages() else {
            continue;
        };
        for message in messages {
            let display_name = message
                .get("from")
                .and_then(|f| f.get("user"))
                .and_then(|u| u.get("displayName"))
                .and_then(Value::as_str)
                .map(str::trim);
            if let Some(name) = display_name {
                if !name.is_empty() {
                    names.insert(name.to_string());
                }
            }
        }
    }
    names
        .into_iter()
        .map(|display_name| Participant {
            display_name,
            email: None,
        })
        .collect()
}
