use custody_canonical::ChatId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::integrity::ExportIntegrity;
use crate::page::{CaptureBundle, Participant};

/// Session metadata recorded alongside the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Conversation identifier.
    pub chat_id: ChatId,
    /// API endpoint the pages came from.
    pub api_endpoint: String,
    /// Capture method description.
    pub export_method: String,
    /// OAuth scope the capture ran under.
    pub token_scope: String,
    /// Version of this tool.
    pub tool_version: String,
    /// Total messages across all pages.
    pub total_messages: u64,
    /// Total captured pages.
    pub total_pages: u64,
}

impl SessionMetadata {
    /// Builds session metadata for a Graph v1.0 capture of `bundle`.
    pub fn for_bundle(bundle: &CaptureBundle, tool_version: &str) -> Self {
        SessionMetadata {
            chat_id: bundle.chat_id.clone(),
            api_endpoint: format!("/chats/{}/messages", bundle.chat_id.as_ref()),
            export_method: "Microsoft Graph API v1.0".to_string(),
            token_scope: "Chat.Read".to_string(),
            tool_version: tool_version.to_string(),
            total_messages: bundle.message_count() as u64,
            total_pages: bundle.pages.len() as u64,
        }
    }
}

/// The final export artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// All message records in page order, unmodified API shapes.
    pub messages: Vec<Value>,
    /// Conversation participants.
    pub participants: Vec<Participant>,
    /// Session metadata for this export run.
    pub session: SessionMetadata,
    /// Integrity block: per-page records plus master digests.
    pub integrity: ExportIntegrity,
}

/// Merges messages, participants, session metadata, and the integrity
/// block into the final artifact.
///
/// Pure assembly: digests are consumed as produced, never recomputed.
pub fn assemble_export(
    bundle: &CaptureBundle,
    integrity: ExportIntegrity,
    session: SessionMetadata,
) -> ExportDocument {
    let mut messages = Vec::new();
    for page in &bundle.pages {
        if let Some(page_messages) = page.messages() {
            messages.extend(page_messages.iter().cloned());
        }
    }

    ExportDocument {
        messages,
        participants: bundle.effective_participants(),
        session,
        integrity,
    }
}
