//! Inspect command implementation.

use custody_core::{html, ExportDocument};
use serde_json::{json, Value};

pub fn run(artifact: String, preview: usize) -> Result<(), Box<dyn std::error::Error>> {
    let artifact_str = std::fs::read_to_string(&artifact)
        .map_err(|e| format!("Failed to read artifact {}: {}", artifact, e))?;
    let document: ExportDocument = serde_json::from_str(&artifact_str)
        .map_err(|e| format!("Invalid export artifact: {}", e))?;

    let first_message = document
        .messages
        .first()
        .and_then(|m| m.get("createdDateTime"))
        .and_then(Value::as_str);
    let last_message = document
        .messages
        .last()
        .and_then(|m| m.get("createdDateTime"))
        .and_then(Value::as_str);

    let previews: Vec<Value> = document
        .messages
        .iter()
        .take(preview)
        .map(|m| {
            let sender = m
                .get("from")
                .and_then(|f| f.get("user"))
                .and_then(|u| u.get("displayName"))
                .and_then(Value::as_str)
                .unwrap_or("Unidentified user");
            let body = m
                .get("body")
                .and_then(|b| b.get("content"))
                .and_then(Value::as_str)
                .unwrap_or("");
            json!({
                "from": sender,
                "sent_at": m.get("createdDateTime").and_then(Value::as_str),
                "text": html::strip_html(body)
            })
        })
        .collect();

    let output = json!({
        "chat_id": document.session.chat_id.as_ref(),
        "tool_version": document.session.tool_version,
        "total_messages": document.session.total_messages,
        "total_pages": document.session.total_pages,
        "participants": document.participants,
        "first_message_at": first_message,
        "last_message_at": last_message,
        "integrity": {
            "export_timestamp_utc": document.integrity.export_timestamp_utc.as_ref(),
            "master_content_hash": document.integrity.master_content_hash.b64,
            "master_forensic_hash": document.integrity.master_forensic_hash.b64,
            "pages": document.integrity.pages.len()
        },
        "preview": previews
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
