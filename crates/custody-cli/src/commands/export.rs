//! Export command implementation.

use custody_canonical::Timestamp;
use custody_core::{assemble_export, build_export_integrity, CaptureBundle, SessionMetadata};

pub fn run(capture: String, output: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let bundle_str = std::fs::read_to_string(&capture)
        .map_err(|e| format!("Failed to read capture bundle {}: {}", capture, e))?;
    let bundle: CaptureBundle = serde_json::from_str(&bundle_str)
        .map_err(|e| format!("Invalid capture bundle: {}", e))?;

    // Export timestamp in RFC3339 format, UTC.
    let now_utc = chrono::Utc::now();
    let export_timestamp = Timestamp::parse(&format!("{}Z", now_utc.format("%Y-%m-%dT%H:%M:%S")))
        .map_err(|e| format!("Failed to create timestamp: {}", e))?;

    let integrity = build_export_integrity(&bundle.pages, export_timestamp)?;
    let session = SessionMetadata::for_bundle(&bundle, env!("CARGO_PKG_VERSION"));
    let document = assemble_export(&bundle, integrity, session);

    let serialized = serde_json::to_string_pretty(&document)?;
    match output {
        Some(path) => {
            std::fs::write(&path, serialized)
                .map_err(|e| format!("Failed to write artifact {}: {}", path, e))?;
            println!("Export written: {}", path);
            println!("Pages: {}", document.session.total_pages);
            println!("Messages: {}", document.session.total_messages);
            println!(
                "Master content hash: {}",
                document.integrity.master_content_hash.b64
            );
            println!(
                "Master forensic hash: {}",
                document.integrity.master_forensic_hash.b64
            );
        }
        None => println!("{}", serialized),
    }

    Ok(())
}
