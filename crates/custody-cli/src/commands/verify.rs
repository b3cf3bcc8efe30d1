//! Verify command implementation.

use custody_core::{
    verify_against_capture, verify_masters, CaptureBundle, ExportDocument, VerificationReport,
    VerificationVerdict,
};
use crate::output;

pub fn run(
    artifact: String,
    capture: Option<String>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let artifact_str = std::fs::read_to_string(&artifact)
        .map_err(|e| format!("Failed to read artifact {}: {}", artifact, e))?;
    let document: ExportDocument = serde_json::from_str(&artifact_str)
        .map_err(|e| format!("Invalid export artifact: {}", e))?;

    let report: VerificationReport = match capture {
        Some(path) => {
            let bundle_str = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read capture bundle {}: {}", path, e))?;
            let bundle: CaptureBundle = serde_json::from_str(&bundle_str)
                .map_err(|e| format!("Invalid capture bundle: {}", e))?;
            verify_against_capture(&document.integrity, &bundle.pages)?
        }
        None => verify_masters(&document.integrity)?,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if !report.pages.is_empty() {
            output::print_page_table_header();
            for page in &report.pages {
                println!("{}", output::format_page_verdict_row(page));
            }
        }
        println!("Masters: {}", if report.masters_ok { "ok" } else { "MISMATCH" });
        println!("Verdict: {:?}", report.verdict);
    }

    if strict && report.verdict != VerificationVerdict::Ok {
        std::process::exit(1);
    }

    Ok(())
}
