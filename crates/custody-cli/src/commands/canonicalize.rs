//! Canonicalize command implementation.

use custody_canonical::Canonicalizer;
use custody_core::{canonicalize_page, CaptureBundle};
use std::io::{self, Read};

pub fn run(input: Option<String>, page: usize) -> Result<(), Box<dyn std::error::Error>> {
    let bundle_str = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let bundle: CaptureBundle =
        serde_json::from_str(&bundle_str).map_err(|e| format!("Invalid capture bundle: {}", e))?;

    let raw_page = bundle
        .pages
        .get(page)
        .ok_or_else(|| format!("Bundle has {} pages; no page {}", bundle.pages.len(), page))?;

    let canonical_page = canonicalize_page(raw_page, page)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    let value = serde_json::to_value(&canonical_page)?;

    let canonicalizer = Canonicalizer::new();
    let bytes = canonicalizer
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
