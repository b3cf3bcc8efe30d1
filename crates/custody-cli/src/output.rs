//! Output formatting utilities.

use custody_core::PageVerdict;

/// Formats a per-page verdict as a simple table row.
pub fn format_page_verdict_row(page: &PageVerdict) -> String {
    format!(
        "{:<8} {:<10} {}",
        page.index,
        status(page.content_ok),
        status(page.forensic_ok)
    )
}

/// Prints the page verdict table header.
#[allow(clippy::print_literal)]
pub fn print_page_table_header() {
    println!("{:<8} {:<10} {}", "PAGE", "CONTENT", "FORENSIC");
    println!("{}", "-".repeat(30));
}

fn status(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "MISMATCH"
    }
}
