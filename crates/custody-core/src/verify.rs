use serde::Serialize;

use crate::errors::IntegrityError;
use crate::integrity::{aggregate_master, build_page_record, ExportIntegrity};
use crate::page::RawPage;

/// Outcome of a verification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationVerdict {
    /// Recomputed digests match the claimed digests.
    Ok,
    /// At least one digest differs.
    Mismatch,
}

/// Per-page comparison against a capture bundle.
#[derive(Debug, Clone, Serialize)]
pub struct PageVerdict {
    /// 0-based page index.
    pub index: u64,
    /// Whether the recomputed content digest matches.
    pub content_ok: bool,
    /// Whether the recomputed forensic digest matches.
    pub forensic_ok: bool,
}

/// Full verification report.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// Per-page verdicts (empty for a masters-only check).
    pub pages: Vec<PageVerdict>,
    /// Whether both recomputed master digests match the claimed ones.
    pub masters_ok: bool,
    /// Overall verdict.
    pub verdict: VerificationVerdict,
}

/// Checks an integrity block's internal consistency.
///
/// Recomputes both master digests from the block's own page records and
/// verifies that page indexes are contiguous from zero. This detects
/// tampering with the masters or reordering of records, but cannot detect
/// a forged per-page digest; use [`verify_against_capture`] for that.
pub fn verify_masters(
    integrity: &ExportIntegrity,
) -> Result<VerificationReport, IntegrityError> {
    for (position, record) in integrity.pages.iter().enumerate() {
        if record.index != position as u64 {
            return Err(IntegrityError::InvalidArtifact(format!(
                "page record at position {} carries index {}",
                position, record.index
            )));
        }
    }

    let masters = aggregate_master(&integrity.pages)?;
    let masters_ok = masters.content == integrity.master_content_hash
        && masters.forensic == integrity.master_forensic_hash;

    Ok(VerificationReport {
        pages: Vec::new(),
        masters_ok,
        verdict: if masters_ok {
            VerificationVerdict::Ok
        } else {
            VerificationVerdict::Mismatch
        },
    })
}

/// Replays the whole pipeline over a capture bundle's pages and compares
/// every digest against the claimed integrity block.
pub fn verify_against_capture(
    integrity: &ExportIntegrity,
    pages: &[RawPage],
) -> Result<VerificationReport, IntegrityError> {
    if integrity.pages.len() != pages.len() {
        return Err(IntegrityError::InvalidArtifact(format!(
            "artifact records {} pages but capture has {}",
            integrity.pages.len(),
            pages.len()
        )));
    }

    let mut page_verdicts = Vec::with_capacity(pages.len());
    let mut all_pages_ok = true;
    for (index, (claimed, page)) in integrity.pages.iter().zip(pages).enumerate() {
        let recomputed = build_page_record(page, index)?;
        let content_ok = recomputed.content_hash == claimed.content_hash;
        let forensic_ok = recomputed.forensic_hash == claimed.forensic_hash;
        all_pages_ok = all_pages_ok && content_ok && forensic_ok;
        page_verdicts.push(PageVerdict {
            index: index as u64,
            content_ok,
            forensic_ok,
        });
    }

    let masters = aggregate_master(&integrity.pages)?;
    let masters_ok = masters.content == integrity.master_content_hash
        && masters.forensic == integrity.master_forensic_hash;

    let ok = all_pages_ok && masters_ok;
    Ok(VerificationReport {
        pages: page_verdicts,
        masters_ok,
        verdict: if ok {
            VerificationVerdict::Ok
        } else {
            VerificationVerdict::Mismatch
        },
    })
}
