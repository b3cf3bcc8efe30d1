use custody_canonical::{
    sha256_chain, sha256_with_domain, CanonicalizationError, Canonicalizer, Digest, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::content::canonicalize_page;
use crate::errors::IntegrityError;
use crate::page::RawPage;

/// Domain separator for per-page content digests.
const PAGE_CONTENT_DOMAIN: &[u8] = b"custody:page-content:v1\0";
/// Domain separator for per-page forensic digests.
const PAGE_FORENSIC_DOMAIN: &[u8] = b"custody:page-forensic:v1\0";
/// Domain separator for the master content digest.
const MASTER_CONTENT_DOMAIN: &[u8] = b"custody:master-content:v1\0";
/// Domain separator for the master forensic digest.
const MASTER_FORENSIC_DOMAIN: &[u8] = b"custody:master-forensic:v1\0";

/// Integrity record for one captured page. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIntegrityRecord {
    /// 0-based page index; defines combination order.
    pub index: u64,
    /// Digest of the page's canonical content form.
    pub content_hash: Digest,
    /// Digest of the complete raw page, capture metadata included.
    pub forensic_hash: Digest,
}

/// The two master digests covering a whole export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterDigests {
    /// Order-sensitive combination of all page content digests.
    pub content: Digest,
    /// Order-sensitive combination of all page forensic digests.
    pub forensic: Digest,
}

/// Integrity block embedded in the export artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportIntegrity {
    /// Per-page records, in page order.
    pub pages: Vec<PageIntegrityRecord>,
    /// Master digest over all page content digests.
    pub master_content_hash: Digest,
    /// Master digest over all page forensic digests.
    pub master_forensic_hash: Digest,
    /// When the export run completed, UTC.
    pub export_timestamp_utc: Timestamp,
}

/// Builds the integrity record for one page.
///
/// The content digest hashes the canonical content form; the forensic
/// digest hashes the complete raw page as captured. The page itself is
/// never mutated.
pub fn build_page_record(
    page: &RawPage,
    index: usize,
) -> Result<PageIntegrityRecord, IntegrityError> {
    let canonicalizer = Canonicalizer::new();
    let serialization = |source| IntegrityError::Serialization {
        page_index: index,
        source,
    };

    let canonical_page = canonicalize_page(page, index)?;
    let content_value = serde_json::to_value(&canonical_page)
        .map_err(|e| serialization(CanonicalizationError::Other(e.to_string())))?;
    let content_bytes = canonicalizer
        .canonicalize(&content_value)
        .map_err(serialization)?;
    let content_hash = sha256_with_domain(PAGE_CONTENT_DOMAIN, &content_bytes);

    let forensic_value = serde_json::to_value(page)
        .map_err(|e| serialization(CanonicalizationError::Other(e.to_string())))?;
    let forensic_bytes = canonicalizer
        .canonicalize(&forensic_value)
        .map_err(serialization)?;
    let forensic_hash = sha256_with_domain(PAGE_FORENSIC_DOMAIN, &forensic_bytes);

    Ok(PageIntegrityRecord {
        index: index as u64,
        content_hash,
        forensic_hash,
    })
}

/// Combines per-page digests into the two master digests.
///
/// Pure function over the explicit record sequence. Each family combines
/// only digests of its own kind, in record order, length-prefixed under
/// its own domain separator, so reordering, adding, removing, or altering
/// any page changes the corresponding master.
pub fn aggregate_master(
    records: &[PageIntegrityRecord],
) -> Result<MasterDigests, IntegrityError> {
    let mut content_parts = Vec::with_capacity(records.len());
    let mut forensic_parts = Vec::with_capacity(records.len());
    for record in records {
        let digest_err = |source| IntegrityError::Digest {
            page_index: record.index as usize,
            source,
        };
        content_parts.push(record.content_hash.decode().map_err(digest_err)?);
        forensic_parts.push(record.forensic_hash.decode().map_err(digest_err)?);
    }

    let content = sha256_chain(
        MASTER_CONTENT_DOMAIN,
        content_parts.iter().map(Vec::as_slice),
    );
    let forensic = sha256_chain(
        MASTER_FORENSIC_DOMAIN,
        forensic_parts.iter().map(Vec::as_slice),
    );

    Ok(MasterDigests { content, forensic })
}

/// Runs the whole integrity pipeline over the captured pages.
///
/// Pages are processed sequentially in capture order. The first failure
/// aborts the run: a skipped page would make the master digests
/// unverifiable without detection, so no partial block is ever produced.
pub fn build_export_integrity(
    pages: &[RawPage],
    export_timestamp_utc: Timestamp,
) -> Result<ExportIntegrity, IntegrityError> {
    let mut records = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        records.push(build_page_record(page, index)?);
    }

    let masters = aggregate_master(&records)?;

    Ok(ExportIntegrity {
        pages: records,
        master_content_hash: masters.content,
        master_forensic_hash: masters.forensic,
        export_timestamp_utc,
    })
}
