//! Dual-hash integrity pipeline for paginated conversation exports.
//!
//! This crate provides:
//! - Explicit schemas for captured API pages (`RawPage`, `CaptureBundle`)
//! - Content-only canonicalization of a page's messages (`CanonicalPage`)
//! - Per-page integrity records pairing a content digest with a forensic
//!   digest (`PageIntegrityRecord`)
//! - Order-sensitive master aggregation across all pages (`ExportIntegrity`)
//! - Final artifact assembly (`ExportDocument`) and offline re-verification
//!
//! Core invariants:
//! - The content digest is a pure function of conversation content: two
//!   captures of the same unchanged conversation hash identically, no
//!   matter when they were taken.
//! - The forensic digest covers the complete raw response, volatile
//!   metadata included, so distinct capture instants normally differ.
//! - The two digest families never mix: master digests combine only
//!   digests of their own kind, in page order, length-prefixed.
//! - Pages are processed sequentially and fail fast: a malformed page
//!   aborts the run with its index and no integrity block is produced.
//!
#![deny(missing_docs)]

/// Content-only canonicalization of raw pages.
pub mod content;
/// Error types for the integrity pipeline.
pub mod errors;
/// Export artifact assembly.
pub mod export;
/// HTML stripping for human-readable message previews.
pub mod html;
/// Page integrity records and master aggregation.
pub mod integrity;
/// Captured page and bundle schemas.
pub mod page;
/// Offline verification of export artifacts.
pub mod verify;

pub use content::{canonicalize_page, CanonicalMessage, CanonicalPage};
pub use errors::IntegrityError;
pub use export::{assemble_export, ExportDocument, SessionMetadata};
pub use integrity::{
    aggregate_master, build_export_integrity, build_page_record, ExportIntegrity, MasterDigests,
    PageIntegrityRecord,
};
pub use page::{CaptureBundle, CaptureInfo, Participant, RawPage};
pub use verify::{
    verify_against_capture, verify_masters, PageVerdict, VerificationReport, VerificationVerdict,
};
