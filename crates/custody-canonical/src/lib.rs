//! Deterministic serialization and digest primitives for custody artifacts.
//!
//! Everything that participates in hashing lives behind this crate: the
//! RFC 8785 canonicalizer that turns JSON values into stable bytes, the
//! SHA-256 digest type carried inside integrity records, and the validated
//! identifier newtypes shared across the workspace.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives and domain-separated hashing.
pub mod digest;
/// Validated identifier newtypes (chat ids, timestamps).
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use digest::{sha256_chain, sha256_with_domain, Digest, DigestAlg};
pub use identifiers::{ChatId, Timestamp};
pub use validation::ValidationError;
