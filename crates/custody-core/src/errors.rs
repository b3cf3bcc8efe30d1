use thiserror::Error;

/// Errors that can occur in the integrity pipeline.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// A page is missing a required content field.
    #[error("malformed page {page_index}: {reason}")]
    MalformedPage {
        /// 0-based index of the failing page.
        page_index: usize,
        /// Which required field is missing or ill-typed.
        reason: String,
    },
    /// A page could not be deterministically serialized.
    #[error("page {page_index} cannot be serialized: {source}")]
    Serialization {
        /// 0-based index of the failing page.
        page_index: usize,
        /// Underlying canonicalization failure.
        #[source]
        source: custody_canonical::CanonicalizationError,
    },
    /// A per-page digest failed validation or decoding.
    #[error("page {page_index} digest error: {source}")]
    Digest {
        /// 0-based index of the page whose digest failed.
        page_index: usize,
        /// Underlying validation failure.
        #[source]
        source: custody_canonical::ValidationError,
    },
    /// An artifact handed to verification is missing or mistypes a field.
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
}
