use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When an encoded digest cannot be decoded back to bytes.
    #[error("digest ('{value}') is not valid base64url")]
    UndecodableDigest {
        /// Offending encoded digest.
        value: String,
    },
}
