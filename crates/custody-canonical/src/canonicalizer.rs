use canonical_json::to_string;
use serde_json::Value;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Generic failure from the underlying RFC 8785 serializer.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths reported in errors.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes for arbitrary JSON.
///
/// Key order, string escaping, and number formatting follow RFC 8785, so
/// two structurally equal values always produce byte-identical output on
/// any platform. Non-finite numbers are rejected before serialization.
#[derive(Debug, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical UTF-8 bytes for the value.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self.validate(value, Path::root())?;

        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    /// Walks the value and rejects anything that cannot hash deterministically.
    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => {
                if num.is_f64() {
                    let finite = num.as_f64().map(f64::is_finite).unwrap_or(false);
                    if !finite {
                        return Err(CanonicalizationError::NonFiniteNumber(format!("{}", path)));
                    }
                }
                Ok(())
            }
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}
