use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype!(
    ChatId,
    "Graph conversation identifier (`19:` prefix, e.g. `19:abc123@unq.gbl.spaces`).",
    r"^19:[A-Za-z0-9_.@=-]{1,256}$"
);
newtype!(
    Timestamp,
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);
