//! Validated identifier types used throughout the engine.
//!
//! Every identifier that crosses a tool-call boundary is a distinct newtype
//! following the parse-don't-validate idiom: construction goes through
//! `parse()` and returns a `Result`, so a handler can never receive an
//! identifier that violates the shared rules.
//!
//! # Validation Rules
//!
//! - Non-empty, at most 128 characters
//! - ASCII alphanumeric plus hyphen (`-`), underscore (`_`), and dot (`.`)
//! - No leading or trailing whitespace
//! - No path-traversal sequences (`../`, `./`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length shared by all identifier types.
pub const MAX_ID_LENGTH: usize = 128;

/// Error returned when an identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier exceeds {MAX_ID_LENGTH} characters (got {length})")]
    TooLong { length: usize },

    #[error("identifier contains invalid character '{character}'")]
    InvalidCharacter { character: char },

    #[error("identifier contains a path traversal sequence")]
    PathTraversal,
}

fn validate_id(raw: &str) -> Result<(), IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.len() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong { length: raw.len() });
    }
    if raw.contains("../") || raw.starts_with("./") || raw == ".." {
        return Err(IdValidationError::PathTraversal);
    }
    if let Some(character) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(IdValidationError::InvalidCharacter { character });
    }
    Ok(())
}

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate from a string.
            pub fn parse(raw: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = raw.as_ref();
                validate_id(raw)?;
                Ok(Self(raw.to_string()))
            }

            /// View the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Construct without validation. Test-only escape hatch.
            #[doc(hidden)]
            pub fn new_unchecked(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }
    };
}

identifier! {
    /// Wire-protocol name of a tool, unique within one assembled catalogue.
    ToolName
}

identifier! {
    /// Organization the calling conversation belongs to.
    OrgId
}

identifier! {
    /// Persisted conversation a tool call operates within.
    ThreadId
}

identifier! {
    /// Persisted skill record.
    SkillId
}

identifier! {
    /// Document/source attachable to a thread.
    SourceId
}

identifier! {
    /// Live MCP integration.
    IntegrationId
}

identifier! {
    /// Knowledge base searchable by query-type tools.
    KnowledgeBaseId
}

identifier! {
    /// Artifact produced by document create/update tools.
    ArtifactId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_shapes() {
        assert!(ToolName::parse("web_search").is_ok());
        assert!(SourceId::parse("src-42").is_ok());
        assert!(ThreadId::parse("thread.9f8a").is_ok());
        assert!(OrgId::parse("Org123").is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert_eq!(ToolName::parse("").unwrap_err(), IdValidationError::Empty);
        let long = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            ToolName::parse(&long),
            Err(IdValidationError::TooLong { length }) if length == MAX_ID_LENGTH + 1
        ));
    }

    #[test]
    fn rejects_unsafe_characters() {
        assert!(matches!(
            ToolName::parse("tool with spaces"),
            Err(IdValidationError::InvalidCharacter { character: ' ' })
        ));
        assert!(ToolName::parse("tool@special").is_err());
        assert!(ToolName::parse("tool/nested").is_err());
    }

    #[test]
    fn rejects_path_traversal() {
        assert_eq!(
            SourceId::parse("../etc/passwd").unwrap_err(),
            IdValidationError::PathTraversal
        );
        assert_eq!(
            SourceId::parse("./secret").unwrap_err(),
            IdValidationError::PathTraversal
        );
    }

    #[test]
    fn serde_round_trips_through_string() {
        let id = SourceId::parse("src-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"src-1\"");
        let back: SourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_invalid_payload() {
        let result: Result<ToolName, _> = serde_json::from_str("\"bad name\"");
        assert!(result.is_err());
    }
}
