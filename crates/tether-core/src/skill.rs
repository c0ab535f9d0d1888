//! Skill model and the skill-name token grammar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::identifiers::{IntegrationId, KnowledgeBaseId, OrgId, SkillId, SourceId};

/// Maximum length of a skill name.
pub const MAX_SKILL_NAME_LENGTH: usize = 128;

/// Error returned when a skill name violates the token grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSkillName {
    #[error("skill name cannot be empty")]
    Empty,

    #[error("skill name exceeds {MAX_SKILL_NAME_LENGTH} characters (got {length})")]
    TooLong { length: usize },

    #[error("skill name contains invalid character '{character}'")]
    InvalidCharacter { character: char },

    #[error("skill name cannot start or end with a space or hyphen")]
    EdgeSeparator,

    #[error("skill name cannot contain consecutive spaces or hyphens")]
    ConsecutiveSeparators,
}

/// A validated skill name.
///
/// The name doubles as a model-facing `enum` value in the activation tool's
/// schema, so it must round-trip safely through the model's text output.
/// The grammar is deliberately strict: ASCII letters and digits, with
/// internal single spaces or single hyphens as the only separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    /// Parse and validate a skill name.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidSkillName> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(InvalidSkillName::Empty);
        }
        if raw.len() > MAX_SKILL_NAME_LENGTH {
            return Err(InvalidSkillName::TooLong { length: raw.len() });
        }

        if raw.chars().next().is_some_and(is_separator)
            || raw.chars().next_back().is_some_and(is_separator)
        {
            return Err(InvalidSkillName::EdgeSeparator);
        }

        let mut previous_was_separator = false;
        for character in raw.chars() {
            if is_separator(character) {
                if previous_was_separator {
                    return Err(InvalidSkillName::ConsecutiveSeparators);
                }
                previous_was_separator = true;
            } else if character.is_ascii_alphanumeric() {
                previous_was_separator = false;
            } else {
                return Err(InvalidSkillName::InvalidCharacter { character });
            }
        }

        Ok(Self(raw.to_string()))
    }

    /// View the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Construct without validation. Test-only escape hatch.
    #[doc(hidden)]
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

fn is_separator(character: char) -> bool {
    character == ' ' || character == '-'
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SkillName {
    type Err = InvalidSkillName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<SkillName> for String {
    fn from(name: SkillName) -> Self {
        name.0
    }
}

impl TryFrom<String> for SkillName {
    type Error = InvalidSkillName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

/// A named bundle of instructions plus attached resources that can be
/// toggled into a conversation mid-turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: SkillName,
    pub short_description: String,
    /// Injected into the model's context when the skill is activated.
    pub instructions: String,
    pub is_active: bool,
    pub source_ids: Vec<SourceId>,
    pub mcp_integration_ids: Vec<IntegrationId>,
    pub knowledge_base_ids: Vec<KnowledgeBaseId>,
    pub owner_id: OrgId,
}
